use crate::middleware::gate::{AUTHENTICATED, AUTHENTICATED_NOT_DEMO, INSTRUCTOR};
use crate::middleware::routes::RouteTable;

use super::controller::{
    delete_profile, get_enrolled_courses, get_instructor_dashboard_details, get_user_details,
    update_display_picture, update_profile,
};

pub fn profile_routes(routes: RouteTable) -> RouteTable {
    routes
        .delete("/deleteProfile", AUTHENTICATED_NOT_DEMO, delete_profile)
        .put("/updateProfile", AUTHENTICATED_NOT_DEMO, update_profile)
        .get("/getUserDetails", AUTHENTICATED, get_user_details)
        .get("/getEnrolledCourses", AUTHENTICATED, get_enrolled_courses)
        .put("/updateDisplayPicture", AUTHENTICATED, update_display_picture)
        .get(
            "/getInstructorDashboardDetails",
            INSTRUCTOR,
            get_instructor_dashboard_details,
        )
}
