use crate::middleware::gate::{
    ADMIN_NOT_DEMO, AUTHENTICATED, INSTRUCTOR, INSTRUCTOR_NOT_DEMO, PUBLIC, STUDENT,
};
use crate::middleware::routes::RouteTable;
use crate::modules::categories::category_routes;
use crate::modules::ratings::rating_routes;

use super::controller::{
    add_section, add_subsection, create_course, delete_course, delete_section, delete_subsection,
    edit_course, get_all_courses, get_course_details, get_full_course_details,
    get_instructor_courses, search_course, update_course_progress, update_section,
    update_subsection,
};

/// Everything under `/api/v1/course`, categories and ratings included.
pub fn course_routes(routes: RouteTable) -> RouteTable {
    let routes = routes
        .post("/createCourse", INSTRUCTOR, create_course)
        .post("/editCourse", INSTRUCTOR_NOT_DEMO, edit_course)
        .post("/addSection", INSTRUCTOR, add_section)
        .post("/updateSection", INSTRUCTOR, update_section)
        .post("/deleteSection", INSTRUCTOR_NOT_DEMO, delete_section)
        .post("/addSubSection", INSTRUCTOR, add_subsection)
        .post("/updateSubSection", INSTRUCTOR, update_subsection)
        .post("/deleteSubSection", INSTRUCTOR, delete_subsection)
        .get("/getAllCourses", PUBLIC, get_all_courses)
        .post("/getCourseDetails", PUBLIC, get_course_details)
        .post("/getFullCourseDetails", AUTHENTICATED, get_full_course_details)
        .get("/getInstructorCourses", INSTRUCTOR, get_instructor_courses)
        .delete("/deleteCourse", ADMIN_NOT_DEMO, delete_course)
        .post("/searchCourse", PUBLIC, search_course)
        .post("/updateCourseProgress", STUDENT, update_course_progress);

    rating_routes(category_routes(routes))
}
