use crate::middleware::gate::{ADMIN, INSTRUCTOR, PUBLIC};
use crate::middleware::routes::RouteTable;

use super::controller::{
    add_course_to_category, create_category, get_category_page_details, show_all_categories,
};

pub fn category_routes(routes: RouteTable) -> RouteTable {
    routes
        .post("/createCategory", ADMIN, create_category)
        .get("/showAllCategories", PUBLIC, show_all_categories)
        .post("/getCategoryPageDetails", PUBLIC, get_category_page_details)
        .post("/addCourseToCategory", INSTRUCTOR, add_course_to_category)
}
