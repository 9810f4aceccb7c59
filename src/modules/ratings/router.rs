use crate::middleware::gate::{PUBLIC, STUDENT_NOT_DEMO};
use crate::middleware::routes::RouteTable;

use super::controller::{create_rating, get_average_rating, get_reviews};

pub fn rating_routes(routes: RouteTable) -> RouteTable {
    routes
        .post("/createRating", STUDENT_NOT_DEMO, create_rating)
        .get("/getAverageRating", PUBLIC, get_average_rating)
        .get("/getReviews", PUBLIC, get_reviews)
}
