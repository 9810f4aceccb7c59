use crate::middleware::gate::PUBLIC;
use crate::middleware::routes::RouteTable;

use super::controller::contact_us;

pub fn contact_routes(routes: RouteTable) -> RouteTable {
    routes.post("/contactUs", PUBLIC, contact_us)
}
