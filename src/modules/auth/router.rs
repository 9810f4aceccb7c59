use std::sync::Arc;

use tower_governor::GovernorLayer;

use coursehub_config::RateLimitConfig;

use crate::middleware::gate::PUBLIC;
use crate::middleware::routes::RouteTable;

use super::controller::{login, signup};

/// Signup and login, rate limited per client IP when enabled.
pub fn auth_routes(routes: RouteTable, rate_limit: &RateLimitConfig) -> RouteTable {
    let routes = routes
        .post("/signup", PUBLIC, signup)
        .post("/login", PUBLIC, login);

    match rate_limit.auth_governor_config() {
        Some(config) => {
            routes.map_router(|router| router.layer(GovernorLayer::new(Arc::new(config))))
        }
        None => routes,
    }
}
