pub mod controller;
pub mod router;
pub mod service;

pub use router::auth_routes;
pub use service::AuthService;
