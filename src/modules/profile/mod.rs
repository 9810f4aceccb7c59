pub mod controller;
pub mod router;
pub mod service;

pub use router::profile_routes;
pub use service::ProfileService;
