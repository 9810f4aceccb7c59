pub mod controller;
pub mod router;
pub mod service;

pub use router::contact_routes;
pub use service::ContactService;
