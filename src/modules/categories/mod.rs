pub mod controller;
pub mod router;
pub mod service;

pub use router::category_routes;
pub use service::CategoryService;
