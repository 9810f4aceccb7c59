pub mod controller;
pub mod router;
pub mod service;

pub use router::rating_routes;
pub use service::RatingService;
