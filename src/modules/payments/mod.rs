pub mod controller;
pub mod gateway;
pub mod router;
pub mod service;

pub use gateway::{PaymentGateway, RazorpayGateway};
pub use router::payment_routes;
pub use service::PaymentService;
