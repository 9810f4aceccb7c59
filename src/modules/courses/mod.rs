pub mod controller;
pub mod router;
pub mod sections;
pub mod service;

pub use router::course_routes;
pub use sections::SectionService;
pub use service::CourseService;
