//! Request middleware.
//!
//! - [`auth`]: caller identity and the [`auth::CurrentUser`] extractor
//! - [`gate`]: ordered per-route gates (authenticated, role, not-demo)
//! - [`routes`]: the route table that attaches gates to handlers
//!
//! # Flow
//!
//! 1. The client sends `Authorization: Bearer <token>`
//! 2. For a gated route, [`gate::enforce_gates`] verifies the token and runs
//!    the route's gates in order
//! 3. The resolved [`auth::Identity`] is stored in the request extensions
//! 4. The handler reads it through [`auth::CurrentUser`]
//!
//! ```ignore
//! RouteTable::new(jwt_config)
//!     .post("/createCourse", INSTRUCTOR, create_course)
//!     .delete("/deleteCourse", ADMIN_NOT_DEMO, delete_course)
//!     .get("/getAllCourses", PUBLIC, get_all_courses);
//! ```

pub mod auth;
pub mod gate;
pub mod routes;
