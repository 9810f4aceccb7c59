pub mod auth;
pub mod categories;
pub mod contact;
pub mod courses;
pub mod payments;
pub mod profile;
pub mod ratings;

#[cfg(test)]
pub(crate) mod fixtures;
