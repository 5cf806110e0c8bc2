//! Backend for a course-catalog learning platform: categories, courses and
//! lessons managed by admins; enrollment, progress tracking and reviews for
//! authenticated users; session-based auth backed by Postgres.

pub mod admin;
pub mod app;
pub mod auth;
pub mod categories;
pub mod config;
pub mod contact;
pub mod courses;
pub mod enrollments;
pub mod error;
pub mod lessons;
pub mod profile;
pub mod reviews;
pub mod slug;
pub mod state;
pub mod validate;
