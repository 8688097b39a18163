//! Foodie - data model and account image handling for a food-ordering
//! service.
//!
//! The schema and queries live in `foodie-db`; this crate adds
//! configuration, media storage, thumbnail generation, and the user save
//! hook that ties them together.

pub mod config;
pub mod images;
pub mod storage;
pub mod users;
