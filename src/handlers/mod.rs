//! HTTP handlers for the store resources.

pub mod entity;
mod resources;

pub use entity::*;
