//! Core business logic for moddesk.

pub mod services;

pub use services::*;
