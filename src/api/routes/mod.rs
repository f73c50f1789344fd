//! API Routes
//!
//! Route handlers organized by resource.

pub mod employees;
pub mod health;
pub mod reports;
pub mod service_types;
pub mod services;
