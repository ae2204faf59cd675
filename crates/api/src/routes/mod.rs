//! Route handlers

pub mod dashboard;
pub mod insights;
pub mod predict;
pub mod schema;
