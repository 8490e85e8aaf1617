// HTTP API routes
//
// This module contains the resource route handlers. Each submodule handles
// one collection with its own state; every handler is a single store call.

pub mod common;
pub mod foods;
pub mod gallery;
pub mod orders;
pub mod users;

// Re-export common types
pub use common::{ApiError, ErrorResponse, MessageResponse};
