//! Shared types for the pop-up site
//!
//! Common types used by the server and by API consumers: error codes and
//! response envelopes, reservation / area tag models, the tag slug
//! normalizer and small utilities.

pub mod error;
pub mod models;
pub mod slug;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
