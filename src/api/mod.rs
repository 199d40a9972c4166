// src/api/mod.rs

pub mod error;
pub mod http;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use http::build_router;
pub use types::*;
