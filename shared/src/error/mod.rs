//! Unified error system
//!
//! - [`ErrorCode`]: Standardized error codes, grouped by range
//! - [`ErrorCategory`]: Classification of codes by domain
//! - [`AppError`]: Error with code, message, and optional details
//! - [`ApiResponse`]: Response envelope used by the HTTP surface
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ApiResponse, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 42 not found");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(4001));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
