//! # Tasklane Core
//!
//! Error and response shaping shared by every Tasklane crate.
//!
//! - [`errors`]: the [`AppError`] type every handler returns, and the
//!   [`ErrorCode`] taxonomy carried in error bodies
//! - [`response`]: the JSON body written for every failed request
//!
//! # Example
//!
//! ```ignore
//! use tasklane_core::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Todo not found"));
//! ```

pub mod errors;
pub mod response;

pub use errors::{AppError, ErrorCode};
pub use response::ErrorBody;
