//! Request middleware.
//!
//! - [`auth`]: shared-secret `X-API-KEY` gate for the `/api/v2` group

pub mod auth;
