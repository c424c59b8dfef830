//! # Tasklane API
//!
//! A small REST service that stores todos in PostgreSQL and keeps an
//! optional Redis copy of each one.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── main.rs          # CLI entry point (serve / migrate)
//! ├── cli.rs           # clap definitions
//! ├── state.rs         # AppState and bootstrap
//! ├── router.rs        # Route tree, CORS and middleware stack
//! ├── server.rs        # Graceful shutdown
//! ├── logging.rs       # Subscriber setup and request logging
//! ├── metrics.rs       # Prometheus recorder and HTTP metrics
//! ├── docs.rs          # OpenAPI document
//! ├── validator.rs     # Body and path extractors
//! ├── middleware/      # X-API-KEY gate
//! └── modules/
//!     ├── system/      # /service liveness route
//!     └── todos/       # repository, service, cache policy, handlers
//! ```
//!
//! Shared pieces live in workspace crates: `tasklane-core` (errors),
//! `tasklane-config`, `tasklane-db` (pool with retry), `tasklane-models`
//! and `tasklane-cache` (Redis store and rate limiter).
//!
//! ## Request flow
//!
//! Logging and metrics middleware wrap every route. Requests under
//! `/api/v2` must then pass the API-key gate before a handler runs. Handlers
//! treat the database as the source of truth; cache reads and writes are
//! best-effort and never change a response status.

pub mod cli;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod server;
pub mod state;
pub mod validator;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
