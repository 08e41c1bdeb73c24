//! Coordinator Service Module
//!
//! Owns all shared state behind one explicit service object and exposes it over HTTP.
//!
//! ## Submodules
//! - **`coordinator`**: Startup load, background task lifecycle (`start`/`stop`) and the
//!   operations behind each endpoint.
//! - **`protocol`**: Endpoint paths and the JSON bodies exchanged with workers.
//! - **`handlers`**: axum handlers and the router.

pub mod coordinator;
pub mod handlers;
pub mod protocol;

pub use coordinator::Coordinator;
