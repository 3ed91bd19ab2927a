//! REST proxy for image-to-3D conversion
//!
//! Forwards conversion jobs to the Meshy cloud API, relays job status and
//! re-exports finished models in alternate formats on download. Requests
//! are independent; the only local state is write-once metadata persisted
//! per task.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod meshy;
pub mod routes;
pub mod state;
pub mod store;

pub use error::{ApiError, Result};
pub use routes::app;
