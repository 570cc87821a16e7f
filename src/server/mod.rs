//! HTTP adapter over the store.
//!
//! Routes:
//! - `GET /health`
//! - `GET|POST|DELETE /api/products`
//! - `GET|POST|DELETE /api/waste`
//! - `GET /api/report`

mod error;
mod handlers;
mod router;

pub use error::ApiError;
pub use router::{build_router, AppState};
