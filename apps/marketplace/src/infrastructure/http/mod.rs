//! HTTP/REST API adapter.
//!
//! Inbound adapter implementing REST endpoints that delegate to application use cases.

mod controller;
mod extract;
mod request;
mod response;

pub use controller::{AppState, create_router};
pub use extract::{ApiPath, ApiQuery, AuthUser, JsonBody, MaybeUser};
pub use request::*;
pub use response::*;
