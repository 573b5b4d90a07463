//! Application Ports (Driven)
//!
//! Interfaces the use cases need from the outside world besides the
//! repositories declared by each bounded context.

mod clock_port;
mod credential_port;
mod repositories;
mod showcase_cache_port;

pub use clock_port::{Clock, FixedClock, SystemClock};
pub use credential_port::{CredentialError, CredentialPort, IssuedToken};
pub use repositories::Repositories;
pub use showcase_cache_port::{NoShowcaseCache, ShowcaseCache};
