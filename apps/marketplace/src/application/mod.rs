//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for the clock, credentials and the showcase cache
//! - **Use Cases**: One per feature area, taking the requester's account
//! - **DTOs**: Composite outputs for API boundaries

pub mod dto;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use ports::*;
pub use use_cases::*;
