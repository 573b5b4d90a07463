//! Accounts Bounded Context
//!
//! Users, their marketplace profiles (seller flag, funds, purchase count)
//! and bearer-token sessions.

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{Account, Charge, Credentials, NewUser, Profile, Session, User};
pub use repository::AccountRepository;
pub use value_objects::{
    BuyerStatus, LOGIN_USERNAME_MAX_LEN, ProfileUpdate, RegistrationForm, USERNAME_MAX_LEN,
    validate_username,
};
