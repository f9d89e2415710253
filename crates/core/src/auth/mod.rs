//! Authentication helpers.
//!
//! Passwords are stored as Argon2id PHC strings.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
