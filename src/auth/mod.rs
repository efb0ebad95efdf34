//! Authentication
//!
//! Handles:
//! - Password hashing
//! - Signed bearer tokens
//! - Authentication extractor

mod middleware;
mod password;
mod token;

pub use middleware::CurrentUser;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer, generate_secret};
