//! Authentication Module
//!
//! Token signing and verification, request identity, password hashing and login.

pub mod token_codec;
pub mod identity;
pub mod password_service;
pub mod login_api;

pub use token_codec::{TokenClaims, TokenCodec, TokenCodecConfig, TokenError};
pub use identity::{extract_identity, Extraction, Identity, Principal};
pub use password_service::{Argon2Config, PasswordPolicy, PasswordService};
pub use login_api::{login_router, LoginState};
