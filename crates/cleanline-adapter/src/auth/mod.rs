/*
[INPUT]:  Login credentials and API client
[OUTPUT]: Session tokens and authenticated identity
[POS]:    Auth layer - handles cleanline API authentication
[UPDATE]: When auth flow or token handling change
*/

pub mod manager;
pub mod token;

pub use manager::{AuthManager, DEFAULT_TOKEN_TTL_SECONDS};
pub use token::{SessionToken, TokenStore};
