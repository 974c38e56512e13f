// Service exports
pub mod data;
pub mod sms;
pub mod tokens;

pub use data::{DataError, Snapshot};
pub use sms::{SmsClient, SmsError};
pub use tokens::{TokenError, TokenStore, DEFAULT_TOKEN_TTL};
