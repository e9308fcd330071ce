pub mod bearer;
pub mod claims;
pub mod config;
pub mod error;
pub mod factory;
pub mod keys;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::{Audience, Claims};
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use factory::build_token_verifier;
pub use permissions::check_permission;
pub use verifier::TokenVerifier;
