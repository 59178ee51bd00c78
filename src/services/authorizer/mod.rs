pub mod core;
pub mod decision;
pub mod errors;
pub mod factory;
pub mod token;

pub use self::core::{AuthConfig, Authorizer, VerifiedToken};
pub use decision::{AuthorizerResponse, Decision, Effect};
pub use errors::{AuthorizationError, EnvironmentError};
pub use factory::build_authorizer;
