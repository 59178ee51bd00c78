pub mod authorizer;
pub mod jwks;
pub mod tenant;
