pub mod authorizer_event;

pub use authorizer_event::TokenAuthorizerEvent;
