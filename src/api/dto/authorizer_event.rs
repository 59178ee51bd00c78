use serde::Deserialize;

/// Token authorizer invocation, as the gateway sends it.
///
/// Every field is optional on the wire: a missing token is a deny, not a 4xx.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAuthorizerEvent {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub authorization_token: String,
    #[serde(default)]
    pub method_arn: Option<String>,
}

impl TokenAuthorizerEvent {
    /// Resource to put in the policy: the invoked method when known.
    pub fn resource_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.method_arn
            .as_deref()
            .filter(|arn| !arn.trim().is_empty())
            .unwrap_or(fallback)
    }
}
