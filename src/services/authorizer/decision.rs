use std::collections::BTreeMap;

use serde::Serialize;

use super::errors::AuthorizationError;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";
/// Principal reported on deny, when no verified subject exists.
pub const DENIED_PRINCIPAL: &str = "unauthorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Outcome of one authorization. Deny is a value, not an error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow {
        principal_id: String,
        context: BTreeMap<String, String>,
    },
    Deny {
        reason: AuthorizationError,
    },
}

impl Decision {
    pub fn deny(reason: AuthorizationError) -> Self {
        Self::Deny { reason }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    pub fn effect(&self) -> Effect {
        match self {
            Self::Allow { .. } => Effect::Allow,
            Self::Deny { .. } => Effect::Deny,
        }
    }

    pub fn principal_id(&self) -> &str {
        match self {
            Self::Allow { principal_id, .. } => principal_id,
            Self::Deny { .. } => DENIED_PRINCIPAL,
        }
    }

    pub fn reason(&self) -> Option<&AuthorizationError> {
        match self {
            Self::Allow { .. } => None,
            Self::Deny { reason } => Some(reason),
        }
    }

    /// Render the gateway authorizer contract for `resource`.
    pub fn into_response(self, resource: impl Into<String>) -> AuthorizerResponse {
        let effect = self.effect();
        let (principal_id, context) = match self {
            Self::Allow {
                principal_id,
                context,
            } => (principal_id, context),
            Self::Deny { reason } => (
                DENIED_PRINCIPAL.to_string(),
                BTreeMap::from([("reason".to_string(), reason.code().to_string())]),
            ),
        };

        AuthorizerResponse {
            principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION,
                statement: vec![Statement {
                    action: INVOKE_ACTION,
                    effect,
                    resource: resource.into(),
                }],
            },
            context,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    pub context: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: &'static str,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: &'static str,
    pub effect: Effect,
    pub resource: String,
}
