use super::{Attributes, Authorization, AuthorizationError, Authorizer, Decision};
use std::sync::Arc;

/// Asks each authorizer in turn until one allows or denies.
///
/// Errors from a member do not stop evaluation. They are only returned,
/// alongside `NoOpinion`, when no member made a decision.
pub struct UnionAuthorizer {
    authorizers: Vec<Arc<dyn Authorizer>>,
}

impl UnionAuthorizer {
    pub fn new(authorizers: Vec<Arc<dyn Authorizer>>) -> Self {
        Self { authorizers }
    }
}

#[async_trait::async_trait]
impl Authorizer for UnionAuthorizer {
    async fn authorize(
        &self,
        attributes: &Attributes,
    ) -> Result<Authorization, AuthorizationError> {
        let mut reasons = Vec::new();
        let mut errors = Vec::new();

        for authorizer in &self.authorizers {
            match authorizer.authorize(attributes).await {
                Ok(auth) if auth.decision != Decision::NoOpinion => return Ok(auth),
                Ok(auth) => {
                    if !auth.reason.is_empty() {
                        reasons.push(auth.reason);
                    }
                }
                Err(err) => errors.push(err),
            }
        }

        match errors.len() {
            0 => Ok(Authorization {
                decision: Decision::NoOpinion,
                reason: reasons.join("\n"),
            }),
            1 => Err(errors.remove(0)),
            _ => Err(AuthorizationError::Aggregate(errors)),
        }
    }
}
