use super::{Attributes, Authorization, AuthorizationError, Authorizer};
use crate::config::PolicyRule;
use log::debug;

const WILDCARD: &str = "*";

fn matches(values: &[String], wanted: &str) -> bool {
    values.iter().any(|v| v == WILDCARD || v == wanted)
}

fn matches_url(patterns: &[String], path: &str) -> bool {
    patterns.iter().any(|p| match p.strip_suffix(WILDCARD) {
        Some(prefix) => path.starts_with(prefix),
        None => p == path,
    })
}

impl PolicyRule {
    fn applies_to(&self, attributes: &Attributes) -> bool {
        let Some(user) = &attributes.user else {
            return false;
        };
        matches(&self.users, &user.name) || user.groups.iter().any(|g| matches(&self.groups, g))
    }

    fn permits(&self, attributes: &Attributes) -> bool {
        if !matches(&self.verbs, &attributes.verb) {
            return false;
        }
        if !attributes.resource_request {
            return matches_url(&self.non_resource_urls, &attributes.path);
        }

        let resource = if attributes.subresource.is_empty() {
            attributes.resource.clone()
        } else {
            format!("{}/{}", attributes.resource, attributes.subresource)
        };
        matches(&self.api_groups, &attributes.api_group) && matches(&self.resources, &resource)
    }
}

/// Allows requests matched by a static list of policy rules.
///
/// A rule matching neither the caller nor the request leaves the decision
/// to other authorizers; this authorizer never denies.
#[derive(Debug, Clone, Default)]
pub struct RuleAuthorizer {
    rules: Vec<PolicyRule>,
}

impl RuleAuthorizer {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }
}

#[async_trait::async_trait]
impl Authorizer for RuleAuthorizer {
    async fn authorize(
        &self,
        attributes: &Attributes,
    ) -> Result<Authorization, AuthorizationError> {
        let matched = self
            .rules
            .iter()
            .position(|rule| rule.applies_to(attributes) && rule.permits(attributes));

        match matched {
            Some(index) => {
                debug!(
                    "Policy rule {index} allows {} to {} {}",
                    attributes.user_name(),
                    attributes.verb,
                    attributes.resource
                );
                Ok(Authorization::allow(format!("allowed by policy rule {index}")))
            }
            None => Ok(Authorization::no_opinion()),
        }
    }
}
