//! Records which user an OAuth access token belonged to when it is
//! deleted, so the audit log shows who logged out.

use super::{AdmissionAttributes, AdmissionError, AdmissionPlugin, GroupResource, Operation, Plugins};
use crate::models::{ApiObject, ACCESS_TOKENS_RESOURCE, OAUTH_GROUP};
use log::info;
use std::io::Read;
use std::sync::Arc;

pub const PLUGIN_NAME: &str = "oauth.openshift.io/AuditLogouts";

/// Audit annotation carrying the owner of a deleted access token
pub const USER_ANNOTATION: &str = "oauth.admission.openshift.io/user";

pub fn register(plugins: &mut Plugins) {
    plugins.register(
        PLUGIN_NAME,
        Box::new(
            |_config: Option<&mut dyn Read>| -> Result<Box<dyn AdmissionPlugin>, AdmissionError> {
                Ok(Box::new(AuditLogouts::new()))
            },
        ),
    );
}

#[derive(Debug)]
pub struct AuditLogouts {
    access_tokens: GroupResource,
}

impl AuditLogouts {
    pub fn new() -> Self {
        Self {
            access_tokens: GroupResource::new(OAUTH_GROUP, ACCESS_TOKENS_RESOURCE),
        }
    }
}

impl Default for AuditLogouts {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(object: &Option<Arc<dyn ApiObject>>) -> (String, &'static str) {
    match object {
        Some(obj) => (format!("{obj:?}"), obj.kind()),
        None => ("<nil>".to_string(), "<nil>"),
    }
}

impl AdmissionPlugin for AuditLogouts {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn operations(&self) -> &'static [Operation] {
        &[Operation::Delete]
    }

    fn validate(&self, attributes: &mut AdmissionAttributes) -> Result<(), AdmissionError> {
        if attributes.resource != self.access_tokens {
            return Ok(());
        }

        let owner = attributes
            .object
            .as_deref()
            .and_then(|obj| obj.as_user_owned())
            .map(|owned| owned.owning_user_name().to_string());

        let Some(user_name) = owner else {
            let (object, kind) = describe(&attributes.object);
            let (old_object, old_kind) = describe(&attributes.old_object);
            return Err(AdmissionError::forbidden(
                attributes,
                format!(
                    "object was marked as kind oauthaccesstoken but was unable to be converted: {object} ({kind}), old object, {old_object} ({old_kind})"
                ),
            ));
        };

        info!("deletion of oauthaccesstoken for user {user_name}");
        attributes.add_annotation(USER_ANNOTATION, &user_name);
        Ok(())
    }
}
