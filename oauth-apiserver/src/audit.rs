//! Audit events for mutating requests.
//!
//! Each event is serialized as JSON and logged at info level on the
//! `audit` target, so it can be routed separately with `RUST_LOG`.

use crate::admission::AdmissionAttributes;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

pub const AUDIT_TARGET: &str = "audit";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub verb: String,
    pub resource: String,
    pub name: String,
    /// User that made the request
    pub user: String,
    /// Annotations recorded by admission plugins
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// HTTP status code returned to the caller
    pub code: u16,
}

impl AuditEvent {
    /// Build an event from the admission attributes of a completed request
    pub fn from_admission(verb: &str, attributes: &AdmissionAttributes, code: u16) -> Self {
        Self {
            verb: verb.to_string(),
            resource: attributes.resource.to_string(),
            name: attributes.name.clone(),
            user: attributes
                .user
                .as_ref()
                .map(|u| u.name.clone())
                .unwrap_or_default(),
            annotations: attributes.annotations().clone(),
            code,
        }
    }
}

pub fn emit(event: &AuditEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!(target: AUDIT_TARGET, "{json}"),
        Err(e) => warn!("Failed to serialize audit event: {e}"),
    }
}
