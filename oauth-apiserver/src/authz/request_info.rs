use super::Attributes;
use crate::authn::UserInfo;
use http::Method;

/// Resolve the authorization attributes of a request from its method and
/// path.
///
/// `/apis/{group}/{version}/...` and `/api/{version}/...` are resource
/// requests, optionally namespaced with `namespaces/{ns}`. Anything else is
/// a non-resource request whose verb is the lower-cased method.
pub fn resolve_attributes(method: &Method, path: &str, user: Option<UserInfo>) -> Attributes {
    let mut attributes = Attributes {
        user,
        verb: method.as_str().to_lowercase(),
        path: path.to_string(),
        ..Default::default()
    };

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let rest = match segments.as_slice() {
        ["apis", group, version, rest @ ..] if !rest.is_empty() => {
            attributes.api_group = group.to_string();
            attributes.api_version = version.to_string();
            rest
        }
        ["api", version, rest @ ..] if !rest.is_empty() => {
            attributes.api_version = version.to_string();
            rest
        }
        _ => return attributes,
    };

    let rest = match rest {
        ["namespaces", namespace, tail @ ..] if !tail.is_empty() => {
            attributes.namespace = namespace.to_string();
            tail
        }
        other => other,
    };

    match rest {
        [resource] => attributes.resource = resource.to_string(),
        [resource, name] => {
            attributes.resource = resource.to_string();
            attributes.name = name.to_string();
        }
        [resource, name, subresource, ..] => {
            attributes.resource = resource.to_string();
            attributes.name = name.to_string();
            attributes.subresource = subresource.to_string();
        }
        [] => return attributes,
    }

    attributes.resource_request = true;
    attributes.verb = resource_verb(method, !attributes.name.is_empty()).to_string();
    attributes
}

fn resource_verb(method: &Method, named: bool) -> &'static str {
    match *method {
        Method::POST => "create",
        Method::GET | Method::HEAD if named => "get",
        Method::GET | Method::HEAD => "list",
        Method::PUT => "update",
        Method::PATCH => "patch",
        Method::DELETE if named => "delete",
        Method::DELETE => "deletecollection",
        _ => "",
    }
}
