use confique::Config;
use serde::Deserialize;
use std::path::PathBuf;

/// General authorizer configuration
#[derive(Debug, Config, Clone)]
pub struct AuthorizationConfig {
    /// YAML file holding the policy rules
    #[config(env = "OAUTH_APISERVER_POLICY_FILE")]
    pub policy_file: Option<PathBuf>,
}

/// Contents of the policy file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PolicyFile {
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

/// A rule granting verbs on resources or URLs to users and groups.
///
/// `*` in any list matches everything; a non-resource URL ending in `*`
/// matches by prefix.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub verbs: Vec<String>,
    #[serde(default)]
    pub api_groups: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub non_resource_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_yaml;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_policy_file() {
        let yaml_content = r#"
rules:
  - groups: ["system:masters"]
    verbs: ["*"]
    apiGroups: ["*"]
    resources: ["*"]
    nonResourceUrls: ["*"]
  - users: ["alice"]
    verbs: ["get"]
    apiGroups: ["user.openshift.io"]
    resources: ["users"]
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let policy: PolicyFile = load_yaml(temp_file.path()).unwrap();
        assert_eq!(policy.rules.len(), 2);
        assert_eq!(policy.rules[0].non_resource_urls, vec!["*"]);
        assert_eq!(policy.rules[1].users, vec!["alice"]);
        assert!(policy.rules[1].groups.is_empty());
    }
}
