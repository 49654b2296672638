use confique::Config;
use std::path::PathBuf;

/// Admission chain configuration
#[derive(Debug, Config, Clone)]
pub struct AdmissionConfig {
    /// Plugins to enable, comma-separated (default: oauth.openshift.io/AuditLogouts)
    #[config(
        env = "OAUTH_APISERVER_ADMISSION_PLUGINS",
        default = "oauth.openshift.io/AuditLogouts"
    )]
    pub enable_plugins: String,

    /// Directory holding per-plugin configuration files
    #[config(env = "OAUTH_APISERVER_ADMISSION_CONFIG_DIR")]
    pub plugin_config_dir: Option<PathBuf>,
}

impl AdmissionConfig {
    pub fn enabled_plugins(&self) -> Vec<String> {
        super::split_list(&self.enable_plugins)
    }
}
