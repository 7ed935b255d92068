use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::TermScope;

pub const CONFIG_ENV: &str = "REGISTRAR_CONFIG";

const DEFAULT_ROLE: &str = "admin";
const DEFAULT_REGISTRANT_LIMIT: u32 = 1000;

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn default_registrant_limit() -> u32 {
    DEFAULT_REGISTRANT_LIMIT
}

/// Client settings persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server_url: String,
    #[serde(default)]
    pub token: String,
    /// Sent as `userRole` with every audit entry.
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_registrant_limit")]
    pub registrant_limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<TermScope>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            token: String::new(),
            role: default_role(),
            registrant_limit: default_registrant_limit(),
            term: None,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        !self.server_url.trim().is_empty() && !self.token.trim().is_empty()
    }

    pub fn require_term(&self) -> Result<&TermScope> {
        self.term.as_ref().ok_or_else(|| {
            Error::Config("No term selected. Run 'registrar term use' first.".to_string())
        })
    }
}

/// Resolve the config file: explicit path, then `$REGISTRAR_CONFIG`, then the platform config dir.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let dirs = ProjectDirs::from("", "", "registrar").ok_or_else(|| {
        Error::Config("Could not determine config directory. Is $HOME set?".to_string())
    })?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Missing file means defaults; a file that does not parse is an error.
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ClientConfig::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{} is not valid: {e}", path.display())))
}

pub fn save_config(path: &Path, config: &ClientConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("cannot serialize config: {e}")))?;
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
