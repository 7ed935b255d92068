mod auth;
mod commands;
mod export;
mod import;
pub mod pickers;
mod template;
mod term;
mod users;

pub use auth::{run_auth_login, run_auth_logout};
pub use commands::{AuthCommands, ImportTarget, TermCommands, UploadArgs, UsersCommands};
pub use export::run_export;
pub use import::{run_import, run_validate};
pub use template::run_template;
pub use term::{run_term_show, run_term_use};
pub use users::run_users_search;

use std::path::Path;

use crate::api::ApiClient;
use crate::config::{ClientConfig, load_config};

/// Load the config and build a client, checking the user has logged in.
pub fn init_client(config_path: &Path) -> anyhow::Result<(ClientConfig, ApiClient)> {
    let config = load_config(config_path)?;
    if !config.is_logged_in() {
        anyhow::bail!("Not logged in. Run 'registrar auth login' first.");
    }
    let client = ApiClient::new(&config.server_url, &config.token, &config.role)?;
    Ok((config, client))
}
