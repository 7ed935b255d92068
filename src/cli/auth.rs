use std::path::Path;

use inquire::{Password, Text};

use crate::api::{ApiClient, SisApi};
use crate::config::{load_config, save_config};

fn normalize_server_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    // Endpoints are built from the bare origin
    let url = url.trim_end_matches("/api").trim_end_matches('/');

    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    // Default to http:// for localhost/127.0.0.1, https:// for others
    if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
        format!("http://{url}")
    } else {
        format!("https://{url}")
    }
}

pub fn run_auth_login(
    config_path: &Path,
    server: Option<String>,
    token: Option<String>,
    role: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let server = if let Some(s) = server {
        if s.trim().is_empty() {
            anyhow::bail!("Server URL cannot be empty");
        }
        s
    } else if non_interactive {
        anyhow::bail!("--server is required in non-interactive mode");
    } else {
        Text::new("Server URL:")
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(inquire::validator::Validation::Invalid(
                        "Server URL is required".into(),
                    ))
                } else {
                    Ok(inquire::validator::Validation::Valid)
                }
            })
            .prompt()?
    };

    let server_url = normalize_server_url(&server);

    let token = if let Some(t) = token {
        t
    } else if non_interactive {
        anyhow::bail!("--token is required in non-interactive mode");
    } else {
        Password::new("Token:").without_confirmation().prompt()?
    };

    if token.trim().is_empty() {
        anyhow::bail!("Token cannot be empty");
    }

    let mut config = load_config(config_path)?;
    config.server_url = server_url.clone();
    config.token = token.trim().to_string();
    if let Some(role) = role {
        config.role = role;
    }

    // Fails on a bad URL or a rejected token before anything is saved
    let client = ApiClient::new(&config.server_url, &config.token, &config.role)?;
    client.list_active_users()?;

    save_config(config_path, &config)?;

    println!();
    println!("Logged in to {server_url}");
    println!();

    Ok(())
}

pub fn run_auth_logout(config_path: &Path) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    println!();
    if config.is_logged_in() {
        config.server_url.clear();
        config.token.clear();
        save_config(config_path, &config)?;
        println!("Logged out successfully.");
    } else {
        println!("No credentials found.");
    }
    println!();

    Ok(())
}
