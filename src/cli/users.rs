use std::path::Path;

use serde::Serialize;

use crate::api::SisApi;
use crate::types::UserAccount;

use super::init_client;

#[derive(Serialize)]
struct UserOutput<'a> {
    id: &'a str,
    school_id: &'a str,
    name: String,
    role: &'a str,
    active: bool,
}

impl<'a> From<&'a UserAccount> for UserOutput<'a> {
    fn from(user: &'a UserAccount) -> Self {
        Self {
            id: &user.id,
            school_id: &user.school_id,
            name: user.full_name(),
            role: &user.role,
            active: user.is_active(),
        }
    }
}

pub fn run_users_search(config_path: &Path, query: &str, json: bool) -> anyhow::Result<()> {
    let (_, client) = init_client(config_path)?;

    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Search query cannot be empty");
    }

    let users = client.search_users(query)?;
    let outputs: Vec<UserOutput> = users.iter().map(UserOutput::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    println!();
    if outputs.is_empty() {
        println!("No users found.");
    } else {
        for user in &outputs {
            let inactive = if user.active { "" } else { "  [inactive]" };
            println!(
                "  {:<10} {:<30} {}{inactive}",
                user.school_id, user.name, user.role
            );
        }
    }
    println!();

    Ok(())
}
