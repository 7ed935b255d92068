use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use registrar::cli::{
    AuthCommands, ImportTarget, TermCommands, UploadArgs, UsersCommands, run_auth_login,
    run_auth_logout, run_export, run_import, run_template, run_term_show, run_term_use,
    run_users_search, run_validate,
};
use registrar::config::config_path;

#[derive(Parser)]
#[command(name = "registrar")]
#[command(about = "Import an academic term's structure from Excel workbooks", long_about = None)]
struct Cli {
    /// Config file (defaults to $REGISTRAR_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the saved server and token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Select or show the current term
    Term {
        #[command(subcommand)]
        command: TermCommands,
    },

    /// Write a blank upload template
    Template {
        #[arg(value_enum)]
        target: ImportTarget,

        /// Output path (defaults to "<target>-template.xlsx")
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Check a workbook against the system without importing
    Validate {
        #[command(flatten)]
        args: UploadArgs,
    },

    /// Validate a workbook, confirm, and create its rows
    Import {
        #[command(flatten)]
        args: UploadArgs,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Never prompt (requires --yes)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Export the current term as a workbook the term import accepts
    Export {
        /// Output path (defaults to "<term> <school year>.xlsx")
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Look up accounts
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("registrar=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        config: explicit_config,
        command,
    } = Cli::parse();
    let config = || config_path(explicit_config.as_deref());

    match command {
        Commands::Auth { command } => match command {
            AuthCommands::Login {
                server,
                token,
                role,
                non_interactive,
            } => run_auth_login(&config()?, server, token, role, non_interactive)?,
            AuthCommands::Logout => run_auth_logout(&config()?)?,
        },
        Commands::Term { command } => match command {
            TermCommands::Use {
                term_id,
                school_year,
                term,
                quarter,
                non_interactive,
            } => run_term_use(&config()?, term_id, school_year, term, quarter, non_interactive)?,
            TermCommands::Show { json } => run_term_show(&config()?, json)?,
        },
        Commands::Template { target, output } => run_template(target, output)?,
        Commands::Validate { args } => run_validate(&config()?, &args)?,
        Commands::Import {
            args,
            yes,
            non_interactive,
        } => run_import(&config()?, &args, yes, non_interactive)?,
        Commands::Export { output } => run_export(&config()?, output)?,
        Commands::Users { command } => match command {
            UsersCommands::Search { query, json } => run_users_search(&config()?, &query, json)?,
        },
    }

    Ok(())
}
