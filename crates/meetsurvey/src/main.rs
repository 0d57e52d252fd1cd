//! `meetsurvey` - CLI for the post-meeting survey service
//!
//! This binary runs the survey web server and provides helpers for building
//! survey links and inspecting contacts and configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;

use meetsurvey::cli::{Cli, Command, ConfigCommand, ContactsCommand, LinkCommand, ServeCommand};
use meetsurvey::survey::LinkQuery;
use meetsurvey::{init_logging, open_store, serve, AppState, Config, ContactIdentity, NewContact};

const REDACTED: &str = "<redacted>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match cli.command {
        Command::Serve(cmd) => handle_serve(cli.config, cmd).await,
        Command::Link(cmd) => handle_link(cli.config, &cmd),
        Command::Contacts(cmd) => handle_contacts(cli.config, cmd).await,
        Command::Config(cmd) => handle_config(cli.config, cmd),
    }
}

async fn handle_serve(config_path: Option<PathBuf>, cmd: ServeCommand) -> anyhow::Result<()> {
    let mut config = Config::load_from(config_path)?;
    if let Some(bind) = cmd.bind {
        config.server.bind = bind;
    }
    config.validate()?;

    let store = open_store(&config).context("failed to open contact store")?;
    serve(AppState::new(store, config)).await?;
    Ok(())
}

fn handle_link(config_path: Option<PathBuf>, cmd: &LinkCommand) -> anyhow::Result<()> {
    let config = Config::load_from(config_path)?;
    let link = LinkQuery {
        contact_id: Some(cmd.contact_id.clone()),
        survey_type: Some(meetsurvey::SurveyVariant::from(cmd.survey_type).to_string()),
        date: cmd.date.clone(),
    }
    .resolve(Local::now().date_naive())?;

    println!("{}", link.to_url(&config.server.public_url)?);
    Ok(())
}

async fn handle_contacts(config_path: Option<PathBuf>, cmd: ContactsCommand) -> anyhow::Result<()> {
    let config = Config::load_validated(config_path)?;
    let store = open_store(&config)?;

    match cmd {
        ContactsCommand::Add {
            first_name,
            last_name,
            company,
        } => {
            let id = store
                .create_contact(&NewContact {
                    identity: ContactIdentity {
                        first_name: Some(first_name),
                        last_name: Some(last_name),
                        company,
                    },
                    notes: None,
                })
                .await?;
            println!("{id}");
        }
        ContactsCommand::Show { id, json } => {
            let contact = store.fetch_contact(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&contact)?);
            } else {
                println!("Contact {}", contact.id);
                println!("=================");
                println!("  Name:           {}", contact.identity.display_name());
                println!(
                    "  Company:        {}",
                    contact.identity.company().unwrap_or("-")
                );
                println!(
                    "  Last contacted: {}",
                    contact.last_contacted.as_deref().unwrap_or("never")
                );
                println!();
                println!("[Notes]");
                match contact.notes.as_deref() {
                    Some(notes) if !notes.is_empty() => println!("{notes}"),
                    _ => println!("  (none)"),
                }
            }
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let mut config = Config::load_from(config_path)?;
            if !config.store.api_key.is_empty() {
                config.store.api_key = REDACTED.to_string();
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind:          {}", config.server.bind);
                println!("  Public URL:    {}", config.server.public_url);
                println!();
                println!("[Store]");
                println!("  Backend:       {}", config.store.backend);
                println!("  URL:           {}", config.store.url);
                println!("  API key:       {}", config.store.api_key);
                println!("  Table:         {}", config.store.table);
                println!("  Timeout (s):   {}", config.store.timeout_secs);
                println!("  Database path: {}", config.database_path().display());
                println!();
                println!("[Branding]");
                println!("  Company:       {}", config.branding.company_name);
                println!("  Host:          {}", config.branding.host_name);
                println!("  Header style:  {:?}", config.branding.header_style);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.or(config_path).unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_validated(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
