//! Command-line surface
//!
//! Argument definitions and dispatch onto the library services.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use planetscale::{
    CancelDeployRequest, Client, CloseDeployRequestRequest, CreateDeployRequestRequest,
    DatabaseBranchPasswordRequest, DeleteDatabaseBranchPasswordRequest, DeployRequestsService,
    GetDatabaseBranchPasswordRequest, GetDeployRequestRequest, ListDatabaseBranchPasswordRequest,
    ListDeployRequestsRequest, PasswordsService, PerformDeployRequest, ReviewDeployRequestRequest,
    ReviewState,
};
use serde::Serialize;

use crate::config::Config;

/// Command-line client for the PlanetScale API
#[derive(Parser, Debug)]
#[command(name = "pscale", version, about, long_about = None)]
pub struct Cli {
    /// Organization to operate on
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// Database to operate on
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// API endpoint override
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage deploy requests
    #[command(alias = "dr")]
    DeployRequest {
        #[command(subcommand)]
        command: DeployRequestCommand,
    },

    /// Manage branch passwords
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },

    /// Show or change the stored defaults
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum DeployRequestCommand {
    /// List deploy requests of the database
    List,
    /// Open a deploy request
    Create {
        /// Branch with the schema changes
        branch: String,
        /// Branch to deploy into
        #[arg(long, default_value = "main")]
        into: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Show a deploy request
    Show { number: u64 },
    /// Deploy an approved deploy request
    Deploy { number: u64 },
    /// Cancel a queued deploy
    Cancel { number: u64 },
    /// Close a deploy request without deploying it
    Close { number: u64 },
    /// Review a deploy request
    Review {
        number: u64,
        #[arg(long, value_enum, default_value = "commented")]
        state: ReviewArg,
        #[arg(long, default_value = "")]
        body: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReviewArg {
    Approved,
    Commented,
    RequestedChanges,
}

impl From<ReviewArg> for ReviewState {
    fn from(arg: ReviewArg) -> Self {
        match arg {
            ReviewArg::Approved => ReviewState::Approved,
            ReviewArg::Commented => ReviewState::Commented,
            ReviewArg::RequestedChanges => ReviewState::RequestedChanges,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum PasswordCommand {
    /// Create a password. The plaintext is shown only once.
    Create {
        branch: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// List passwords of a branch
    List { branch: String },
    /// Show a password
    Show { branch: String, id: String },
    /// Delete a password
    Delete { branch: String, id: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the stored configuration
    Show,
    /// Store the default organization
    SetOrg { name: String },
    /// Store the default database
    SetDb { name: String },
    /// Store an API endpoint override
    SetBaseUrl { url: String },
}

/// Organization and database resolved from flags, env and config
#[derive(Debug, Clone)]
pub struct Target {
    pub organization: Option<String>,
    pub database: Option<String>,
}

impl Target {
    fn organization(&self) -> Result<String> {
        self.organization
            .clone()
            .context("No organization set. Pass --org, set PLANETSCALE_ORG or run 'pscale config set-org'")
    }

    fn database(&self) -> Result<String> {
        self.database
            .clone()
            .context("No database set. Pass --database, set PLANETSCALE_DATABASE or run 'pscale config set-db'")
    }
}

/// Serialize a value in the requested output format
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

/// Handle `pscale config ...`; needs no client
pub fn run_config(command: &ConfigCommand, config: &mut Config, format: OutputFormat) -> Result<String> {
    match command {
        ConfigCommand::Show => render(config, format),
        ConfigCommand::SetOrg { name } => {
            config.set_organization(name)?;
            Ok(format!("Default organization set to {}", name))
        }
        ConfigCommand::SetDb { name } => {
            config.set_database(name)?;
            Ok(format!("Default database set to {}", name))
        }
        ConfigCommand::SetBaseUrl { url } => {
            url::Url::parse(url).with_context(|| format!("Invalid URL {:?}", url))?;
            config.set_base_url(url)?;
            Ok(format!("API endpoint set to {}", url))
        }
    }
}

pub async fn run_deploy_requests(
    service: &dyn DeployRequestsService,
    command: &DeployRequestCommand,
    target: &Target,
    format: OutputFormat,
) -> Result<String> {
    let organization = target.organization()?;
    let database = target.database()?;

    match command {
        DeployRequestCommand::List => {
            let requests = service
                .list(&ListDeployRequestsRequest { organization, database })
                .await?;
            render(&requests, format)
        }
        DeployRequestCommand::Create { branch, into, notes } => {
            let dr = service
                .create(&CreateDeployRequestRequest {
                    organization,
                    database,
                    branch: branch.clone(),
                    into_branch: into.clone(),
                    notes: notes.clone(),
                })
                .await?;
            render(&dr, format)
        }
        DeployRequestCommand::Show { number } => {
            let dr = service
                .get(&GetDeployRequestRequest { organization, database, number: *number })
                .await?;
            render(&dr, format)
        }
        DeployRequestCommand::Deploy { number } => {
            let dr = service
                .deploy(&PerformDeployRequest { organization, database, number: *number })
                .await?;
            render(&dr, format)
        }
        DeployRequestCommand::Cancel { number } => {
            let dr = service
                .cancel_deploy(&CancelDeployRequest { organization, database, number: *number })
                .await?;
            render(&dr, format)
        }
        DeployRequestCommand::Close { number } => {
            let dr = service
                .close(&CloseDeployRequestRequest { organization, database, number: *number })
                .await?;
            render(&dr, format)
        }
        DeployRequestCommand::Review { number, state, body } => {
            let review = service
                .create_review(&ReviewDeployRequestRequest {
                    organization,
                    database,
                    number: *number,
                    body: body.clone(),
                    state: (*state).into(),
                })
                .await?;
            render(&review, format)
        }
    }
}

pub async fn run_passwords(
    service: &dyn PasswordsService,
    command: &PasswordCommand,
    target: &Target,
    format: OutputFormat,
) -> Result<String> {
    let organization = target.organization()?;
    let database = target.database()?;

    match command {
        PasswordCommand::Create { branch, name, role } => {
            let password = service
                .create(&DatabaseBranchPasswordRequest {
                    organization,
                    database,
                    branch: branch.clone(),
                    display_name: name.clone(),
                    role: role.clone(),
                })
                .await?;
            render(&password, format)
        }
        PasswordCommand::List { branch } => {
            let passwords = service
                .list(&ListDatabaseBranchPasswordRequest {
                    organization,
                    database,
                    branch: branch.clone(),
                })
                .await?;
            render(&passwords, format)
        }
        PasswordCommand::Show { branch, id } => {
            let password = service
                .get(&GetDatabaseBranchPasswordRequest {
                    organization,
                    database,
                    branch: branch.clone(),
                    password_id: id.clone(),
                })
                .await?;
            render(&password, format)
        }
        PasswordCommand::Delete { branch, id } => {
            service
                .delete(&DeleteDatabaseBranchPasswordRequest {
                    organization,
                    database,
                    branch: branch.clone(),
                    password_id: id.clone(),
                })
                .await?;
            Ok(format!("Password {} deleted", id))
        }
    }
}

/// Dispatch an API command against a built client
pub async fn run(command: &Command, client: &Client, target: &Target, format: OutputFormat) -> Result<String> {
    match command {
        Command::DeployRequest { command } => {
            run_deploy_requests(&client.deploy_requests, command, target, format).await
        }
        Command::Password { command } => run_passwords(&client.passwords, command, target, format).await,
        Command::Config { .. } => anyhow::bail!("config commands do not talk to the API"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_review() {
        let cli = Cli::try_parse_from([
            "pscale", "--org", "o", "-d", "db", "dr", "review", "3", "--state", "requested-changes",
        ])
        .unwrap();
        assert_eq!(cli.org.as_deref(), Some("o"));
        match cli.command {
            Command::DeployRequest {
                command: DeployRequestCommand::Review { number, state, .. },
            } => {
                assert_eq!(number, 3);
                assert_eq!(ReviewState::from(state), ReviewState::RequestedChanges);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_org_is_reported() {
        let target = Target { organization: None, database: Some("db".to_string()) };
        let err = target.organization().unwrap_err();
        assert!(err.to_string().contains("No organization set"));
    }

    #[test]
    fn test_render_yaml() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
        }
        let out = render(&Row { name: "main" }, OutputFormat::Yaml).unwrap();
        assert_eq!(out.trim(), "name: main");
    }
}
