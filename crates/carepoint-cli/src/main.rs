use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use eyre::Result;

use carepoint_cli::config::{self, CarepointConfig, CredentialSource};
use carepoint_cli::{aws, commands, logging};
use carepoint_core::filter::ALL;
use carepoint_records::Stores;
use carepoint_records::notify::TracingNotifier;

#[derive(Parser)]
#[command(name = "carepoint")]
#[command(about = "Clinical symptom assessments, protocols and reference tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the config file
    Configure(ConfigureArgs),
    /// Inspect the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print the symptom catalog
    Catalog,
    Assessments {
        #[command(subcommand)]
        command: AssessmentCommand,
    },
    Protocols {
        #[command(subcommand)]
        command: ProtocolCommand,
    },
    References {
        #[command(subcommand)]
        command: ReferenceCommand,
    },
}

#[derive(Args)]
struct ConfigureArgs {
    #[arg(long)]
    region: String,
    /// Bucket holding the records
    #[arg(long)]
    bucket: String,
    /// S3-compatible endpoint instead of AWS
    #[arg(long)]
    endpoint_url: Option<String>,
    /// Named AWS profile
    #[arg(long, conflicts_with = "access_key_id")]
    profile: Option<String>,
    #[arg(long, requires = "secret_access_key")]
    access_key_id: Option<String>,
    #[arg(long, requires = "access_key_id")]
    secret_access_key: Option<String>,
    #[arg(long, requires = "access_key_id")]
    session_token: Option<String>,
    /// Save without checking that the bucket is reachable
    #[arg(long)]
    skip_check: bool,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the config with secrets redacted
    Show,
}

#[derive(Subcommand)]
enum AssessmentCommand {
    /// List assessments, newest first
    List {
        /// Matches patient id or chief complaint
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = ALL, value_parser = [ALL, "Draft", "In Progress", "Complete"])]
        status: String,
    },
    Show {
        id: i64,
    },
    /// Create an assessment
    New {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        complaint: String,
        /// Symptom rating as NAME=N, e.g. --severity "Chest Pain=4"
        #[arg(long = "severity", value_parser = commands::parse_severity)]
        severities: Vec<(u32, u8)>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum ProtocolCommand {
    List {
        /// Matches title or content
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = ALL)]
        category: String,
    },
}

#[derive(Subcommand)]
enum ReferenceCommand {
    List {
        /// Matches title or description
        #[arg(long, default_value = "")]
        query: String,
        /// Reference type, e.g. "Calculator"
        #[arg(long, default_value = ALL)]
        kind: String,
    },
}

async fn stores() -> Result<Stores> {
    if !config::has_config() {
        return Err(eyre::eyre!("no config found; run `carepoint configure` first"));
    }
    let config = config::load_config()?;
    let service = aws::record_service(&config).await;
    Ok(Stores::new(Arc::new(service), Arc::new(TracingNotifier)))
}

async fn configure(args: ConfigureArgs) -> Result<String> {
    let ConfigureArgs {
        region,
        bucket,
        endpoint_url,
        profile,
        access_key_id,
        secret_access_key,
        session_token,
        skip_check,
    } = args;

    let credentials = match (profile, access_key_id, secret_access_key) {
        (Some(profile_name), _, _) => {
            if !aws::list_aws_profiles().contains(&profile_name) && profile_name != "default" {
                tracing::warn!(profile = %profile_name, "profile not found in ~/.aws");
            }
            CredentialSource::Profile { profile_name }
        }
        (None, Some(access_key_id), Some(secret_access_key)) => CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token,
        },
        _ => CredentialSource::DefaultChain,
    };

    let config = CarepointConfig {
        config_version: config::CURRENT_VERSION,
        region,
        bucket,
        endpoint_url,
        created_at: jiff::Timestamp::now(),
        credentials,
    };

    if !skip_check {
        let client = aws::s3_client(&config).await;
        aws::check_bucket(&client, &config.bucket).await?;
    }

    let path = config::save_config(&config)?;
    Ok(format!("saved {}\n", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.json);

    let output = match cli.command {
        Command::Configure(args) => configure(args).await?,
        Command::Config {
            command: ConfigCommand::Show,
        } => commands::config_text(&config::config_info(&config::load_config()?))?,
        Command::Catalog => commands::catalog_text(),
        Command::Assessments { command } => {
            let stores = stores().await?;
            match command {
                AssessmentCommand::List { query, status } => {
                    commands::list_assessments(&stores, &query, &status).await?
                }
                AssessmentCommand::Show { id } => commands::show_assessment(&stores, id).await?,
                AssessmentCommand::New {
                    patient,
                    complaint,
                    severities,
                } => commands::new_assessment(&stores, patient, complaint, &severities).await?,
                AssessmentCommand::Delete { id } => commands::delete_assessment(&stores, id).await?,
            }
        }
        Command::Protocols {
            command: ProtocolCommand::List { query, category },
        } => commands::list_protocols(&stores().await?, &query, &category).await?,
        Command::References {
            command: ReferenceCommand::List { query, kind },
        } => commands::list_references(&stores().await?, &query, &kind).await?,
    };

    print!("{output}");
    Ok(())
}
