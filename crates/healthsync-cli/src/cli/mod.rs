//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use healthsync_core::api::types::Role;
use healthsync_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "healthsync")]
#[command(version)]
#[command(about = "HealthSync patient portal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in to the portal
    Login {
        /// Account email address
        email: String,

        /// Password (falls back to HEALTHSYNC_PASSWORD, then prompts)
        #[arg(long, env = "HEALTHSYNC_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create a new account (does not log you in)
    Register {
        /// Account email address
        email: String,

        /// Password (falls back to HEALTHSYNC_PASSWORD, then prompts)
        #[arg(long, env = "HEALTHSYNC_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Full name
        #[arg(long)]
        full_name: String,

        /// Account role (patient or clinician)
        #[arg(long, default_value = "patient")]
        role: Role,

        /// Medical license number (clinicians)
        #[arg(long)]
        license_number: Option<String>,

        /// Medical specialty (clinicians)
        #[arg(long)]
        specialty: Option<String>,

        /// Date of birth, YYYY-MM-DD (patients)
        #[arg(long)]
        date_of_birth: Option<String>,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Log out and delete the stored credential
    Logout,

    /// Show the currently authenticated account
    Whoami,

    /// Show the account dashboard
    Dashboard,

    /// Manage medical documents
    Documents {
        #[command(subcommand)]
        command: DocumentCommands,
    },

    /// Ask a question about your health records
    Analyze {
        /// The question to ask
        query: String,

        /// Restrict the analysis to specific document IDs
        #[arg(long = "document", value_name = "ID")]
        document_ids: Vec<String>,

        /// Kind of analysis to run
        #[arg(long, default_value = "general")]
        analysis_type: String,
    },

    /// Wearable device integration
    Wearable {
        #[command(subcommand)]
        command: WearableCommands,
    },

    /// Generate and download health reports
    Reports {
        #[command(subcommand)]
        command: ReportCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Check backend availability
    Health,
}

#[derive(clap::Subcommand)]
enum DocumentCommands {
    /// List uploaded documents
    List,
    /// Upload a document
    Upload {
        /// Path of the file to upload
        #[arg(value_name = "FILE")]
        file: std::path::PathBuf,

        /// Patient the document belongs to (clinicians only)
        #[arg(long)]
        patient_id: Option<String>,

        /// Document category (lab_report, prescription, imaging, ...)
        #[arg(long, default_value = "general")]
        document_type: String,
    },
    /// Download a document
    Download {
        /// The ID of the document to download
        #[arg(value_name = "DOCUMENT_ID")]
        id: String,

        /// Where to write the file (defaults to the stored filename)
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
}

#[derive(clap::Subcommand)]
enum WearableCommands {
    /// Print the authorization URL for a provider (google or fitbit)
    Connect {
        #[arg(value_name = "PROVIDER")]
        provider: String,
    },
    /// Fetch synced wearable data
    Data {
        /// Metric to fetch (steps, heart_rate, sleep, ...)
        #[arg(long, default_value = "steps")]
        data_type: String,

        /// Start of the range, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// End of the range, YYYY-MM-DD
        #[arg(long)]
        end: String,
    },
}

#[derive(clap::Subcommand)]
enum ReportCommands {
    /// Generate a new report
    Generate {
        /// Report kind (comprehensive, summary, ...)
        #[arg(long, default_value = "comprehensive")]
        report_type: String,
    },
    /// Download a generated report
    Download {
        /// The ID of the report to download
        #[arg(value_name = "REPORT_ID")]
        id: String,

        /// Where to write the file
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the backend server URL
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthsync=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, &email, password).await
        }

        Commands::Register {
            email,
            password,
            full_name,
            role,
            license_number,
            specialty,
            date_of_birth,
            phone,
        } => {
            commands::auth::register(
                &config,
                commands::auth::RegisterArgs {
                    email,
                    password,
                    full_name,
                    role,
                    license_number,
                    specialty,
                    date_of_birth,
                    phone,
                },
            )
            .await
        }

        Commands::Logout => commands::auth::logout(&config).await,

        Commands::Whoami => commands::auth::whoami(&config).await,

        Commands::Dashboard => commands::dashboard::show(&config).await,

        Commands::Documents { command } => match command {
            DocumentCommands::List => commands::documents::list(&config).await,
            DocumentCommands::Upload {
                file,
                patient_id,
                document_type,
            } => {
                commands::documents::upload(&config, &file, patient_id.as_deref(), &document_type)
                    .await
            }
            DocumentCommands::Download { id, output } => {
                commands::documents::download(&config, &id, output.as_deref()).await
            }
        },

        Commands::Analyze {
            query,
            document_ids,
            analysis_type,
        } => commands::analyze::run(&config, &query, document_ids, &analysis_type).await,

        Commands::Wearable { command } => match command {
            WearableCommands::Connect { provider } => {
                commands::wearable::connect(&config, &provider).await
            }
            WearableCommands::Data {
                data_type,
                start,
                end,
            } => commands::wearable::data(&config, &data_type, &start, &end).await,
        },

        Commands::Reports { command } => match command {
            ReportCommands::Generate { report_type } => {
                commands::reports::generate(&config, &report_type).await
            }
            ReportCommands::Download { id, output } => {
                commands::reports::download(&config, &id, output.as_deref()).await
            }
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },

        Commands::Health => commands::health::check(&config).await,
    }
}
