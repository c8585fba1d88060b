use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use talkrix_core::models::CallStatus;
use talkrix_core::models::CallType;
use talkrix_core::models::StatsPeriod;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;
mod ui;

use context::AppContext;

#[derive(Parser)]
#[command(name = "talkrix")]
#[command(about = "Talkrix: manage AI voice agents, campaigns and call history")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config and TALKRIX_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "TALKRIX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "TALKRIX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Full-screen dashboard
    Ui,
    /// Aggregate dashboard stats
    Stats {
        #[arg(long, value_enum, default_value_t = PeriodArg::Today)]
        period: PeriodArg,
    },
    #[command(subcommand)]
    Agents(AgentCommand),
    #[command(subcommand)]
    Tools(ToolCommand),
    #[command(subcommand)]
    Campaigns(CampaignCommand),
    #[command(subcommand)]
    Contacts(ContactCommand),
    #[command(subcommand)]
    Calls(CallCommand),
    /// Knowledge bases
    #[command(subcommand)]
    Corpora(CorpusCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Show or regenerate the account API key
    ApiKey {
        #[arg(long)]
        regenerate: bool,
        /// Copy the key to the clipboard instead of printing it
        #[arg(long)]
        copy: bool,
    },
    #[command(subcommand)]
    Tour(TourCommand),
}

#[derive(Args, Clone, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive substring filter
    #[arg(long, short = 's')]
    pub search: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub per_page: Option<usize>,
}

#[derive(Subcommand)]
pub enum AgentCommand {
    List(ListArgs),
    Show {
        id: String,
    },
    Create(AgentFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: AgentFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct AgentFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub prompt: Option<String>,
    #[arg(long)]
    pub voice: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub temperature: Option<f32>,
    /// Tool to attach (repeatable)
    #[arg(long = "tool")]
    pub tools: Vec<String>,
}

#[derive(Subcommand)]
pub enum ToolCommand {
    /// User tools plus the built-in catalogue
    List(ListArgs),
    Show {
        id: String,
    },
    Create(ToolFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: ToolFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct ToolFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub method: Option<String>,
}

#[derive(Subcommand)]
pub enum CampaignCommand {
    List(ListArgs),
    /// Campaign detail with its stats
    Show {
        id: String,
    },
    Create(CampaignFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: CampaignFields,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct CampaignFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub agent: Option<String>,
    #[arg(long)]
    pub from_number: Option<String>,
    #[arg(long)]
    pub scheduled_at: Option<String>,
}

#[derive(Subcommand)]
pub enum ContactCommand {
    List {
        campaign: String,
        #[command(flatten)]
        list: ListArgs,
    },
    Add {
        campaign: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    Update {
        campaign: String,
        contact: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    Delete {
        campaign: String,
        contact: String,
    },
    /// Bulk import from a CSV file
    Upload {
        campaign: String,
        file: PathBuf,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct ContactFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Subcommand)]
pub enum CallCommand {
    List(CallArgs),
    /// Write the filtered page to call-history-YYYY-MM-DD.csv
    Export {
        #[command(flatten)]
        args: CallArgs,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    Stats,
}

#[derive(Args, Clone, Debug)]
pub struct CallArgs {
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    #[arg(long = "type", value_enum)]
    pub call_type: Option<TypeArg>,
    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Subcommand)]
pub enum CorpusCommand {
    List(ListArgs),
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
    Sources {
        id: String,
    },
    AddSource {
        id: String,
        #[arg(long)]
        name: String,
        /// Start URL to crawl (repeatable)
        #[arg(long = "url", required = true)]
        urls: Vec<String>,
        #[arg(long)]
        max_documents: Option<u64>,
    },
    DeleteSource {
        id: String,
        source: String,
    },
    Documents {
        id: String,
    },
    DeleteDocument {
        id: String,
        document: String,
    },
    /// Upload a file through a presigned URL and register it
    Upload {
        id: String,
        file: PathBuf,
        #[arg(long)]
        source: Option<String>,
    },
    Query {
        id: String,
        query: String,
        #[arg(long, default_value_t = talkrix_api::DEFAULT_MAX_RESULTS)]
        max_results: usize,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    Show,
    Update {
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long)]
        default_agent: Option<String>,
        #[arg(long)]
        max_concurrent_calls: Option<u32>,
        #[arg(long)]
        max_call_duration: Option<u32>,
    },
    Telephony {
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        account_sid: Option<String>,
        #[arg(long)]
        auth_token: Option<String>,
        /// Replaces the phone number list (repeatable)
        #[arg(long = "phone")]
        phones: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum TourCommand {
    Status,
    /// Forget completion so the tour opens again
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Today,
    Week,
    Month,
}

impl From<PeriodArg> for StatsPeriod {
    fn from(value: PeriodArg) -> Self {
        match value {
            PeriodArg::Today => Self::Today,
            PeriodArg::Week => Self::Week,
            PeriodArg::Month => Self::Month,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Completed,
    InProgress,
    Failed,
    NoAnswer,
    Busy,
}

impl From<StatusArg> for CallStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Completed => Self::Completed,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Failed => Self::Failed,
            StatusArg::NoAnswer => Self::NoAnswer,
            StatusArg::Busy => Self::Busy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    Inbound,
    Outbound,
    Web,
}

impl From<TypeArg> for CallType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Inbound => Self::Inbound,
            TypeArg::Outbound => Self::Outbound,
            TypeArg::Web => Self::Web,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Some(Command::Ui) | None);
    init_tracing(interactive);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

/// Commands log to stderr. The dashboard owns the terminal, so it logs to a
/// file in the data directory instead.
fn init_tracing(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if interactive {
        if let Some(file) = context::data_dir()
            .ok()
            .and_then(|dir| std::fs::File::create(dir.join(context::LOG_FILE)).ok())
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = AppContext::load(cli.api_url)?;

    match cli.command.unwrap_or(Command::Ui) {
        Command::Login { email, password } => commands::login(&mut ctx, email, password).await,
        Command::Register {
            name,
            email,
            password,
        } => commands::register(&mut ctx, name, email, password).await,
        Command::Logout => commands::logout(&mut ctx),
        Command::Whoami => commands::whoami(&mut ctx),
        Command::Ui => ui::launch(ctx).await,
        Command::Stats { period } => commands::stats(&mut ctx, period.into()).await,
        Command::Agents(command) => commands::agents(&mut ctx, command).await,
        Command::Tools(command) => commands::tools(&mut ctx, command).await,
        Command::Campaigns(command) => commands::campaigns(&mut ctx, command).await,
        Command::Contacts(command) => commands::contacts(&mut ctx, command).await,
        Command::Calls(command) => commands::calls(&mut ctx, command).await,
        Command::Corpora(command) => commands::corpora(&mut ctx, command).await,
        Command::Settings(command) => commands::settings(&mut ctx, command).await,
        Command::ApiKey { regenerate, copy } => commands::api_key(&mut ctx, regenerate, copy).await,
        Command::Tour(command) => commands::tour(&mut ctx, command).await,
    }
}
