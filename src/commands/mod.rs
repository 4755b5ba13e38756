mod config_cmd;
mod login;
mod logout;
mod plan;
mod requests;
mod whoami;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{AthleteId, CoachId, RelationStatus};
use crate::session::Session;

pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use plan::{ListArgs, PlanArgs, SendArgs};
pub use whoami::WhoamiCommand;

#[derive(Parser)]
#[command(name = "athlete-results")]
#[command(about = "Terminal client for weekly athlete training plans", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "ATHLETE_RESULTS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the API base URL from the configuration
    #[arg(long, global = true, env = "ATHLETE_RESULTS_API")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the platform
    Login(LoginCommand),

    /// Sign out and forget the stored session
    Logout(LogoutCommand),

    /// Show the signed-in user
    Whoami(WhoamiCommand),

    /// Weekly training plans
    #[command(subcommand)]
    Plan(PlanSubcommands),

    /// Coach link requests
    #[command(subcommand)]
    Requests(RequestsSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum PlanSubcommands {
    /// Print a week of plans
    Show(PlanArgs),

    /// Open the interactive weekly plan view
    Edit(PlanArgs),

    /// Send predictions or actuals for some days without opening the view
    Send(SendArgs),

    /// List plan entries matching a filter
    List(ListArgs),
}

#[derive(Subcommand)]
enum RequestsSubcommands {
    /// List coaches by the state of their link request
    List {
        /// Request state to list
        #[arg(short, long, value_enum, default_value = "pending")]
        status: RelationStatus,
    },

    /// Accept a coach's link request
    Accept {
        #[arg(long)]
        coach_id: CoachId,
    },

    /// Refuse a coach's link request
    Refuse {
        #[arg(long)]
        coach_id: CoachId,
    },

    /// Ask an athlete again to accept the link (coach only)
    Resend {
        #[arg(long)]
        athlete_id: AthleteId,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Configuration plus command-line overrides shared by all commands
pub struct Context {
    pub config: Config,
    api_url: Option<String>,
}

impl Context {
    pub fn load(config: Option<&Path>, api_url: Option<String>) -> Result<Self> {
        Ok(Self {
            config: Config::load_from(config)?,
            api_url,
        })
    }

    /// API client for the configured server, authenticated by the stored session
    pub fn api(&self) -> Result<ApiClient> {
        match &self.api_url {
            Some(url) => {
                let mut config = self.config.clone();
                config.api.base_url = url.clone();
                ApiClient::new(&config)
            }
            None => ApiClient::new(&self.config),
        }
    }

    /// The stored session, or an error telling the user to sign in
    pub fn session(&self) -> Result<&Session> {
        self.config.session.validate().map_err(|_| {
            anyhow::anyhow!("You are not logged in. Use 'athlete-results login' to authenticate.")
        })
    }
}

impl Cli {
    /// The command takes over the terminal screen
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, Commands::Plan(PlanSubcommands::Edit(_)))
    }

    /// Log file kept next to the configuration file
    pub fn log_file(&self) -> Result<PathBuf> {
        let dir = match self.config.as_deref().and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Config::config_dir()?,
        };
        Ok(dir.join("athlete-results.log"))
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Commands::Completions { shell } = self.command {
            generate_completions(shell);
            return Ok(());
        }

        let mut ctx = Context::load(self.config.as_deref(), self.api_url)?;

        match self.command {
            Commands::Login(cmd) => cmd.execute(&mut ctx).await,
            Commands::Logout(cmd) => cmd.execute(&mut ctx).await,
            Commands::Whoami(cmd) => cmd.execute(&ctx).await,
            Commands::Plan(subcmd) => match subcmd {
                PlanSubcommands::Show(args) => plan::show(&ctx, args).await,
                PlanSubcommands::Edit(args) => plan::edit(&ctx, args).await,
                PlanSubcommands::Send(args) => plan::send(&ctx, args).await,
                PlanSubcommands::List(args) => plan::list(&ctx, args).await,
            },
            Commands::Requests(subcmd) => match subcmd {
                RequestsSubcommands::List { status } => requests::list(&ctx, status).await,
                RequestsSubcommands::Accept { coach_id } => {
                    requests::decide(&ctx, coach_id, RelationStatus::Accept).await
                }
                RequestsSubcommands::Refuse { coach_id } => {
                    requests::decide(&ctx, coach_id, RelationStatus::Refuse).await
                }
                RequestsSubcommands::Resend { athlete_id } => {
                    requests::resend(&ctx, athlete_id).await
                }
            },
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&ctx),
                ConfigSubcommands::Edit => config_cmd::edit_config(&ctx),
                ConfigSubcommands::Init { force } => config_cmd::init_config(&ctx, force),
            },
            Commands::Completions { .. } => Ok(()),
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
