// Staybook CLI - host dashboards and loyalty points over exported documents

mod auth;
mod exit_codes;
mod payout;
mod points;
mod reports;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Args, Parser, Subcommand};
use serde::Serialize;
use staybook_gateway::GatewayError;
use staybook_insights::InsightsError;
use staybook_ledger::LedgerError;
use tracing_subscriber::EnvFilter;

use exit_codes::{
    ledger_error_kind, ledger_exit_code, EXIT_IO, EXIT_PARSE, EXIT_PAYOUT_FAILED, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "staybook")]
#[command(about = "Host dashboards and loyalty points for Staybook")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "STAYBOOK_SETTINGS")]
    settings: Option<PathBuf>,

    /// Print machine-readable JSON (errors go to stderr as JSON too)
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr (STAYBOOK_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Earnings, comparisons, top listings and check-in counts
    #[command(after_help = "\
Examples:
  staybook dashboard --reservations reservations.json --listings listings.json
  staybook dashboard --reservations reservations.json --host host-1 --json")]
    Dashboard {
        #[command(flatten)]
        input: ReservationInput,
    },

    /// Monthly revenue series, status distribution and chart geometry
    Analytics {
        #[command(flatten)]
        input: ReservationInput,

        /// Look-back window: 6months, 12months or all (defaults to settings)
        #[arg(long)]
        period: Option<String>,
    },

    /// Today's check-ins and upcoming stays
    Bookings {
        #[command(flatten)]
        input: ReservationInput,
    },

    /// Loyalty tier for a balance, or for a user in a store file
    #[command(group(ArgGroup::new("source").required(true).args(["balance", "user"])))]
    Tier {
        /// Points balance to classify
        #[arg(long, allow_hyphen_values = true)]
        balance: Option<i64>,

        /// User id (requires --store)
        #[arg(long, requires = "store")]
        user: Option<String>,

        /// Store file (JSON export: {collection: {id: document}})
        #[arg(long)]
        store: Option<PathBuf>,

        /// Also show the points a booking of this amount would earn
        #[arg(long)]
        booking: Option<String>,

        #[command(flatten)]
        loyalty: LoyaltyInput,
    },

    /// Points history and redemptions
    Points {
        #[command(subcommand)]
        command: PointsCommands,
    },

    /// Pay out wallet funds through the payment gateway
    #[command(group(ArgGroup::new("recipient").required(true).args(["email", "payer_id"])))]
    #[command(after_help = "\
Examples:
  staybook payout --email host@example.com --amount 42.50
  staybook payout --payer-id QYR5Z8XDVJNXQ --amount '$1,200' --currency USD")]
    Payout {
        /// Recipient email address
        #[arg(long)]
        email: Option<String>,

        /// Recipient payer id
        #[arg(long)]
        payer_id: Option<String>,

        /// Amount in currency units ("42.50", "$1,200")
        #[arg(long)]
        amount: String,

        /// ISO 4217 code (defaults to settings)
        #[arg(long)]
        currency: Option<String>,

        /// Saved session file (defaults to the per-user auth.json)
        #[arg(long, env = "STAYBOOK_AUTH")]
        auth: Option<PathBuf>,
    },

    /// Save a sign-in session for payouts
    #[command(after_help = "\
Examples:
  staybook login --token \"$ID_TOKEN\" --user host-1 --email host@example.com --email-verified")]
    Login {
        /// Bearer id token issued at sign-in
        #[arg(long, env = "STAYBOOK_TOKEN", hide_env_values = true)]
        token: String,

        /// User id the token belongs to
        #[arg(long)]
        user: String,

        /// Account email address
        #[arg(long)]
        email: Option<String>,

        /// The account email has been verified
        #[arg(long)]
        email_verified: bool,

        /// Session file to write (defaults to the per-user auth.json)
        #[arg(long, env = "STAYBOOK_AUTH")]
        auth: Option<PathBuf>,
    },

    /// Remove the saved sign-in session
    Logout {
        /// Session file to remove (defaults to the per-user auth.json)
        #[arg(long, env = "STAYBOOK_AUTH")]
        auth: Option<PathBuf>,
    },

    /// Settings file helpers
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum PointsCommands {
    /// Points transactions for a user, newest first
    History {
        #[command(flatten)]
        account: AccountInput,
    },

    /// Redeem points for wallet cash
    RedeemCash {
        #[command(flatten)]
        account: AccountInput,

        /// Cash option id (see `staybook points options`)
        #[arg(long)]
        option: String,

        /// Redemption time (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<String>,

        #[command(flatten)]
        loyalty: LoyaltyInput,
    },

    /// Redeem points for a catalogue reward
    RedeemReward {
        #[command(flatten)]
        account: AccountInput,

        /// Reward id (see `staybook points options`)
        #[arg(long)]
        reward: String,

        /// Redemption time (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<String>,

        #[command(flatten)]
        loyalty: LoyaltyInput,
    },

    /// Cash options and rewards in the programme
    Options {
        #[command(flatten)]
        loyalty: LoyaltyInput,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the settings file path
    Path,
}

#[derive(Args, Clone)]
pub struct ReservationInput {
    /// Reservations file (JSON array of documents)
    #[arg(long, short = 'r')]
    pub reservations: PathBuf,

    /// Listings file (JSON array of documents), used for titles
    #[arg(long, short = 'l')]
    pub listings: Option<PathBuf>,

    /// Only reservations and listings of this host
    #[arg(long)]
    pub host: Option<String>,

    /// Reference time (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Args, Clone)]
pub struct AccountInput {
    /// Store file (JSON export: {collection: {id: document}})
    #[arg(long)]
    pub store: PathBuf,

    /// User id
    #[arg(long)]
    pub user: String,
}

#[derive(Args, Clone)]
pub struct LoyaltyInput {
    /// Loyalty programme TOML (defaults to settings, then built-in)
    #[arg(long)]
    pub loyalty: Option<PathBuf>,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("STAYBOOK_COMMIT"), ")",
        "\ninsights: staybook-insights ", env!("CARGO_PKG_VERSION"),
        "\nledger:   staybook-ledger ", env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("STAYBOOK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    // Also installs the `log` bridge, so library records come through.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = util::load_settings(cli.settings.as_deref());
    let json = cli.json;

    let result = match cli.command {
        Commands::Dashboard { input } => reports::cmd_dashboard(&input, &settings, json),
        Commands::Analytics { input, period } => {
            reports::cmd_analytics(&input, period.as_deref(), &settings, json)
        }
        Commands::Bookings { input } => reports::cmd_bookings(&input, &settings, json),
        Commands::Tier { balance, user, store, booking, loyalty } => points::cmd_tier(
            points::TierSource::from_args(balance, user, store),
            booking.as_deref(),
            &loyalty,
            &settings,
            json,
        ),
        Commands::Points { command } => match command {
            PointsCommands::History { account } => points::cmd_history(&account, &settings, json),
            PointsCommands::RedeemCash { account, option, now, loyalty } => {
                points::cmd_redeem_cash(&account, &option, now.as_deref(), &loyalty, &settings, json)
            }
            PointsCommands::RedeemReward { account, reward, now, loyalty } => {
                points::cmd_redeem_reward(&account, &reward, now.as_deref(), &loyalty, &settings, json)
            }
            PointsCommands::Options { loyalty } => points::cmd_options(&loyalty, &settings, json),
        },
        Commands::Payout { email, payer_id, amount, currency, auth } => payout::cmd_payout(
            payout::PayoutArgs { email, payer_id, amount, currency, auth },
            &settings,
            json,
        ),
        Commands::Login { token, user, email, email_verified, auth } => {
            auth::cmd_login(auth::LoginArgs { token, user, email, email_verified, auth }, json)
        }
        Commands::Logout { auth } => auth::cmd_logout(auth.as_deref(), json),
        Commands::Settings { command } => match command {
            SettingsCommands::Path => {
                let path = cli
                    .settings
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(staybook_config::Settings::config_path_display);
                println!("{path}");
                Ok(())
            }
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            err.print(json);
            ExitCode::from(err.code)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CliError {
    #[serde(rename = "exit_code")]
    pub code: u8,
    #[serde(rename = "error")]
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliError {
    fn new(code: u8, kind: &'static str, msg: impl Into<String>) -> Self {
        Self { code, kind, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, "usage", msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, "io_error", msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(EXIT_PARSE, "parse_error", msg)
    }

    /// Create error from ledger error with proper exit code.
    pub fn ledger(err: LedgerError) -> Self {
        let hint = match &err {
            LedgerError::InsufficientPoints { required, available } => Some(format!(
                "{} more points needed; see `staybook points history`",
                required - available
            )),
            LedgerError::AccountNotFound(_) => {
                Some("check --user against the ids under \"users\" in the store file".to_string())
            }
            LedgerError::UnknownCashOption(_) | LedgerError::UnknownReward(_) => {
                Some("run `staybook points options` to list valid ids".to_string())
            }
            LedgerError::ConfigParse(_) | LedgerError::ConfigValidation(_) => {
                Some("check --loyalty or loyalty.configPath in settings".to_string())
            }
            LedgerError::NotAuthenticated => {
                Some("run `staybook login` or pass --auth".to_string())
            }
            LedgerError::EmailNotVerified => {
                Some("verify the account email before requesting payouts".to_string())
            }
            _ => None,
        };
        Self {
            code: ledger_exit_code(&err),
            kind: ledger_error_kind(&err),
            message: err.to_string(),
            hint,
        }
    }

    pub fn gateway(err: GatewayError) -> Self {
        Self::new(EXIT_PAYOUT_FAILED, "payout_failed", err.to_string())
            .with_hint("check gateway.apiBase in settings")
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Print to stderr (human-readable by default).
    pub fn print(&self, json: bool) {
        if json {
            match serde_json::to_string(self) {
                Ok(output) => eprintln!("{}", output),
                Err(_) => eprintln!("error: {}", self.message),
            }
            return;
        }
        eprintln!("error: {}", self.message);
        if let Some(hint) = &self.hint {
            eprintln!("hint:  {}", hint);
        }
    }
}

impl From<LedgerError> for CliError {
    fn from(err: LedgerError) -> Self {
        Self::ledger(err)
    }
}

impl From<InsightsError> for CliError {
    fn from(err: InsightsError) -> Self {
        Self::args(err.to_string())
    }
}

impl From<GatewayError> for CliError {
    fn from(err: GatewayError) -> Self {
        Self::gateway(err)
    }
}

impl From<staybook_core::StoreError> for CliError {
    fn from(err: staybook_core::StoreError) -> Self {
        Self::ledger(LedgerError::Store(err))
    }
}
