//! Clap derive structures for the `aadhar` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of workspace dependencies so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aadhar -- browse the Aadhar record service from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "aadhar",
    version,
    about = "Browse Aadhar user records from the command line",
    long_about = "Sign in to an Aadhar record service, page through user records,\n\
        and inspect your own profile.\n\n\
        Access tokens are refreshed automatically; run `aadhar login` again\n\
        when the session can no longer be renewed.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where session tokens are kept (overrides config)
    #[arg(long, global = true)]
    pub store: Option<StoreArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AADHAR_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StoreArg {
    /// session.json in the platform data directory
    File,
    /// OS keyring
    Keyring,
    /// Process memory; forgotten when the command exits
    Memory,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store a session
    Login(LoginArgs),

    /// Create a new account
    Register(RegisterArgs),

    /// Forget the stored session
    Logout,

    /// Show whether a session is stored
    Status,

    /// List user records, one page at a time
    #[command(alias = "ls")]
    Data(DataArgs),

    /// Show the signed-in user's profile
    #[command(alias = "me")]
    Profile,

    /// Print the backend's OpenAPI document
    Swagger,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted if omitted)
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Username (prompted if omitted)
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Email address (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// 12-digit Aadhar number (prompted if omitted)
    #[arg(long, short = 'a')]
    pub aadhar: Option<String>,

    /// Read the password from stdin instead of prompting; it is used as
    /// the confirmation as well
    #[arg(long)]
    pub password_stdin: bool,
}

// ── Data ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DataArgs {
    /// Page number, starting at 1
    #[arg(long, short = 'p', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page (defaults to config `page_size`)
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Ask the backend to decrypt Aadhar numbers
    #[arg(long, conflicts_with = "raw")]
    pub decrypted: bool,

    /// Show Aadhar numbers as stored (default)
    #[arg(long)]
    pub raw: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
