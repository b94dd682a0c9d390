//! Clap derive structures for the `glinet` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// glinet -- monitor and control GL-iNet routers
#[derive(Debug, Parser)]
#[command(
    name = "glinet",
    version,
    about = "Monitor and control GL-iNet routers from the command line",
    long_about = "Talks to the router's JSON-RPC API to list connected clients,\n\
        WiFi, WireGuard, Tailscale and WAN state, toggle interfaces and tunnels,\n\
        and run a long-lived presence watcher.",
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
    /// Router profile to use
    #[arg(long, short = 'p', env = "GLINET_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router address (overrides profile), e.g. 192.168.8.1
    #[arg(long, short = 'H', env = "GLINET_HOST", global = true)]
    pub host: Option<String>,

    /// Login user (overrides profile)
    #[arg(long, short = 'u', env = "GLINET_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GLINET_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "GLINET_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "GLINET_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Router identity, uptime, load and temperature
    #[command(alias = "st")]
    Status,

    /// Tracked client devices
    #[command(alias = "cl", alias = "devices")]
    Clients(ClientsArgs),

    /// WiFi interfaces
    #[command(alias = "w")]
    Wifi(WifiArgs),

    /// WireGuard client tunnels
    #[command(alias = "wg")]
    Wireguard(WireGuardArgs),

    /// Tailscale connection
    #[command(alias = "ts")]
    Tailscale(TailscaleArgs),

    /// Multi-WAN uplinks
    #[command(alias = "wans")]
    Wan(WanArgs),

    /// Reboot the router
    Reboot,

    /// Poll the router and report presence changes until interrupted
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: Option<ClientsCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List tracked devices
    #[command(alias = "ls")]
    List {
        /// Include devices that are currently away
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Show one device by MAC address
    Get {
        /// Device MAC address
        mac: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WIFI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WifiArgs {
    #[command(subcommand)]
    pub command: Option<WifiCommand>,
}

#[derive(Debug, Subcommand)]
pub enum WifiCommand {
    /// List WiFi interfaces
    #[command(alias = "ls")]
    List,

    /// Turn an interface on
    Enable {
        /// Interface name, e.g. wifi2g
        iface: String,
    },

    /// Turn an interface off
    Disable {
        /// Interface name, e.g. wifi5g
        iface: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VPN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WireGuardArgs {
    #[command(subcommand)]
    pub command: Option<WireGuardCommand>,
}

#[derive(Debug, Subcommand)]
pub enum WireGuardCommand {
    /// List configured WireGuard peers
    #[command(alias = "ls")]
    List,

    /// Connect the tunnel for a peer
    Start {
        /// Peer ID as shown by `glinet wireguard list`
        peer_id: u32,
    },

    /// Disconnect the tunnel for a peer
    Stop {
        /// Peer ID as shown by `glinet wireguard list`
        peer_id: u32,
    },
}

#[derive(Debug, Args)]
pub struct TailscaleArgs {
    #[command(subcommand)]
    pub command: Option<TailscaleCommand>,
}

#[derive(Debug, Subcommand)]
pub enum TailscaleCommand {
    /// Show Tailscale configuration and connection state
    Status,

    /// Start Tailscale
    Up,

    /// Stop Tailscale
    Down,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WAN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WanArgs {
    /// Judge reachability by IPv6 first
    #[arg(long)]
    pub ipv6: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds an absent device is still reported home (0-900)
    #[arg(long)]
    pub consider_home: Option<u64>,

    /// Don't persist the session token and known devices
    #[arg(long)]
    pub no_save: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
