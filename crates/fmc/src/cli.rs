//! Clap derive structures for the `fmc` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fmc_core::ResourceKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fmc -- declarative state for Cisco FMC objects
#[derive(Debug, Parser)]
#[command(
    name = "fmc",
    version,
    about = "Declaratively manage Cisco FMC configuration objects",
    long_about = "Apply, refresh, show and delete Cisco Secure Firewall Management Center\n\
        objects from declarative YAML/JSON documents.\n\n\
        State files record what the last apply produced; refresh reconciles\n\
        them against the server without adopting server-side additions.",
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
    /// FMC profile to use
    #[arg(long, short = 'p', env = "FMC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// FMC base URL (overrides profile)
    #[arg(long, env = "FMC_URL", global = true)]
    pub url: Option<String>,

    /// API username (overrides profile)
    #[arg(long, short = 'u', env = "FMC_USERNAME", global = true)]
    pub username: Option<String>,

    /// API password
    #[arg(long, env = "FMC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Domain name, e.g. "Global/Branch" (defaults to the session's domain)
    #[arg(long, short = 'd', env = "FMC_DOMAIN", global = true)]
    pub domain: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "FMC_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept the FMC's self-signed TLS certificate
    #[arg(long, short = 'k', env = "FMC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "FMC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

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
}

/// Resource types, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    AccessRule,
    Hosts,
    CertificateMap,
    SecurityZone,
}

impl From<Kind> for ResourceKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::AccessRule => Self::AccessRule,
            Kind::Hosts => Self::Hosts,
            Kind::CertificateMap => Self::CertificateMap,
            Kind::SecurityZone => Self::SecurityZone,
        }
    }
}

// ── Command Enum ─────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update a resource from a desired-state document
    Apply(ApplyArgs),

    /// Reconcile a state file against the server
    Refresh(StateArgs),

    /// Fetch an existing object by id or name
    #[command(alias = "get")]
    Show(ShowArgs),

    /// Print the id of the object with the given name
    Resolve(ResolveArgs),

    /// Delete the object recorded in a state file
    #[command(alias = "rm")]
    Delete(StateArgs),

    /// Show the server version and which version-gated features it supports
    Version,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[arg(value_enum)]
    pub kind: Kind,

    /// Desired-state document (YAML or JSON)
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// State file to read the prior state from and write the result to
    #[arg(long, short = 's')]
    pub state: PathBuf,
}

#[derive(Debug, Args)]
pub struct StateArgs {
    #[arg(value_enum)]
    pub kind: Kind,

    /// State file written by a previous apply
    #[arg(long, short = 's')]
    pub state: PathBuf,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(value_enum)]
    pub kind: Kind,

    /// Object id
    #[arg(long, conflicts_with = "name")]
    pub id: Option<String>,

    /// Object name, resolved to an id by scanning the collection
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Parent access policy (access-rule only)
    #[arg(long)]
    pub access_policy_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[arg(value_enum)]
    pub kind: Kind,

    /// Exact, case-sensitive object name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Parent access policy (access-rule only)
    #[arg(long)]
    pub access_policy_id: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive profile setup
    Init,

    /// Show the current configuration (passwords masked)
    Show,

    /// Print the config file path
    Path,

    /// Set a profile value
    Set {
        /// Key: url, username, domain, password_env, insecure, timeout, ca_cert
        key: String,
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Make a profile the default
    Use { name: String },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn kinds_map_to_type_names() {
        assert_eq!(ResourceKind::from(Kind::AccessRule).to_string(), "fmc_access_rule");
        assert_eq!(ResourceKind::from(Kind::Hosts).to_string(), "fmc_hosts");
    }
}
