use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jmxgate")]
#[command(about = "jmxgate CLI, validate access policies and evaluate requests against them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "JMXGATE_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a policy document and print what it restricts
    Validate(ValidateArgs),
    /// Evaluate a single query against a policy document
    Check(CheckArgs),
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Policy document (JSON tree form)
    pub policy: PathBuf,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Policy document (JSON tree form)
    pub policy: PathBuf,

    #[command(subcommand)]
    pub query: Query,
}

#[derive(Subcommand)]
pub enum Query {
    /// Is the command type allowed (read, write, exec, list, search, version, notification)
    Type { request_type: String },
    /// Is the HTTP method allowed (GET or POST)
    Http { method: String },
    /// May the attribute be read
    Read { mbean: String, attribute: String },
    /// May the attribute be written
    Write { mbean: String, attribute: String },
    /// May the operation be executed
    Exec { mbean: String, operation: String },
    /// May a remote peer connect; pass its host name and/or IP address
    Remote {
        #[arg(required = true)]
        hosts_or_addresses: Vec<String>,
    },
    /// May a cross-origin request from this origin be answered
    Origin {
        origin: String,
        /// Apply the server-side check, which passes unless strict checking is on
        #[arg(long)]
        strict: bool,
    },
}
