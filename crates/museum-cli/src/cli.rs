use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "museum",
    about = "Museum: content-addressed media libraries with sealed backups",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Library root directory
    #[arg(long, global = true, env = "MUSEUM_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// TOML file overriding library settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new library at the root
    Init(InitArgs),
    /// Add or list wings
    Wing(WingArgs),
    /// Store files in the object store
    Ingest(IngestArgs),
    /// Check whether an object is stored
    Exists(DigestArgs),
    /// Print a stored object
    Cat(CatArgs),
    /// Install a bundle into a wing
    Install(InstallArgs),
    /// List a wing's installed bundles
    List(ListArgs),
    /// Generate a backup key file
    Keygen(KeygenArgs),
    /// Write a sealed backup of the whole library
    Backup(BackupArgs),
    /// Recreate a library from a sealed backup
    Restore(RestoreArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Initial wing as `id=name` (repeatable)
    #[arg(long = "wing", value_parser = parse_wing_spec)]
    pub wings: Vec<(String, String)>,
}

#[derive(Args)]
pub struct WingArgs {
    #[command(subcommand)]
    pub action: WingAction,
}

#[derive(Subcommand)]
pub enum WingAction {
    /// Add a wing to the library
    Add {
        id: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long = "shared-with")]
        shared_with: Vec<String>,
    },
    /// List the library's wings
    List,
}

#[derive(Args)]
pub struct IngestArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct DigestArgs {
    pub digest: String,
}

#[derive(Args)]
pub struct CatArgs {
    pub digest: String,
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct InstallArgs {
    pub bundle: PathBuf,
    #[arg(long)]
    pub wing: String,
}

#[derive(Args)]
pub struct ListArgs {
    pub wing: String,
}

#[derive(Args)]
pub struct KeygenArgs {
    pub key_file: PathBuf,
}

#[derive(Args)]
pub struct BackupArgs {
    pub destination: PathBuf,
    #[arg(long)]
    pub key_file: PathBuf,
}

#[derive(Args)]
pub struct RestoreArgs {
    pub backup: PathBuf,
    pub destination: PathBuf,
    #[arg(long)]
    pub key_file: PathBuf,
}

fn parse_wing_spec(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((id, name)) if !id.is_empty() && !name.is_empty() => {
            Ok((id.to_string(), name.to_string()))
        }
        _ => Err(format!("expected `id=name`, got {s:?}")),
    }
}
