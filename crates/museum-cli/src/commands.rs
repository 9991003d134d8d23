use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use museum_library::{
    BackupKey, ContentStore, LibraryConfig, MuseumLibrary, PathBundle, StableId, Wing,
};
use serde_json::json;
use zeroize::Zeroizing;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let root = cli.root.as_path();
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(root, config, args, format),
        Command::Wing(args) => cmd_wing(root, config, args, format),
        Command::Ingest(args) => cmd_ingest(root, config, args, format),
        Command::Exists(args) => cmd_exists(root, config, args, format),
        Command::Cat(args) => cmd_cat(root, config, args),
        Command::Install(args) => cmd_install(root, config, args, format),
        Command::List(args) => cmd_list(root, config, args, format),
        Command::Keygen(args) => cmd_keygen(args),
        Command::Backup(args) => cmd_backup(root, config, args),
        Command::Restore(args) => cmd_restore(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LibraryConfig> {
    match path {
        Some(path) => Ok(LibraryConfig::load(path)?),
        None => Ok(LibraryConfig::default()),
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_key(path: &Path) -> anyhow::Result<BackupKey> {
    let text = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("reading key file {}", path.display()))?,
    );
    BackupKey::from_hex(&text).with_context(|| format!("parsing key file {}", path.display()))
}

fn cmd_init(
    root: &Path,
    config: LibraryConfig,
    args: InitArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let wings = args
        .wings
        .into_iter()
        .map(|(id, name)| -> anyhow::Result<Wing> { Ok(Wing::new(StableId::new(id)?, name)) })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let library = MuseumLibrary::create_new(root, wings, config)?;
    let index = library.index()?;

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&index)?),
        OutputFormat::Text => {
            println!(
                "{} Initialized museum library in {}",
                "✓".green().bold(),
                root.display().to_string().bold()
            );
            for wing in &index.wings {
                println!("  Wing: {} ({})", wing.id.as_str().yellow(), wing.name);
            }
            Ok(())
        }
    }
}

fn cmd_wing(
    root: &Path,
    config: LibraryConfig,
    args: WingArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let library = MuseumLibrary::open(root, config)?;
    match args.action {
        WingAction::Add { id, name, description, categories, shared_with } => {
            let mut wing = Wing::new(StableId::new(id)?, name).with_categories(categories);
            if let Some(description) = description {
                wing = wing.with_description(description);
            }
            if !shared_with.is_empty() {
                wing = wing.with_shared_with(shared_with);
            }
            let id = wing.id.clone();
            library.add_wing(wing)?;
            match format {
                OutputFormat::Json => print_json(&json!({ "added": id.as_str() })),
                OutputFormat::Text => {
                    println!("{} Added wing {}", "✓".green().bold(), id.as_str().yellow());
                    Ok(())
                }
            }
        }
        WingAction::List => {
            let wings = library.wings()?;
            match format {
                OutputFormat::Json => print_json(&serde_json::to_value(&wings)?),
                OutputFormat::Text => {
                    if wings.is_empty() {
                        println!("No wings.");
                    }
                    for wing in &wings {
                        print!("{}  {}", wing.id.as_str().yellow().bold(), wing.name);
                        if !wing.categories.is_empty() {
                            print!("  [{}]", wing.categories.join(", ").cyan());
                        }
                        println!();
                        if let Some(description) = &wing.description {
                            println!("    {}", description.dimmed());
                        }
                    }
                    Ok(())
                }
            }
        }
    }
}

fn cmd_ingest(
    root: &Path,
    config: LibraryConfig,
    args: IngestArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let library = MuseumLibrary::open(root, config)?;
    let mut references = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let reference = library.ingest(file)?;
        if format == OutputFormat::Text {
            println!(
                "  {} {}  {}",
                "stored:".green(),
                reference.digest.yellow(),
                file.display()
            );
        }
        references.push(reference);
    }
    if format == OutputFormat::Json {
        print_json(&serde_json::to_value(&references)?)?;
    }
    Ok(())
}

fn cmd_exists(
    root: &Path,
    config: LibraryConfig,
    args: DigestArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let library = MuseumLibrary::open(root, config)?;
    let present = library.objects().exists(&args.digest);
    match format {
        OutputFormat::Json => print_json(&json!({ "digest": args.digest, "exists": present })),
        OutputFormat::Text => {
            if present {
                println!("{} {}", "✓".green().bold(), args.digest.yellow());
            } else {
                println!("{} {} not stored", "✗".red().bold(), args.digest.yellow());
            }
            Ok(())
        }
    }
}

fn cmd_cat(root: &Path, config: LibraryConfig, args: CatArgs) -> anyhow::Result<()> {
    let library = MuseumLibrary::open(root, config)?;
    let bytes = library.objects().load(&args.digest)?;
    match &args.output {
        Some(path) => fs::write(path, &bytes)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_install(
    root: &Path,
    config: LibraryConfig,
    args: InstallArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let library = MuseumLibrary::open(root, config)?;
    let wing = StableId::new(args.wing)?;
    let installed = library.install(&PathBundle::new(&args.bundle), &wing)?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "wing": wing.as_str(),
            "installed": installed.display().to_string(),
        })),
        OutputFormat::Text => {
            println!(
                "{} Installed {} into {}",
                "✓".green().bold(),
                args.bundle.display().to_string().bold(),
                wing.as_str().yellow()
            );
            Ok(())
        }
    }
}

fn cmd_list(
    root: &Path,
    config: LibraryConfig,
    args: ListArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let library = MuseumLibrary::open(root, config)?;
    let wing = StableId::new(args.wing)?;
    let exhibits = library.list_exhibits(&wing)?;
    match format {
        OutputFormat::Json => {
            let paths: Vec<String> = exhibits.iter().map(|p| p.display().to_string()).collect();
            print_json(&json!({ "wing": wing.as_str(), "exhibits": paths }))
        }
        OutputFormat::Text => {
            if exhibits.is_empty() {
                println!("No exhibits in {}.", wing.as_str().yellow());
            }
            for path in &exhibits {
                let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                println!("  {}", name);
            }
            Ok(())
        }
    }
}

fn cmd_keygen(args: KeygenArgs) -> anyhow::Result<()> {
    let key = BackupKey::generate();
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(&args.key_file)
        .with_context(|| format!("creating key file {}", args.key_file.display()))?;
    file.write_all(key.to_hex().as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    println!(
        "{} Wrote backup key to {}",
        "✓".green().bold(),
        args.key_file.display().to_string().bold()
    );
    println!("  {}", "Keep it safe: backups cannot be restored without it.".dimmed());
    Ok(())
}

fn cmd_backup(root: &Path, config: LibraryConfig, args: BackupArgs) -> anyhow::Result<()> {
    let key = read_key(&args.key_file)?;
    let library = MuseumLibrary::open(root, config)?;
    library.backup(&args.destination, &key)?;
    println!(
        "{} Backup written to {}",
        "✓".green().bold(),
        args.destination.display().to_string().bold()
    );
    Ok(())
}

fn cmd_restore(args: RestoreArgs) -> anyhow::Result<()> {
    let key = read_key(&args.key_file)?;
    MuseumLibrary::restore(&args.backup, &key, &args.destination)?;
    println!(
        "{} Restored library to {}",
        "✓".green().bold(),
        args.destination.display().to_string().bold()
    );
    Ok(())
}
