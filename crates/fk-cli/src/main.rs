use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use fk_core::{
    ApplyOutcome, ApplyReport, FlagSet, ManagedList, ManagedSetStore, Target, apply_to_all,
    apply_to_one, join_flags,
};
use fk_store::ProjectStore;

#[derive(Parser)]
#[command(name = "fk", about = "Manage feature flags across build targets")]
struct Cli {
    /// Override project auto-detection
    #[arg(long, global = true)]
    project: Option<String>,

    /// Storage directory (default: $FK_DATA_DIR, then ~/.flagkeep)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct Scope {
    /// Target whose flags define the current on/off state and receive the write
    #[arg(long, default_value = "standalone")]
    target: Target,

    /// Write to every configured target instead of just --target
    #[arg(long)]
    all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show managed tokens and whether each is set on a target
    List {
        #[arg(long, default_value = "standalone")]
        target: Target,
    },

    /// Start managing a token
    Add { token: String },

    /// Stop managing a token (target flags are left as they are)
    Remove { token: String },

    /// Switch a managed token on and write the result
    Enable {
        token: String,
        #[command(flatten)]
        scope: Scope,
    },

    /// Switch a managed token off and write the result
    Disable {
        token: String,
        #[command(flatten)]
        scope: Scope,
    },

    /// Copy the managed tokens' state from one target to others
    Apply {
        /// Target to read the on/off state from
        #[arg(long, default_value = "standalone")]
        from: Target,

        /// Single target to write
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        to: Option<Target>,

        /// Write every configured target
        #[arg(long)]
        all: bool,
    },

    /// Print a target's raw flag string
    Flags { target: Target },

    /// Overwrite a target's raw flag string
    SetFlags { target: Target, flags: String },

    /// List the targets written by --all
    Targets,
}

fn open_store(cli: &Cli) -> Result<ProjectStore> {
    let base_dir = cli
        .data_dir
        .clone()
        .or_else(|| std::env::var("FK_DATA_DIR").ok().map(PathBuf::from));
    ProjectStore::open(cli.project.as_deref(), base_dir.as_deref())
        .context("failed to open project store")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::List { target } => cmd_list(&cli, *target),
        Commands::Add { token } => cmd_add(&cli, token),
        Commands::Remove { token } => cmd_remove(&cli, token),
        Commands::Enable { token, scope } => cmd_switch(&cli, token, true, *scope),
        Commands::Disable { token, scope } => cmd_switch(&cli, token, false, *scope),
        Commands::Apply { from, to, all } => cmd_apply(&cli, *from, *to, *all),
        Commands::Flags { target } => cmd_flags(&cli, *target),
        Commands::SetFlags { target, flags } => cmd_set_flags(&cli, *target, flags),
        Commands::Targets => cmd_targets(&cli),
    }
}

/// The persisted list with its state derived from `target`'s current flags.
fn load_synced(store: &ProjectStore, target: Target) -> Result<ManagedList> {
    let raw = store
        .store()
        .get_target_flags(target)
        .with_context(|| format!("failed to read flags for {target}"))?;
    let mut list = store.load_managed();
    list.derive_from_external(&FlagSet::parse(&raw));
    Ok(list)
}

fn print_report(report: &ApplyReport) {
    for target in &report.updated {
        println!("updated   {target}");
    }
    for target in &report.unchanged {
        println!("unchanged {target}");
    }
}

fn write_all(store: &ProjectStore, list: &ManagedList) -> Result<()> {
    let report = apply_to_all(&store.config().targets, list, store.store());
    print_report(&report);
    report
        .into_result()
        .context("some targets were not updated")?;
    Ok(())
}

fn cmd_list(cli: &Cli, target: Target) -> Result<()> {
    let store = open_store(cli)?;
    let list = load_synced(&store, target)?;

    if list.is_empty() {
        println!("(no managed tokens)");
    }
    for entry in list.entries() {
        let mark = if entry.enabled { "x" } else { " " };
        println!("[{mark}] {}", entry.token);
    }
    Ok(())
}

fn cmd_add(cli: &Cli, token: &str) -> Result<()> {
    let store = open_store(cli)?;
    let mut list = store.load_managed();
    let added = ManagedSetStore::add(&mut list, token)?;
    store.save_managed(&list)?;
    println!("managing {added}");
    Ok(())
}

fn cmd_remove(cli: &Cli, token: &str) -> Result<()> {
    let store = open_store(cli)?;
    let mut list = store.load_managed();
    let Some(index) = list.position(token.trim()) else {
        bail!("token '{}' is not managed", token.trim());
    };
    let removed = ManagedSetStore::remove_at(&mut list, index)?;
    store.save_managed(&list)?;
    println!("no longer managing {}", removed.token);
    Ok(())
}

fn cmd_switch(cli: &Cli, token: &str, value: bool, scope: Scope) -> Result<()> {
    let store = open_store(cli)?;
    let mut list = load_synced(&store, scope.target)?;
    list.toggle_token(token.trim(), value)?;

    if scope.all {
        return write_all(&store, &list);
    }

    let applied = apply_to_one(scope.target, &list, store.store())?;
    let verb = match applied.outcome {
        ApplyOutcome::Updated => "updated",
        ApplyOutcome::Unchanged => "unchanged",
    };
    println!("{verb} {}: {}", scope.target, join_flags(&applied.flags));
    Ok(())
}

fn cmd_apply(cli: &Cli, from: Target, to: Option<Target>, all: bool) -> Result<()> {
    let store = open_store(cli)?;
    let list = load_synced(&store, from)?;

    if all {
        return write_all(&store, &list);
    }

    let Some(to) = to else {
        bail!("either --to or --all is required");
    };
    let applied = apply_to_one(to, &list, store.store())?;
    match applied.outcome {
        ApplyOutcome::Updated => println!("updated   {to}"),
        ApplyOutcome::Unchanged => println!("unchanged {to}"),
    }
    Ok(())
}

fn cmd_flags(cli: &Cli, target: Target) -> Result<()> {
    let store = open_store(cli)?;
    let flags = store
        .store()
        .get_target_flags(target)
        .with_context(|| format!("failed to read flags for {target}"))?;
    println!("{flags}");
    Ok(())
}

fn cmd_set_flags(cli: &Cli, target: Target, flags: &str) -> Result<()> {
    let store = open_store(cli)?;
    store
        .store()
        .set_target_flags(target, flags)
        .with_context(|| format!("failed to write flags for {target}"))?;
    Ok(())
}

fn cmd_targets(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    for target in &store.config().targets {
        println!("{target}");
    }
    Ok(())
}
