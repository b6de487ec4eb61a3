// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! temporal-ctl
//!
//! Applies namespace, schedule and search attribute models to a Temporal
//! cluster. Models and state are JSON files; `apply` creates when the state
//! file does not exist yet and updates otherwise.
//!
//! ```text
//! temporal-ctl --insecure namespace apply --plan orders.json --state orders.state.json
//! temporal-ctl schedule import default:nightly --state nightly.state.json
//! temporal-ctl search-attribute lookup --namespace default WorkflowId
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use temporal_provider::mapping::schedule::requires_replace;
use temporal_provider::{
    Diagnostics, NamespaceModel, OperationContext, Provider, ProviderConfig, ScheduleModel,
    SearchAttributeModel,
};

#[derive(Parser)]
#[command(name = "temporal-ctl")]
#[command(version)]
#[command(about = "Manage Temporal namespaces, schedules and search attributes", long_about = None)]
struct Cli {
    /// Provider configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Frontend host, overrides the configuration file
    #[arg(long, global = true)]
    host: Option<String>,

    /// Frontend port, overrides the configuration file
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Connect without TLS
    #[arg(long, global = true)]
    insecure: bool,

    /// Give up after this many seconds
    #[arg(long, global = true, env = "TEMPORAL_CTL_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Namespaces
    #[clap(visible_alias = "ns")]
    Namespace {
        #[command(subcommand)]
        command: NamespaceCommands,
    },
    /// Schedules
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },
    /// Custom search attributes
    #[clap(visible_alias = "sa")]
    SearchAttribute {
        #[command(subcommand)]
        command: SearchAttributeCommands,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// Desired model (JSON)
    #[arg(long)]
    plan: PathBuf,
    /// State file, created or updated
    #[arg(long)]
    state: PathBuf,
}

#[derive(Args)]
struct StateArgs {
    /// State file
    #[arg(long)]
    state: PathBuf,
}

#[derive(Args)]
struct ImportArgs {
    /// `namespace:id` or a bare id
    id: String,
    /// State file to write
    #[arg(long)]
    state: PathBuf,
}

#[derive(Subcommand)]
enum NamespaceCommands {
    /// Create or update a namespace
    Apply(PlanArgs),
    /// Refresh a state file
    Read(StateArgs),
    /// Delete the namespace in a state file
    Delete(StateArgs),
    /// Import an existing namespace by name
    Import(ImportArgs),
    /// Print a namespace without managing it
    Lookup {
        name: String,
    },
}

#[derive(Subcommand)]
enum ScheduleCommands {
    /// Create, update or replace a schedule
    Apply(PlanArgs),
    /// Refresh a state file
    Read(StateArgs),
    /// Delete the schedule in a state file
    Delete(StateArgs),
    /// Import an existing schedule
    Import(ImportArgs),
}

#[derive(Subcommand)]
enum SearchAttributeCommands {
    /// Create a search attribute and wait until it is visible
    Create(PlanArgs),
    /// Refresh a state file
    Read(StateArgs),
    /// Remove the search attribute in a state file
    Delete(StateArgs),
    /// Import an existing custom search attribute
    Import(ImportArgs),
    /// Print a custom or system search attribute
    Lookup {
        #[arg(long, default_value = "default")]
        namespace: String,
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("temporal_provider=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ProviderConfig::from_file(path)?,
        None => ProviderConfig::new(),
    };
    if let Some(host) = &cli.host {
        config = config.with_host(host.clone());
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }
    if cli.insecure {
        config = config.with_insecure(true);
    }

    let provider = Provider::configure(&config)
        .await
        .context("failed to configure provider")?;

    let ctx = OperationContext::new().with_timeout(Duration::from_secs(cli.timeout));
    let cancel = ctx.token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            cancel.cancel();
        }
    });

    match cli.command {
        Commands::Namespace { command } => run_namespace(&provider, &ctx, command).await,
        Commands::Schedule { command } => run_schedule(&provider, &ctx, command).await,
        Commands::SearchAttribute { command } => {
            run_search_attribute(&provider, &ctx, command).await
        }
    }
}

async fn run_namespace(
    provider: &Provider,
    ctx: &OperationContext,
    command: NamespaceCommands,
) -> Result<()> {
    let resource = provider.namespace_resource();
    match command {
        NamespaceCommands::Apply(args) => {
            let plan: NamespaceModel = read_json(&args.plan)?;
            let outcome = if args.state.exists() {
                let prior: NamespaceModel = read_json(&args.state)?;
                resource.update(ctx, &prior, &plan).await?
            } else {
                resource.create(ctx, &plan).await?
            };
            report(&outcome.diagnostics);
            write_json(&args.state, &outcome.value)
        }
        NamespaceCommands::Read(args) => {
            let state: NamespaceModel = read_json(&args.state)?;
            let outcome = resource.read(ctx, &state).await?;
            report(&outcome.diagnostics);
            write_json(&args.state, &outcome.value)
        }
        NamespaceCommands::Delete(args) => {
            let state: NamespaceModel = read_json(&args.state)?;
            resource.delete(ctx, &state).await?;
            remove_state(&args.state)
        }
        NamespaceCommands::Import(args) => {
            let outcome = resource.import(ctx, &args.id).await?;
            write_json(&args.state, &outcome.value)
        }
        NamespaceCommands::Lookup { name } => {
            let data = provider.namespace_data_source().read(ctx, &name).await?;
            print_json(&data)
        }
    }
}

async fn run_schedule(
    provider: &Provider,
    ctx: &OperationContext,
    command: ScheduleCommands,
) -> Result<()> {
    let resource = provider.schedule_resource();
    match command {
        ScheduleCommands::Apply(args) => {
            let plan: ScheduleModel = read_json(&args.plan)?;
            let outcome = if args.state.exists() {
                let prior: ScheduleModel = read_json(&args.state)?;
                if requires_replace(&prior, &plan) {
                    info!(schedule_id = %prior.schedule_id, "Replacing schedule");
                    resource.delete(ctx, &prior).await?;
                    resource.create(ctx, &plan).await?
                } else {
                    resource.update(ctx, &prior, &plan).await?
                }
            } else {
                resource.create(ctx, &plan).await?
            };
            report(&outcome.diagnostics);
            write_json(&args.state, &outcome.value)
        }
        ScheduleCommands::Read(args) => {
            let state: ScheduleModel = read_json(&args.state)?;
            let outcome = resource.read(ctx, &state).await?;
            report(&outcome.diagnostics);
            write_json(&args.state, &outcome.value)
        }
        ScheduleCommands::Delete(args) => {
            let state: ScheduleModel = read_json(&args.state)?;
            resource.delete(ctx, &state).await?;
            remove_state(&args.state)
        }
        ScheduleCommands::Import(args) => {
            let outcome = resource.import(ctx, &args.id).await?;
            report(&outcome.diagnostics);
            write_json(&args.state, &outcome.value)
        }
    }
}

async fn run_search_attribute(
    provider: &Provider,
    ctx: &OperationContext,
    command: SearchAttributeCommands,
) -> Result<()> {
    let resource = provider.search_attribute_resource();
    match command {
        SearchAttributeCommands::Create(args) => {
            let plan: SearchAttributeModel = read_json(&args.plan)?;
            let outcome = if args.state.exists() {
                let prior: SearchAttributeModel = read_json(&args.state)?;
                resource.update(ctx, &prior, &plan).await?
            } else {
                resource.create(ctx, &plan).await?
            };
            report(&outcome.diagnostics);
            write_json(&args.state, &outcome.value)
        }
        SearchAttributeCommands::Read(args) => {
            let state: SearchAttributeModel = read_json(&args.state)?;
            match resource.read(ctx, &state).await? {
                Some(fresh) => write_json(&args.state, &fresh),
                None => remove_state(&args.state),
            }
        }
        SearchAttributeCommands::Delete(args) => {
            let state: SearchAttributeModel = read_json(&args.state)?;
            resource.delete(ctx, &state).await?;
            remove_state(&args.state)
        }
        SearchAttributeCommands::Import(args) => {
            let outcome = resource.import(ctx, &args.id).await?;
            write_json(&args.state, &outcome.value)
        }
        SearchAttributeCommands::Lookup { namespace, name } => {
            let model = provider
                .search_attribute_data_source()
                .read(ctx, &namespace, &name)
                .await?;
            print_json(&model)
        }
    }
}

fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.warnings() {
        warn!(summary = %diagnostic.summary, "{}", diagnostic.detail);
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw + "\n").with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "State written");
    Ok(())
}

fn remove_state(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
    }
    info!(path = %path.display(), "State removed");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
