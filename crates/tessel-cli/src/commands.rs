use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value as Json;
use tessel_adapter::default_facade;
use tessel_data::TraitType;
use tessel_holder::FlyweightStore;
use tessel_registry::{DataFacade, RegistryConfig};
use tessel_transaction::{DataTransactionResult, TransactionKind};
use tessel_types::KeyDescriptor;
use tessel_value::AnyValue;

use crate::cli::*;
use crate::fixture::{Fixture, FIXTURE_WORLD};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => RegistryConfig::from_file(path)?,
        None => RegistryConfig::default(),
    };
    let facade = default_facade(config)?;
    match cli.command {
        Command::Keys => cmd_keys(&facade, cli.format),
        Command::Inspect(args) => cmd_inspect(&facade, &args.fixture, cli.format),
        Command::Offer(args) => cmd_offer(&facade, args, cli.format),
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct KeyListing {
    keys: Vec<KeyDescriptor>,
    traits: Vec<TraitListing>,
    block_traits: Vec<TraitListing>,
}

#[derive(Debug, Serialize)]
struct TraitListing {
    id: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct HolderReport {
    name: String,
    #[serde(rename = "type")]
    holder_type: String,
    traits: Vec<TraitReport>,
}

#[derive(Debug, Serialize)]
struct TraitReport {
    id: &'static str,
    name: &'static str,
    values: Vec<Json>,
}

fn key_listing(facade: &DataFacade) -> KeyListing {
    let registry = facade.registry();
    let listing = |types: Vec<TraitType>| {
        types
            .into_iter()
            .map(|t| TraitListing {
                id: t.id(),
                name: t.name(),
            })
            .collect::<Vec<_>>()
    };
    KeyListing {
        keys: registry.keys(),
        traits: listing(registry.trait_types()),
        block_traits: listing(registry.block_trait_types()),
    }
}

fn trait_reports(traits: Vec<(TraitType, Vec<AnyValue>)>) -> Vec<TraitReport> {
    traits
        .into_iter()
        .map(|(trait_type, values)| TraitReport {
            id: trait_type.id(),
            name: trait_type.name(),
            values: values
                .iter()
                .map(|v| serde_json::json!({ "key": v.id().to_string(), "value": v.get() }))
                .collect(),
        })
        .collect()
}

fn inspect_fixture(facade: &DataFacade, fixture: &Fixture) -> anyhow::Result<Vec<HolderReport>> {
    let scene = fixture.build(facade)?;
    let mut reports: Vec<HolderReport> = scene
        .holders
        .iter()
        .map(|(name, holder)| HolderReport {
            name: name.clone(),
            holder_type: holder.holder_type().to_string(),
            traits: trait_reports(facade.inspect(holder.as_ref())),
        })
        .collect();
    for (name, pos) in &scene.blocks {
        let traits = facade.inspect_block(&scene.store, FIXTURE_WORLD, *pos);
        let block_type = scene
            .store
            .state_at(FIXTURE_WORLD, *pos)
            .and_then(|state| scene.store.table().state(state).ok())
            .map(|state| state.block.clone())
            .unwrap_or_default();
        reports.push(HolderReport {
            name: name.clone(),
            holder_type: block_type,
            traits: trait_reports(traits),
        });
    }
    Ok(reports)
}

/// Offer `value` under `key_id` to the named holder. With `save`, a
/// successful value is recorded in the fixture's `data` table.
fn offer_to_fixture(
    facade: &DataFacade,
    fixture: &mut Fixture,
    holder_name: &str,
    key_id: &str,
    value: Json,
    save: bool,
) -> anyhow::Result<DataTransactionResult> {
    let key = facade
        .registry()
        .find_key(key_id)
        .with_context(|| format!("unknown key '{key_id}'"))?;
    let mut scene = fixture.build(facade)?;
    let Some(holder) = scene.holder_mut(holder_name) else {
        bail!("no holder named '{holder_name}'");
    };
    let result = facade.offer_json(holder, key, value.clone());
    if save && result.is_successful() {
        if let Some(entry) = fixture.holder_mut(holder_name) {
            entry.data.insert(key_id.to_string(), value);
        }
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_keys(facade: &DataFacade, format: OutputFormat) -> anyhow::Result<()> {
    let listing = key_listing(facade);
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }
    println!("{}", "Keys".bold());
    for key in &listing.keys {
        println!("  {}  {} ({})", key.id.to_string().cyan(), key.path, key.shape);
    }
    println!("{}", "Traits".bold());
    for t in &listing.traits {
        println!("  {}  {}", t.id.cyan(), t.name);
    }
    println!("{}", "Block traits".bold());
    for t in &listing.block_traits {
        println!("  {}  {}", t.id.cyan(), t.name);
    }
    Ok(())
}

fn cmd_inspect(facade: &DataFacade, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let fixture = Fixture::load(path)?;
    let reports = inspect_fixture(facade, &fixture)?;
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for report in &reports {
        println!("{} ({})", report.name.bold(), report.holder_type.dimmed());
        if report.traits.is_empty() {
            println!("  {}", "no supported traits".dimmed());
        }
        for t in &report.traits {
            println!("  {}", t.name.yellow());
            for value in &t.values {
                println!("    {} = {}", value["key"].as_str().unwrap_or_default(), value["value"]);
            }
        }
    }
    Ok(())
}

fn cmd_offer(facade: &DataFacade, args: OfferArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut fixture = Fixture::load(&args.fixture)?;
    let value: Json = serde_json::from_str(&args.value)
        .with_context(|| format!("value is not valid JSON: {}", args.value))?;
    let result = offer_to_fixture(facade, &mut fixture, &args.holder, &args.key, value, args.save)?;
    if args.save && result.is_successful() {
        fixture.save(&args.fixture)?;
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    if !result.is_successful() {
        bail!("offer finished with {}", result.kind());
    }
    Ok(())
}

fn print_result(result: &DataTransactionResult) {
    let kind = match result.kind() {
        TransactionKind::Success => result.kind().as_str().green().bold(),
        TransactionKind::Cancelled => result.kind().as_str().yellow().bold(),
        TransactionKind::Failure | TransactionKind::Error => result.kind().as_str().red().bold(),
    };
    println!("{kind}");
    for value in result.successful() {
        println!("  {} {} = {}", "set".green(), value.id(), value.get());
    }
    for value in result.replaced() {
        println!("  {} {} = {}", "was".dimmed(), value.id(), value.get());
    }
    for rejected in result.rejected() {
        println!(
            "  {} {} = {}: {}",
            "rejected".red(),
            rejected.value.id(),
            rejected.value.get(),
            rejected.reason
        );
    }
    if let Some(error) = result.error() {
        println!("  {} {}", "error".red(), error);
    }
}
