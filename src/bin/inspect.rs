//! Schema Inspector CLI
//!
//! Browse the declared format history: list versions, print templates, diff
//! two revisions, check references and interpret JSON files against a type.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use datafix_schemas::config::ToolConfig;
use datafix_schemas::{
    build_schema_chain_with, diff_schemas, recursive_groups, JsonOps, NodeKey, ReferenceGraph,
    RegistryKind, Schema, SchemaChain, TypeReference,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-inspect")]
#[command(about = "Inspect the versioned save-data schemas")]
struct Cli {
    /// Path to a config file (defaults to datafix.toml)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every declared version
    Versions,

    /// Print the template of a type reference
    Type {
        /// Version ("latest", "705", "1451.6")
        version: String,
        /// Type reference name (e.g. item_stack)
        type_ref: String,
    },

    /// Print an entity template
    Entity {
        version: String,
        id: String,
    },

    /// Print a block-entity template
    BlockEntity {
        version: String,
        id: String,
    },

    /// Show registry changes between two versions
    Diff {
        #[arg(short, long)]
        from: String,
        #[arg(short, long, default_value = "latest")]
        to: String,
        /// Include line diffs of changed templates
        #[arg(long)]
        text: bool,
    },

    /// Validate references of every version and list recursive groups
    Check,

    /// Interpret a JSON file as a type at a version
    Read {
        version: String,
        type_ref: String,
        file: PathBuf,
        /// Serialize instead of read (canonical -> on-disk)
        #[arg(long)]
        write: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match ToolConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &ToolConfig) -> anyhow::Result<()> {
    // `check` reports every broken node itself, so it builds the chain unvalidated
    let validate = config.chain.validate_references && !matches!(command, Commands::Check);
    let chain = build_schema_chain_with(validate)?;

    match command {
        Commands::Versions => {
            for schema in &chain {
                println!(
                    "{:>8}  parent {:>8}  types {:>2}  entities {:>3}  block entities {:>2}  {}",
                    schema.version().to_string(),
                    schema.parent().map(|p| p.version().to_string()).unwrap_or_else(|| "-".into()),
                    schema.type_refs().len(),
                    schema.entity_ids().count(),
                    schema.block_entity_ids().count(),
                    schema.fingerprint().short(),
                );
            }
        }

        Commands::Type { version, type_ref } => {
            let schema = chain.resolve(&version)?;
            let type_ref: TypeReference = type_ref.parse()?;
            let template = schema.type_template(type_ref)?;
            print!("{}", template.to_pretty_string());
        }

        Commands::Entity { version, id } => {
            let schema = chain.resolve(&version)?;
            print_entry(schema, RegistryKind::Entities, &id)?;
        }

        Commands::BlockEntity { version, id } => {
            let schema = chain.resolve(&version)?;
            print_entry(schema, RegistryKind::BlockEntities, &id)?;
        }

        Commands::Diff { from, to, text } => {
            let older = chain.resolve(&from)?;
            let newer = chain.resolve(&to)?;
            let diff = diff_schemas(older, newer);

            println!("{}", diff.summary());
            for change in &diff.changes {
                println!("  {}", change);
                if let (true, Some(text_diff)) = (text, &change.text_diff) {
                    for line in text_diff.lines() {
                        println!("      {}", line);
                    }
                }
            }
        }

        Commands::Check => check(&chain)?,

        Commands::Read {
            version,
            type_ref,
            file,
            write,
        } => {
            let schema = chain.resolve(&version)?;
            let type_ref: TypeReference = type_ref.parse()?;
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON in {}", file.display()))?;

            let walked = if write {
                schema.write(type_ref, &JsonOps, value)?
            } else {
                schema.read(type_ref, &JsonOps, value)?
            };
            println!("{}", config.output.format.render(&walked)?);
        }
    }

    Ok(())
}

fn check(chain: &SchemaChain) -> anyhow::Result<()> {
    let mut broken = 0;
    for schema in chain {
        let graph = ReferenceGraph::from_schema(schema);
        for dangling in graph.dangling() {
            println!("  ❌ {}: {} -> {}", schema.version(), dangling.from, dangling.to);
            broken += 1;
        }
    }

    if let Some(latest) = chain.latest() {
        let graph = ReferenceGraph::from_schema(latest);
        println!("Recursive groups at {}:", latest.version());
        for group in recursive_groups(&graph) {
            let members: Vec<String> = group.members.iter().map(|m| m.to_string()).collect();
            let kind = if group.is_self_referential { "self" } else { "mutual" };
            println!("  [{}] {} ({})", group.id, members.join(", "), kind);
        }
    }

    if broken > 0 {
        bail!("{} dangling references", broken);
    }
    println!("✅ {} versions, all references resolve", chain.len());
    Ok(())
}

fn print_entry(schema: &Schema, kind: RegistryKind, id: &str) -> anyhow::Result<()> {
    if let Some(template) = schema.registry_entry(kind, id) {
        print!("{}", template.to_pretty_string());
        return Ok(());
    }

    let suggestions: Vec<String> = ReferenceGraph::from_schema(schema)
        .search(id, 20)
        .into_iter()
        .filter_map(|hit| match hit.key {
            NodeKey::Entry(k, id) if k == kind => Some(id),
            _ => None,
        })
        .take(3)
        .collect();

    if suggestions.is_empty() {
        Err(anyhow!("No {} '{}' at version {}", kind, id, schema.version()))
    } else {
        Err(anyhow!(
            "No {} '{}' at version {}. Did you mean: {}?",
            kind,
            id,
            schema.version(),
            suggestions.join(", ")
        ))
    }
}
