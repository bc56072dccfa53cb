use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde_json::Value;

use remap_overrides::OverrideStore;
use remap_pack::{read_artifact, write_artifact, Storage};
use remap_registry::{LoaderOptions, VersionDocument};
use remap_table::{build, collect_stubs, BuildConfig, RegistryPair};
use remap_types::{Category, DocumentMeta, MappingDocument, ProtocolVersion};

use crate::cli::{Cli, Command, GenerateArgs, InspectArgs, OutputFormat, StubsArgs, VerifyArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Generate(args) => cmd_generate(args, &cli.format),
        Command::Stubs(args) => cmd_stubs(args),
        Command::Inspect(args) => cmd_inspect(args, &cli.format),
        Command::Verify(args) => cmd_verify(args),
    }
}

fn registry_path(dir: &Path, version: &str) -> PathBuf {
    dir.join(format!("mapping-{version}.json"))
}

fn override_path(dir: &Path, from: &str, to: &str) -> PathBuf {
    dir.join(format!("mapping-{from}to{to}.json"))
}

fn artifact_path(dir: &Path, from: &str, to: &str) -> PathBuf {
    dir.join(format!("mappings-{from}to{to}.rmap"))
}

fn load_config(path: &Path) -> anyhow::Result<BuildConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Ok(BuildConfig::from_json(&raw)?)
}

fn load_version_document(dir: &Path, version: &str) -> anyhow::Result<VersionDocument> {
    let path = registry_path(dir, version);
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading registry document {}", path.display()))?;
    Ok(VersionDocument::from_str(&raw)?)
}

fn load_overrides(path: &Path) -> anyhow::Result<OverrideStore> {
    if !path.exists() {
        return Ok(OverrideStore::empty());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading override document {}", path.display()))?;
    Ok(OverrideStore::from_json(&raw)?)
}

fn load_pairs(
    config: &BuildConfig,
    source_doc: &VersionDocument,
    target_doc: &VersionDocument,
) -> anyhow::Result<BTreeMap<Category, RegistryPair>> {
    let options = LoaderOptions {
        strip_namespace: config.strip_namespace.clone(),
    };
    let mut pairs = BTreeMap::new();
    for category in &config.categories {
        let source = source_doc.registry(&category.name, &options)?;
        let target = target_doc.registry(&category.name, &options)?;
        if let (Some(source), Some(target)) = (source, target) {
            pairs.insert(category.name.clone(), RegistryPair { source, target });
        }
    }
    Ok(pairs)
}

fn cmd_generate(args: GenerateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let source_doc = load_version_document(&args.registry_dir, &args.from)?;
    let target_doc = load_version_document(&args.registry_dir, &args.to)?;
    let pairs = load_pairs(&config, &source_doc, &target_doc)?;
    let overrides = load_overrides(&override_path(&args.override_dir, &args.from, &args.to))?;

    let generated_at = match args.timestamp {
        Some(seconds) => DateTime::from_timestamp(seconds, 0)
            .with_context(|| format!("invalid timestamp: {seconds}"))?,
        None => Utc::now(),
    };
    let meta = DocumentMeta {
        source_version: ProtocolVersion::new(args.from.clone()),
        target_version: ProtocolVersion::new(args.to.clone()),
        generated_at,
    };

    let document = build(&config, meta, &pairs, &overrides)?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    let path = artifact_path(&args.output_dir, &args.from, &args.to);
    write_artifact(&document, &path)?;

    match format {
        OutputFormat::Text => {
            println!(
                "{} Wrote {} ({} categories)",
                "✓".green().bold(),
                path.display().to_string().bold(),
                document.tables.len()
            );
            for (category, table) in &document.tables {
                let stats = table.stats();
                println!(
                    "  {} {} → {} ({} unmapped)",
                    category.to_string().yellow(),
                    stats.size,
                    stats.mapped_size,
                    stats.empty_mappings
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary(&path, &document))?);
        }
    }
    Ok(())
}

fn cmd_stubs(args: StubsArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let source_doc = load_version_document(&args.registry_dir, &args.from)?;
    let target_doc = load_version_document(&args.registry_dir, &args.to)?;
    let pairs = load_pairs(&config, &source_doc, &target_doc)?;
    let path = override_path(&args.override_dir, &args.from, &args.to);
    let overrides = load_overrides(&path)?;

    let stubs = collect_stubs(&config, &pairs, &overrides);
    if stubs.is_empty() {
        println!("{} No stubs needed.", "✓".green());
        return Ok(());
    }

    // Merge into the existing override document without touching filled
    // rules.
    let mut root: serde_json::Map<String, Value> = if path.exists() {
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
    } else {
        serde_json::Map::new()
    };

    let mut added = 0usize;
    for (category, keys) in &stubs {
        let entry = root
            .entry(category.as_str().to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        let rules = entry
            .as_object_mut()
            .with_context(|| format!("{category}: override section is not an object"))?;
        for key in keys {
            if !rules.contains_key(key) {
                rules.insert(key.clone(), Value::String(String::new()));
                added += 1;
            }
        }
    }

    fs::create_dir_all(&args.override_dir)
        .with_context(|| format!("creating {}", args.override_dir.display()))?;
    fs::write(&path, serde_json::to_string_pretty(&Value::Object(root))?)?;
    println!(
        "{} Added {} stub(s) across {} category(ies) to {}",
        "✓".green().bold(),
        added,
        stubs.len(),
        path.display().to_string().bold()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let document = read_artifact(&args.artifact)?;

    match format {
        OutputFormat::Text => {
            println!(
                "{} {} → {} (generated {})",
                args.artifact.display().to_string().bold(),
                document.meta.source_version.to_string().yellow(),
                document.meta.target_version.to_string().yellow(),
                document.meta.generated_at
            );
            for (category, table) in &document.tables {
                let stats = table.stats();
                let storage = Storage::select(&stats);
                let fallback = match table.fallback() {
                    Some(index) => index.to_string(),
                    None => "-".to_string(),
                };
                println!(
                    "  {:<16} size {:<6} mapped {:<6} identity {:<6} unmapped {:<5} fallback {:<5} {:?}",
                    category.to_string().yellow(),
                    stats.size,
                    stats.mapped_size,
                    stats.identity_mappings,
                    stats.empty_mappings,
                    fallback,
                    storage
                );
            }
            for (category, keys) in &document.identifiers {
                println!("  {} {} embedded identifiers", category.to_string().cyan(), keys.len());
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary(&args.artifact, &document))?
            );
        }
    }
    Ok(())
}

fn cmd_verify(args: VerifyArgs) -> anyhow::Result<()> {
    let document = read_artifact(&args.artifact)?;
    println!(
        "{} {} is valid: {} categories, {} → {}",
        "✓".green().bold(),
        args.artifact.display().to_string().bold(),
        document.tables.len(),
        document.meta.source_version.to_string().yellow(),
        document.meta.target_version.to_string().yellow()
    );
    Ok(())
}

fn summary(path: &Path, document: &MappingDocument) -> Value {
    let categories: serde_json::Map<String, Value> = document
        .tables
        .iter()
        .map(|(category, table)| {
            let stats = table.stats();
            (
                category.as_str().to_string(),
                serde_json::json!({
                    "size": stats.size,
                    "mapped_size": stats.mapped_size,
                    "identity": stats.identity_mappings,
                    "unmapped": stats.empty_mappings,
                    "fallback": table.fallback(),
                }),
            )
        })
        .collect();
    serde_json::json!({
        "artifact": path.display().to_string(),
        "source_version": document.meta.source_version,
        "target_version": document.meta.target_version,
        "generated_at": document.meta.generated_at,
        "categories": categories,
    })
}
