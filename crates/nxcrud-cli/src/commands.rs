use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use nxcrud_engine::{builtin_catalog, SerializationService};
use nxcrud_flatten::{flatten_with, unflatten, FlatMap, FlattenOptions};
use nxcrud_registry::{
    ProcessorRegistry, ProcessorSettings, RegistryConfig, StaticConfig, TomlFileConfig,
};
use nxcrud_resolve::{PersistentResourceLocator, RouteTable, RoutingResolver};
use serde_json::Value as JsonValue;

use crate::cli::*;
use crate::document;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Validate(args) => cmd_validate(args, &cli.format),
        Command::Flatten(args) => cmd_flatten(args),
        Command::Unflatten(args) => cmd_unflatten(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_json(path: &Path) -> anyhow::Result<JsonValue> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn cmd_validate(args: ValidateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let registry = ProcessorRegistry::new(
        Arc::new(TomlFileConfig::new(&args.settings)),
        builtin_catalog(),
    );
    let settings = registry.settings()?;
    let issues: Vec<_> = registry
        .validate()?
        .into_iter()
        .filter(|issue| args.group.as_ref().map_or(true, |g| *g == issue.group))
        .collect();

    match format {
        OutputFormat::Json => {
            let report: Vec<JsonValue> = issues
                .iter()
                .map(|issue| {
                    serde_json::json!({
                        "group": issue.group,
                        "binding": issue.binding,
                        "reason": issue.reason,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for (group, members) in &settings.groups {
                if args.group.as_ref().is_some_and(|g| g != group) {
                    continue;
                }
                println!("{}", group.bold());
                if let Some(reason) = members.malformed() {
                    println!("  {} {}", "✗".red(), reason);
                }
                for name in members.names() {
                    match issues.iter().find(|i| i.group == *group && i.binding == name) {
                        Some(issue) => println!("  {} {}: {}", "✗".red(), name.yellow(), issue.reason),
                        None => println!("  {} {}", "✓".green(), name),
                    }
                }
            }
            if issues.is_empty() {
                println!("{} All bindings valid.", "✓".green().bold());
            } else {
                println!("{} {} invalid binding(s).", "✗".red().bold(), issues.len());
            }
        }
    }

    if !issues.is_empty() {
        bail!("{} invalid processor binding(s)", issues.len());
    }
    Ok(())
}

fn cmd_flatten(args: FlattenArgs) -> anyhow::Result<()> {
    let tree = read_json(&args.file)?;
    let options = FlattenOptions {
        prefix: &args.prefix,
        keep_empty_containers: !args.drop_empty,
        ..Default::default()
    };
    let flat = flatten_with(&tree, &options);
    println!("{}", serde_json::to_string_pretty(&flat)?);
    Ok(())
}

fn cmd_unflatten(args: UnflattenArgs) -> anyhow::Result<()> {
    let flat: FlatMap = match read_json(&args.file)? {
        JsonValue::Object(map) => map,
        other => bail!("expected a flat JSON object, got {}", kind(&other)),
    };
    println!("{}", serde_json::to_string_pretty(&unflatten(&flat))?);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let value = document::to_value(read_json(&args.file)?)?;

    let routes = match &args.routes {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            RouteTable::from_toml_str(&text)?
        }
        None => RouteTable::default(),
    };
    let resolver =
        RoutingResolver::new(routes, PersistentResourceLocator::new(args.resource_base.clone()));

    let config = RegistryConfig {
        strict: args.strict,
    };
    let registry = match &args.settings {
        Some(path) => ProcessorRegistry::with_config(
            Arc::new(TomlFileConfig::new(path)),
            builtin_catalog(),
            config,
        ),
        None => ProcessorRegistry::with_config(
            Arc::new(StaticConfig::new(ProcessorSettings::new())),
            builtin_catalog(),
            config,
        ),
    };
    let service = SerializationService::new(registry);

    let tree = service.process(&value, &resolver, args.group.as_deref())?;
    let output = if args.pretty {
        serde_json::to_string_pretty(&tree)?
    } else {
        serde_json::to_string(&tree)?
    };
    println!("{output}");
    Ok(())
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
