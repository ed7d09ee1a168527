use std::env;
use std::error::Error;
use std::path::Path;
use std::process;

use satisfiability::{
    SatisfiabilityOptions, SatisfiabilityValidator, SchemaGraph, SourceSchema,
};
use schemars::generate::SchemaSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let tree_layer = tracing_tree::HierarchicalLayer::new(2)
        .with_bracketed_fields(true)
        .with_deferred_spans(false)
        .with_wraparound(25)
        .with_indent_lines(true)
        .with_timer(tracing_tree::time::Uptime::default())
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_targets(false);

    tracing_subscriber::registry()
        .with(tree_layer)
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: sat-dev-cli <command> [schema_path...] [--options <options.json>] [--json]");
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "validate" => validate(&args[2..]),
        "graph" => print_graph(&args[2..]),
        "config-schema" => print_config_schema(),
        _ => {
            eprintln!("Unknown command. Available commands: validate, graph, config-schema");
            process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

/// Positional arguments are schema files, the file stem is used as the schema name.
fn read_source_schemas(args: &[String]) -> Result<Vec<SourceSchema>, Box<dyn Error>> {
    let mut sources = vec![];
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => {}
            "--options" => {
                args.next();
            }
            path => {
                let name = Path::new(path)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .ok_or_else(|| format!("Unable to derive a schema name from '{}'", path))?;
                let sdl = std::fs::read_to_string(path)
                    .map_err(|e| format!("Unable to read input file '{}': {}", path, e))?;

                sources.push(SourceSchema::new(name, sdl));
            }
        }
    }

    if sources.is_empty() {
        return Err("No schema files given".into());
    }

    Ok(sources)
}

fn read_options(args: &[String]) -> Result<SatisfiabilityOptions, Box<dyn Error>> {
    let Some(position) = args.iter().position(|arg| arg == "--options") else {
        return Ok(SatisfiabilityOptions::default());
    };
    let path = args
        .get(position + 1)
        .ok_or("Missing value for --options")?;
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Unable to read options file '{}': {}", path, e))?;

    Ok(serde_json::from_str(&content)?)
}

fn validate(args: &[String]) -> Result<bool, Box<dyn Error>> {
    let graph = SchemaGraph::from_source_schemas(&read_source_schemas(args)?)?;
    let options = read_options(args)?;
    let log = SatisfiabilityValidator::with_options(&graph, options).run();

    if args.contains(&"--json".into()) {
        println!("{}", serde_json::to_string_pretty(&log)?);
    } else if log.is_empty() {
        println!("All fields are satisfiable");
    } else {
        println!("{}", log);
    }

    Ok(!log.has_errors())
}

fn print_graph(args: &[String]) -> Result<bool, Box<dyn Error>> {
    let graph = SchemaGraph::from_source_schemas(&read_source_schemas(args)?)?;
    println!("{}", graph.transition_graph());

    Ok(true)
}

fn print_config_schema() -> Result<bool, Box<dyn Error>> {
    let generator = SchemaSettings::draft2020_12()
        .with(|s| {
            s.inline_subschemas = true;
        })
        .into_generator();
    let schema = generator.into_root_schema_for::<SatisfiabilityOptions>();
    println!("{}", serde_json::to_string_pretty(&schema)?);

    Ok(true)
}
