//! pitch-hub-cli — 查询键调试工具
//!
//! Usage:
//!   pitch-hub-cli serialize [k=v ...]                    Print the canonical params fragment
//!   pitch-hub-cli key <token>... [-- k=v ...]            Print the composite key
//!   pitch-hub-cli resource <name> <pitch_id> [k=v ...]   Print a resource key and API path

use anyhow::{anyhow, bail, Context};
use pitch_hub::{build_key, serialize_params, ParamValue, QueryParams, Resource};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "serialize" => cmd_serialize(&args[2..]),
        "key" => cmd_key(&args[2..]),
        "resource" => cmd_resource(&args[2..]),
        "version" | "--version" | "-V" => {
            println!("pitch-hub-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"pitch-hub-cli — Pitch Hub query key tool

USAGE:
    pitch-hub-cli <COMMAND> [ARGS]

COMMANDS:
    serialize [k=v ...]                     Print the canonical params fragment
    key <token>... [-- k=v ...]             Print the composite key as a JSON array
    resource <name> <pitch_id> [k=v ...]    Print a resource key and its API path
    version                                 Show version information
    help                                    Show this help message

VALUES:
    null, true, false, integers and floats are typed; anything else is a string.

ENVIRONMENT:
    RUST_LOG                                Log filter (default: warn)"#
    );
}

fn cmd_serialize(args: &[String]) -> anyhow::Result<()> {
    let params = parse_params(args)?;
    match serialize_params(Some(&params))? {
        Some(fragment) => println!("{fragment}"),
        None => println!("(none)"),
    }
    Ok(())
}

fn cmd_key(args: &[String]) -> anyhow::Result<()> {
    let split = args.iter().position(|a| a == "--").unwrap_or(args.len());
    let (tokens, rest) = args.split_at(split);
    if tokens.is_empty() {
        bail!("key needs at least one base token");
    }
    let params = parse_params(rest.get(1..).unwrap_or(&[]))?;
    let key = build_key(tokens.iter().cloned(), Some(&params))?;
    println!("{key}");
    Ok(())
}

fn cmd_resource(args: &[String]) -> anyhow::Result<()> {
    let [name, pitch_id, rest @ ..] = args else {
        bail!("usage: resource <name> <pitch_id> [k=v ...]");
    };
    let resource: Resource = name.parse()?;
    let params = parse_params(rest)?;
    let key = resource.key(pitch_id, Some(&params))?;
    println!("key:  {key}");
    println!("path: {}", resource.path(pitch_id));
    Ok(())
}

fn parse_params(args: &[String]) -> anyhow::Result<QueryParams> {
    let mut params = QueryParams::new();
    for arg in args {
        let (k, v) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("expected k=v, got '{arg}'"))
            .with_context(|| "parsing parameters")?;
        params.insert(k, parse_value(v));
    }
    Ok(params)
}

fn parse_value(raw: &str) -> ParamValue {
    match raw {
        "null" => ParamValue::Null,
        "true" => ParamValue::Bool(true),
        "false" => ParamValue::Bool(false),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                ParamValue::Integer(i)
            } else if let Ok(f) = raw.parse::<f64>() {
                ParamValue::Float(f)
            } else {
                ParamValue::String(raw.to_string())
            }
        }
    }
}
