//! fm-min: minify a Fullmoon template while keeping its directives intact
//!
//! Usage: `fm-min <input_file> <output_file>`

use std::ffi::OsString;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use facet::Facet;
use facet_args as args;
use tracing_subscriber::prelude::*;

const USAGE: &str = "\
Minify a Fullmoon HTML template while preserving template tags.

Usage: fm-min <input_file> <output_file>

Arguments:
  <input_file>   Path to the input Fullmoon template file
  <output_file>  Path to save the minified HTML file

Set RUST_LOG (e.g. RUST_LOG=fullmoon_minify=debug) for more output.";

/// Minify a Fullmoon HTML template while preserving template tags
#[derive(Facet, Debug)]
struct Args {
    /// Path to the input Fullmoon template file
    #[facet(args::positional)]
    input_file: String,

    /// Path to save the minified HTML file
    #[facet(args::positional)]
    output_file: String,
}

/// `Ok(None)` means help was requested
fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Option<Args>> {
    let args = args
        .into_iter()
        .map(|arg| {
            arg.into_string()
                .map_err(|arg| eyre!("argument {arg:?} is not valid UTF-8\n\n{USAGE}"))
        })
        .collect::<Result<Vec<String>>>()?;

    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        return Ok(None);
    }

    let args_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let parsed: Args = facet_args::from_slice(&args_refs)
        .map_err(|e| eyre!("{:?}\n{USAGE}", miette::Report::new(e)))?;

    Ok(Some(parsed))
}

fn init_tracing() {
    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("fullmoon_minify=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();
    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    init_tracing();

    let Some(args) = parse_args(std::env::args_os().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let stats = fullmoon_minify::minify_file(&args.input_file, &args.output_file)?;
    tracing::debug!(saved = stats.saved_bytes(), "done");

    Ok(())
}
