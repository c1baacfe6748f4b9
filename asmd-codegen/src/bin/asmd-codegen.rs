/// CLI: reads an ASMD state machine description (JSON) from a file or
/// stdin, emits VHDL to stdout or a file.
///
/// Usage:
///   asmd-codegen counter.json > counter.vhd
///   asmd-codegen counter.json -o counter.vhd
///   asmd-codegen --check < counter.json
///   RUST_LOG=debug asmd-codegen counter.json --date 2026-01-02
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use asmd_codegen::emit_vhdl::{self, RenderError};
use asmd_codegen::{compiler, Error};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// ASMD state machine to VHDL generator
#[derive(Parser, Debug)]
#[command(name = "asmd-codegen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON state machine description; reads stdin when omitted
    input: Option<PathBuf>,

    /// Write VHDL to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Validate the description and exit without emitting anything
    #[arg(long, default_value_t = false)]
    check: bool,

    /// Author for the header comment, overriding Options.Author
    #[arg(long)]
    author: Option<String>,

    /// Header date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("asmd-codegen: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let text = read_input(args)?;
    let mut raw = compiler::decode(&text)?;
    if let Some(author) = &args.author {
        raw.options.author = author.clone();
    }
    let machine = compiler::prepare(&raw)?;
    info!(
        module = %machine.options.normalized_module_name,
        ports = machine.inputs.len() + machine.outputs.len(),
        "description accepted"
    );

    if args.check {
        return Ok(());
    }

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    match &args.output {
        Some(path) => emit_vhdl::write_file(&machine, date, path)?,
        None => {
            // Render fully before touching stdout so a failure prints nothing.
            let vhdl = emit_vhdl::emit(&machine, date)?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(vhdl.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(RenderError::from)?;
        }
    }
    Ok(())
}

fn read_input(args: &Args) -> Result<String, Error> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| Error::Read {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(buf)
        }
    }
}
