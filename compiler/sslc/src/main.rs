//! SSL Compiler CLI
//!
//! Parses one preprocessed script, prints its diagnostics and optionally
//! writes the compiled unit to disk.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::path::PathBuf;

use ssl_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use sslc::tracing_setup::init_tracing;
use sslc::{parse_with, ParseOptions, STATUS_FATAL};

struct Args {
    input: PathBuf,
    orig: Option<PathBuf>,
    emit: Option<PathBuf>,
    color: ColorMode,
    options: ParseOptions,
}

fn print_usage() {
    eprintln!("Usage: sslc [options] <file.ssl>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -I <dir>                   Search <dir> for #include files first");
    eprintln!("  --orig <path>              Path reported for the input file");
    eprintln!("  --max-include-depth=<n>    Nesting limit for #include (default 16)");
    eprintln!("  --emit=<path>              Write the compiled unit (bincode)");
    eprintln!("  --color=<when>             auto, always or never");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut orig = None;
    let mut emit = None;
    let mut color = ColorMode::Auto;
    let mut options = ParseOptions::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if arg == "-I" || arg == "--orig" {
            let Some(value) = args.get(i + 1) else {
                return Err(format!("missing value after `{arg}`"));
            };
            if arg == "-I" {
                options = options.with_include_dir(value);
            } else {
                orig = Some(PathBuf::from(value));
            }
            i += 2;
            continue;
        }

        if let Some(dir) = arg.strip_prefix("-I") {
            options = options.with_include_dir(dir);
        } else if let Some(depth) = arg.strip_prefix("--max-include-depth=") {
            let depth = depth
                .parse()
                .map_err(|_| format!("invalid include depth `{depth}`"))?;
            options = options.with_max_include_depth(depth);
        } else if let Some(path) = arg.strip_prefix("--emit=") {
            emit = Some(PathBuf::from(path));
        } else if let Some(when) = arg.strip_prefix("--color=") {
            color = ColorMode::from_flag(when)
                .ok_or_else(|| format!("invalid color mode `{when}`"))?;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option `{arg}`"));
        } else if input.is_none() {
            input = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument `{arg}`"));
        }
        i += 1;
    }

    let input = input.ok_or_else(|| "missing input file".to_string())?;
    Ok(Args {
        input,
        orig,
        emit,
        color,
        options,
    })
}

fn main() {
    init_tracing();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.is_empty() {
        print_usage();
        std::process::exit(STATUS_FATAL);
    }
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage();
            std::process::exit(STATUS_FATAL);
        }
    };

    let orig = args.orig.as_deref().unwrap_or(&args.input);
    let output = match parse_with(&args.input, orig, &args.options) {
        Ok(output) => output,
        Err(fatal) => {
            eprintln!("error: {fatal}");
            std::process::exit(fatal.status_code());
        }
    };

    let mut emitter = TerminalEmitter::stderr(
        output.unit.sources(),
        args.color,
        io::stderr().is_terminal(),
    );
    emitter.emit_all(&output.diagnostics);
    if !output.diagnostics.is_empty() {
        emitter.emit_summary(output.error_count(), output.warning_count());
    }
    emitter.flush();

    if let Some(path) = &args.emit {
        let written = File::create(path)
            .map_err(bincode::Error::from)
            .and_then(|file| bincode::serialize_into(BufWriter::new(file), &output.unit));
        if let Err(err) = written {
            eprintln!("error: cannot write `{}`: {err}", path.display());
            std::process::exit(STATUS_FATAL);
        }
    }

    std::process::exit(output.status_code());
}
