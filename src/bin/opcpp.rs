//! Command-line interface for the opC++ structural parser.
//!
//! Usage:
//!   opcpp parse `<path>` [--format `<format>`]  - Parse a file and print its tree
//!   opcpp check `<path>`                        - Parse a file and report diagnostics only
//!   opcpp tokens `<path>`                       - Scan a file and print its token stream

use clap::{Arg, Command};
use std::process::ExitCode;

use opcpp::opcpp::lexing;
use opcpp::opcpp::node::treeviz;
use opcpp::opcpp::pipeline::parse_source;
use opcpp::opcpp::token::detokenize;

fn main() -> ExitCode {
    let matches = Command::new("opcpp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Structural parser for opC++ source files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print its reduced tree")
                .arg(
                    Arg::new("path")
                        .help("Path to the opC++ source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('tree' or 'json')")
                        .default_value("tree"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse a file and report diagnostics only")
                .arg(
                    Arg::new("path")
                        .help("Path to the opC++ source file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Scan a file and print its token stream")
                .arg(
                    Arg::new("path")
                        .help("Path to the opC++ source file")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            handle_parse_command(path, format)
        }
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            handle_check_command(path)
        }
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            handle_tokens_command(path)
        }
        _ => unreachable!(),
    }
}

fn handle_parse_command(path: &str, format: &str) -> ExitCode {
    let output = match run_file(path) {
        Ok(output) => output,
        Err(code) => return code,
    };
    match format {
        "tree" => print!("{}", treeviz::render(&output.root)),
        "json" => match serde_json::to_string_pretty(&output.root) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("Error: {}", error);
                return ExitCode::FAILURE;
            }
        },
        other => {
            eprintln!("Error: unknown format '{}'", other);
            return ExitCode::FAILURE;
        }
    }
    report_diagnostics(&output)
}

fn handle_check_command(path: &str) -> ExitCode {
    let output = match run_file(path) {
        Ok(output) => output,
        Err(code) => return code,
    };
    report_diagnostics(&output)
}

fn handle_tokens_command(path: &str) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading {}: {}", path, error);
            return ExitCode::FAILURE;
        }
    };
    match lexing::lex(&source) {
        Ok(tokens) => {
            for token in &tokens {
                println!("{:>5}  {}", token.line, token);
            }
            println!("---\n{}", detokenize(&tokens));
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}: {}", path, error);
            ExitCode::FAILURE
        }
    }
}

fn run_file(path: &str) -> Result<opcpp::opcpp::pipeline::ParseOutput, ExitCode> {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading {}: {}", path, error);
            return Err(ExitCode::FAILURE);
        }
    };
    match parse_source(&source, path) {
        Ok(output) => Ok(output),
        Err(fatal) => {
            eprintln!("{}", fatal);
            Err(ExitCode::FAILURE)
        }
    }
}

fn report_diagnostics(output: &opcpp::opcpp::pipeline::ParseOutput) -> ExitCode {
    if output.diagnostics.is_empty() {
        return ExitCode::SUCCESS;
    }
    eprint!("{}", output.diagnostics.report());
    ExitCode::FAILURE
}
