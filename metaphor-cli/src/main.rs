//! Command-line interface for the Metaphor compiler.
//!
//! Usage:
//!   metaphorc [options] `<file>`
//!
//! Compiles a root Metaphor file (resolving `Include:` and `Embed:`
//! directives) and writes the section-numbered rendering to stdout or,
//! with `-o`, to a file. Syntax errors are printed to stderr framed by
//! separator lines.

use clap::{error::ErrorKind, Arg, ArgAction, Command};
use metaphor_parser::metaphor::{compile_file, CompileError};
use std::fs::File;
use std::io::Write;
use std::process;

fn main() {
    let command = Command::new("metaphorc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compiles Metaphor prompt specifications into numbered plain text")
        .arg(
            Arg::new("file")
                .help("Input file to compile")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("outputFile")
                .long("outputFile")
                .short('o')
                .help("Write output to a file instead of stdout"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .short('d')
                .help("Generate debug output")
                .action(ArgAction::SetTrue),
        );

    let matches = match command.try_get_matches() {
        Ok(matches) => matches,
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = error.print();
            process::exit(code);
        }
    };

    if matches.get_flag("debug") {
        eprintln!("Debug mode is ON");
    }

    let input = matches
        .get_one::<String>("file")
        .expect("file is a required argument");

    let output = match compile_file(input) {
        Ok(rendered) => rendered,
        Err(CompileError::Parse(errors)) => {
            for error in &errors {
                eprintln!("----------------\n{}", error);
            }
            eprintln!("----------------");
            process::exit(-1);
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    match matches.get_one::<String>("outputFile") {
        Some(path) => {
            let mut file = match File::create(path) {
                Ok(file) => file,
                Err(error) => {
                    eprintln!("Error: Could not open output file {}: {}", path, error);
                    process::exit(1);
                }
            };
            if let Err(error) = file.write_all(output.as_bytes()) {
                eprintln!("Error: Could not write output file {}: {}", path, error);
                process::exit(1);
            }
        }
        None => print!("{}", output),
    }
}
