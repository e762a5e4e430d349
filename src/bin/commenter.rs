//! Turn a Maildir of comment notification emails into per-page HTML fragments.
//!
//! Usage:
//!   commenter --maildir <DIR> --html-dir <DIR>
//!
//! Output (stdout): one "Wrote <path> (<n> comments)" line per page, printed
//! as soon as that page is on disk.
//! Errors (stderr): the first failure, then exit status 1.
//! Logging (stderr): controlled by RUST_LOG, warnings only by default.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to Maildir containing comment emails.
    #[arg(long, value_name = "DIR", value_parser = NonEmptyStringValueParser::new())]
    maildir: String,

    /// Path to directory to write HTML files.
    #[arg(long, value_name = "DIR", value_parser = NonEmptyStringValueParser::new())]
    html_dir: String,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let config = commenter::Config::new(PathBuf::from(args.maildir), PathBuf::from(args.html_dir));
    match commenter::generate_with(&config, |page| println!("{page}")) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
