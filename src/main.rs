//! LessPass command line.
//!
//! Flow:
//! - Tokenize argv into options
//! - Resolve them against the engine (defaults, clamping, password prompt)
//! - Derive the password, then print it or copy it to the clipboard
//!
//! Usage:
//!   lesspass example.org me@example.org -L 20 --no-symbols

mod args;
mod charset;
mod clipboard;
mod config;
mod error;
mod password;
mod prompt;
mod resolve;

use std::process::ExitCode;

use tracing::debug;

use args::Invocation;
use config::Settings;
use error::Error;
use password::{Engine, LessPass};
use prompt::TerminalPrompt;

fn main() -> ExitCode {
    let settings = Settings::from_env();
    settings.init_tracing();

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Error::UnrecognizedOptions(parse) = &e {
                debug!(reason = %parse.reason(), "command line rejected");
            }
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<(), Error> {
    let argv = args::from_os(std::env::args_os().skip(1))?;
    let opts = match args::parse_invocation(argv.as_slice())? {
        Invocation::Help => {
            print!("{}", args::USAGE);
            return Ok(());
        }
        Invocation::Version => {
            println!("lesspass {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Invocation::Generate(opts) => opts,
    };
    debug!(?opts, "parsed command line");

    // The engine lives for this block only.
    let (generated, to_clipboard) = {
        let mut engine = LessPass::new();
        let config = resolve::resolve(&opts, &mut engine, &mut TerminalPrompt)?;
        let generated = engine.generate(&opts.site, &opts.login, &config.secret);
        (generated, config.copy_to_clipboard)
    };

    if to_clipboard {
        clipboard::copy(&generated, settings.clipboard_timeout).map_err(Error::Clipboard)?;
    } else {
        println!("{generated}");
    }
    Ok(())
}

// end of source
