use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use keitai_organizer::classifier::TerminalForm;
use keitai_organizer::cli::Cli;
use keitai_organizer::config::Config;
use keitai_organizer::session::{SessionOutcome, run_session};
use keitai_organizer::translator::{DeepLTransport, Translator, TranslatorSettings};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = Config::config_path()?;
    let config = Config::load_from(&config_path)?;
    let api_key = config.api_key(&config_path)?;

    let transport = DeepLTransport::new(&config.endpoint)?;
    let mut translator = Translator::new(transport, TranslatorSettings::from_config(&config, api_key));
    let mut form = TerminalForm;

    match run_session(&cli.folder, &mut translator, &mut form)? {
        SessionOutcome::NothingToClassify => println!("No apps to classify."),
        SessionOutcome::Dismissed => println!("Form closed without confirming; nothing was moved."),
        SessionOutcome::Reconciled(summary) => println!(
            "Done. {} moved, {} already in place, {} missing (of {}).",
            summary.moved, summary.unchanged, summary.missing, summary.total
        ),
    }

    Ok(ExitCode::SUCCESS)
}
