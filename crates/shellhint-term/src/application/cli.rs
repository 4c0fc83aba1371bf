#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Shell;
use strum::IntoEnumIterator;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendName;

fn arg_for(key: ConfigKey, help: &str) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .num_args(1)
        .help(format!("{help} [default: {}]", Config::default(key)));
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for")
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

pub fn build() -> Command {
    let backends = BackendName::iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>();

    return Command::new("shellhint")
        .about("Describe what you want to do, get a shell command back")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(subcommand_completions())
        .arg(
            arg_for(ConfigKey::Backend, "The model backend to talk to")
                .short('b')
                .env("SHELLHINT_BACKEND")
                .value_parser(PossibleValuesParser::new(backends)),
        )
        .arg(
            arg_for(ConfigKey::Model, "The model used to suggest commands")
                .short('m')
                .env("SHELLHINT_MODEL"),
        )
        .arg(
            arg_for(ConfigKey::OllamaUrl, "Address of the Ollama server")
                .env("OLLAMA_HOST"),
        )
        .arg(
            arg_for(
                ConfigKey::Timeout,
                "Seconds to wait for a suggestion before giving up, 0 waits forever",
            )
            .short('t')
            .env("SHELLHINT_TIMEOUT"),
        )
        .arg(
            arg_for(ConfigKey::LogLevel, "Log filter, e.g. info or shellhint_term=debug")
                .env("SHELLHINT_LOG"),
        )
        .arg(arg_for(ConfigKey::LogFile, "Where logs are written").env("SHELLHINT_LOG_FILE"));
}

fn print_completions(matches: &ArgMatches) {
    if let Some(shell) = matches.get_one::<Shell>("shell").copied() {
        let mut app = build();
        let name = app.get_name().to_string();
        generate(shell, &mut app, name, &mut io::stdout());
    }
}

/// Parses the process arguments into `Config`. Returns `false` when a
/// subcommand already did all the work and the UI should not start.
pub fn parse() -> Result<bool> {
    let matches = build().get_matches();
    return parse_matches(&matches);
}

pub fn parse_matches(matches: &ArgMatches) -> Result<bool> {
    if let Some(("completions", subcmd_matches)) = matches.subcommand() {
        print_completions(subcmd_matches);
        return Ok(false);
    }

    Config::load(vec![matches])?;
    return Ok(true);
}
