use anyhow::Result;

use super::build;
use crate::configuration::ConfigKey;

#[test]
fn it_exposes_every_config_key_as_a_flag() {
    let cmd = build();
    for key in [
        ConfigKey::Backend,
        ConfigKey::LogFile,
        ConfigKey::LogLevel,
        ConfigKey::Model,
        ConfigKey::OllamaUrl,
        ConfigKey::Timeout,
    ] {
        assert!(
            cmd.get_arguments()
                .any(|e| e.get_long() == Some(key.to_string().as_str())),
            "missing --{key}"
        );
    }
}

#[test]
fn it_rejects_unknown_backends() {
    let res = build().try_get_matches_from(["shellhint", "--backend", "openai"]);
    assert!(res.is_err());
}

#[test]
fn it_parses_the_completions_subcommand() -> Result<()> {
    let matches = build().try_get_matches_from(["shellhint", "completions", "--shell", "zsh"])?;
    let (name, _) = matches.subcommand().unwrap();
    assert_eq!(name, "completions");

    Ok(())
}

#[test]
fn it_keeps_flag_values_as_strings() -> Result<()> {
    let matches = build().try_get_matches_from(["shellhint", "-m", "llama3:8b", "-t", "30"])?;

    assert_eq!(
        matches.get_one::<String>(&ConfigKey::Model.to_string()),
        Some(&"llama3:8b".to_string())
    );
    assert_eq!(
        matches.get_one::<String>(&ConfigKey::Timeout.to_string()),
        Some(&"30".to_string())
    );

    Ok(())
}
