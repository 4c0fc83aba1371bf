#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;

use crate::domain::models::BackendName;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    Backend,
    LogFile,
    LogLevel,
    Model,
    OllamaUrl,
    Timeout,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let log_dir = dirs::cache_dir().unwrap_or_else(env::temp_dir);
        let log_file = log_dir.join("shellhint").join("shellhint.log");

        let res = match key {
            ConfigKey::Backend => BackendName::Ollama.to_string(),
            ConfigKey::LogFile => log_file.to_string_lossy().to_string(),
            ConfigKey::LogLevel => "info".to_string(),
            ConfigKey::Model => "gemma:2b".to_string(),
            ConfigKey::OllamaUrl => "http://localhost:11434".to_string(),
            ConfigKey::Timeout => "0".to_string(),
        };

        return res;
    }

    /// Resolves every key from defaults and the given matches. Nothing is
    /// written to the shared config unless all values are valid.
    pub fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        let mut resolved: Vec<(ConfigKey, String)> = ConfigKey::iter()
            .map(|key| (key, Config::default(key)))
            .collect();

        for (key, value) in resolved.iter_mut() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    *value = val.to_string();
                }
            }
        }

        for (key, value) in &resolved {
            if *key == ConfigKey::Timeout && value.parse::<u64>().is_err() {
                bail!("--timeout expects a whole number of seconds, got '{value}'");
            }
        }

        for (key, value) in resolved {
            Config::set(key, &value);
        }

        tracing::debug!(
            backend = Config::get(ConfigKey::Backend),
            model = Config::get(ConfigKey::Model),
            ollama_url = Config::get(ConfigKey::OllamaUrl),
            timeout = Config::get(ConfigKey::Timeout),
            "config"
        );

        return Ok(());
    }

    /// Generate request timeout. `0` disables it.
    pub fn timeout() -> Option<Duration> {
        return match Config::get(ConfigKey::Timeout).parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
        };
    }

    pub fn log_file() -> path::PathBuf {
        return path::PathBuf::from(Config::get(ConfigKey::LogFile));
    }
}
