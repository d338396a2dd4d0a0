//! Layered configuration loader.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_RUNTIME__FORCE_CPU=true`).
//! The `[runtime]` table drives device and thread selection.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Knobs for [`crate::select::initialize`].
///
/// Defaults reproduce the stock behavior: autotune on, probe accelerator 0,
/// keep two cores free for the rest of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub autotune: bool,
    pub force_cpu: bool,
    pub accelerator_ordinal: usize,
    pub reserved_cores: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self { autotune: true, force_cpu: false, accelerator_ordinal: 0, reserved_cores: 2 }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// The `[runtime]` table layered over [`RuntimeSettings::default`].
    pub fn runtime_settings(&self) -> Result<RuntimeSettings> {
        Figment::from(Serialized::defaults(RuntimeSettings::default()))
            .merge(self.figment.focus("runtime"))
            .extract()
            .map_err(|e| Error::InvalidConfig(format!("Failed to read 'runtime': {}", e)))
    }

    fn validate(&self) -> Result<()> {
        let settings = self.runtime_settings()?;
        if settings.force_cpu && settings.accelerator_ordinal != 0 {
            tracing::warn!(
                ordinal = settings.accelerator_ordinal,
                "runtime.accelerator_ordinal is ignored when runtime.force_cpu is set"
            );
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
