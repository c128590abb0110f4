//! Configuration management for mimir
//!
//! This crate provides functionality for managing the mimir configuration, including loading,
//! saving, updating, and deleting configuration settings, and overriding them from the
//! environment.

/// Error types for the configuration module
pub mod error;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::Error;
use clap::Parser;
use mimir_common::utils::{
    env::{get_env, get_env_parsed},
    io::file::{delete_file, read_file, write_file},
};
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use tracing::{debug, error, info};

/// Overrides the location of the configuration file.
pub const CONFIG_PATH_ENV: &str = "MIMIR_CONFIG";

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "mimir config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct represents the configuration of the CLI. Every harness command
/// reads its defaults from here; command line flags take precedence.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// The command that runs a program on the VM under test. Empty means the in-process
    /// loopback VM.
    pub vm_command: String,

    /// Arguments passed to `vm_command` before the program identifier
    pub vm_args: Vec<String>,

    /// Time limit per VM invocation, in milliseconds
    pub timeout_ms: u64,

    /// Number of randomized EC multiplication trials
    pub ec_mul_trials: usize,

    /// Base seed for the randomized EC multiplication trials. Random if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ec_mul_seed: Option<u64>,

    /// Number of worker threads for EC multiplication trials
    pub ec_mul_threads: usize,

    /// The curve under test
    pub curve: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            vm_command: "".to_string(),
            vm_args: Vec::new(),
            timeout_ms: 60_000,
            ec_mul_trials: 20,
            ec_mul_seed: None,
            ec_mul_threads: 1,
            curve: "alt_bn128".to_string(),
        }
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| Error::InvalidValue { key: key.to_string(), reason: format!("'{value}' ({e})") })
}

#[allow(deprecated)]
impl Configuration {
    /// Returns the path of the configuration file: `$MIMIR_CONFIG` if set, otherwise
    /// `~/.mimir/config.toml`.
    pub fn path() -> Result<PathBuf, Error> {
        if let Some(path) = get_env(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let mut home = home_dir().ok_or(Error::NoHomeDirectory)?;
        home.push(".mimir");
        home.push("config.toml");
        Ok(home)
    }

    /// Returns the current configuration, with environment overrides applied. A missing
    /// configuration file is created with the defaults.
    pub fn load() -> Result<Self, Error> {
        let path = Self::path()?;

        // if the config file doesn't exist, create it
        if !path.exists() {
            Configuration::default().save_to(&path)?;
        }

        let mut config = Self::load_from(&path)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Reads the configuration file at `path`, without environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = read_file(path).map_err(|e| Error::file("read", path, e))?;

        toml::from_str(&contents)
            .map_err(|e| Error::Syntax { path: path.to_path_buf(), reason: e.to_string() })
    }

    /// Overrides settings from `MIMIR_VM_COMMAND`, `MIMIR_TIMEOUT_MS`, `MIMIR_EC_MUL_TRIALS`,
    /// `MIMIR_EC_MUL_SEED` and `MIMIR_EC_MUL_THREADS`, when set.
    pub fn apply_env(&mut self) -> Result<(), Error> {
        if let Some(command) = get_env("MIMIR_VM_COMMAND") {
            debug!("overriding vm_command from environment");
            self.vm_command = command;
        }
        if let Some(timeout_ms) = get_env_parsed("MIMIR_TIMEOUT_MS").map_err(Error::Environment)? {
            debug!("overriding timeout_ms from environment");
            self.timeout_ms = timeout_ms;
        }
        if let Some(trials) = get_env_parsed("MIMIR_EC_MUL_TRIALS").map_err(Error::Environment)? {
            debug!("overriding ec_mul_trials from environment");
            self.ec_mul_trials = trials;
        }
        if let Some(seed) = get_env_parsed("MIMIR_EC_MUL_SEED").map_err(Error::Environment)? {
            debug!("overriding ec_mul_seed from environment");
            self.ec_mul_seed = Some(seed);
        }
        if let Some(threads) =
            get_env_parsed("MIMIR_EC_MUL_THREADS").map_err(Error::Environment)?
        {
            debug!("overriding ec_mul_threads from environment");
            self.ec_mul_threads = threads;
        }
        Ok(())
    }

    /// Saves the configuration to the configuration file.
    pub fn save(&self) -> Result<(), Error> {
        self.save_to(Self::path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let serialized = toml::to_string(&self).map_err(|e| Error::file("serialize", path, e))?;

        write_file(path, &serialized).map_err(|e| Error::file("write", path, e))
    }

    /// Deletes the configuration file.
    pub fn delete() -> Result<(), Error> {
        let path = Self::path()?;
        delete_file(&path).map_err(|e| Error::file("delete", &path, e))
    }

    /// Sets `key` to `value` and saves the configuration file.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        match key {
            "vm_command" => {
                self.vm_command = value.to_string();
            }
            "vm_args" => {
                self.vm_args = value.split_whitespace().map(String::from).collect();
            }
            "timeout_ms" => {
                self.timeout_ms = parse(key, value)?;
            }
            "ec_mul_trials" => {
                self.ec_mul_trials = parse(key, value)?;
            }
            "ec_mul_seed" => {
                self.ec_mul_seed =
                    if value.trim().is_empty() { None } else { Some(parse(key, value)?) };
            }
            "ec_mul_threads" => {
                self.ec_mul_threads = parse(key, value)?;
            }
            "curve" => {
                self.curve = value.to_string();
            }
            _ => return Err(Error::UnknownKey(key.to_string())),
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }

    /// The time limit per VM invocation.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!("found key but no value to set. Please specify a value to set, use `mimir config --help` for more information.");
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `mimir config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}
