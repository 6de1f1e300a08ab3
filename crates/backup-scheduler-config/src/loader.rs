//! Configuration loader.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::{CommandLine, Config};

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    ///
    /// `${VAR}` references are expanded after parsing, and only in the
    /// server, rclone and logging settings and in sync job arguments. Shell
    /// job lines and schedules are kept verbatim so the shell sees its own
    /// variables at run time.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        Self::expand_config(&mut config)?;
        Ok(config)
    }

    fn expand_config(config: &mut Config) -> Result<(), ConfigError> {
        config.server.host = Self::expand_env_vars(&config.server.host)?;

        let rclone = &mut config.rclone;
        rclone.binary = Self::expand_env_vars(&rclone.binary)?;
        if let Some(file) = rclone.config_file.take() {
            rclone.config_file = Some(Self::expand_path(&Self::expand_env_vars(&file)?));
        }
        for arg in &mut rclone.extra_args {
            *arg = Self::expand_env_vars(arg)?;
        }

        let logging = &mut config.logging;
        logging.level = Self::expand_env_vars(&logging.level)?;
        if let Some(dir) = logging.directory.take() {
            logging.directory = Some(Self::expand_path(&Self::expand_env_vars(&dir)?));
        }

        for job in &mut config.jobs {
            match &mut job.command {
                Some(CommandLine::Line(line)) => *line = Self::expand_env_vars(line)?,
                Some(CommandLine::Args(args)) => {
                    for arg in args {
                        *arg = Self::expand_env_vars(arg)?;
                    }
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(value: &str) -> Result<String, ConfigError> {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
        });

        let mut result = value.to_string();
        for cap in re.captures_iter(value) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
