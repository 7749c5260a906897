//! Configuration loader with multi-source merging

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::{Paths, StookwijzerConfig};

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    user_config: bool,
    explicit_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "STOOKWIJZER".to_string(),
            user_config: true,
            explicit_file: None,
        }
    }

    /// Set the directory searched for `stookwijzer.toml` and `stookwijzer.local.toml`
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "STOOKWIJZER")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip `~/.config/stookwijzer/config.toml`
    pub fn without_user_config(mut self) -> Self {
        self.user_config = false;
        self
    }

    /// Layer one more required file above the local config
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.explicit_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<StookwijzerConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = StookwijzerConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User config (~/.config/stookwijzer/config.toml)
        if self.user_config
            && let Ok(user_config_file) = Paths::new().user_config_file()
            && user_config_file.exists()
        {
            debug!(path = %user_config_file.display(), "loading user config");
            builder = builder.add_source(toml_file(user_config_file, false));
        }

        // 3. Project config (stookwijzer.toml)
        let project_config_file = Paths::project_config_file(&self.project_dir);
        if project_config_file.exists() {
            debug!(path = %project_config_file.display(), "loading project config");
            builder = builder.add_source(toml_file(project_config_file, false));
        }

        // 4. Local config (stookwijzer.local.toml, gitignored)
        let local_config_file = Paths::local_config_file(&self.project_dir);
        if local_config_file.exists() {
            debug!(path = %local_config_file.display(), "loading local config");
            builder = builder.add_source(toml_file(local_config_file, false));
        }

        // 5. Explicit file (--config)
        if let Some(file) = &self.explicit_file {
            debug!(path = %file.display(), "loading explicit config");
            builder = builder.add_source(toml_file(file.clone(), true));
        }

        // 6. Environment variables (STOOKWIJZER_SERVICE__ENDPOINT, ...)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Build and deserialize
        let config = builder.build().context("Failed to build configuration")?;

        let mut stookwijzer_config: StookwijzerConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        stookwijzer_config.resolve_paths(&self.project_dir);
        stookwijzer_config.validate()?;

        Ok(stookwijzer_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn toml_file(path: PathBuf, required: bool) -> impl config::Source + Send + Sync + 'static {
    config::File::from(path)
        .required(required)
        .format(config::FileFormat::Toml)
}
