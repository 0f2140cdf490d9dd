//
//  build-center-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Persistent settings for the `bc` tool, stored as TOML in a
//! platform-specific directory, and the resolution of those settings
//! against command-line flags and environment variables.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/build-center/config.toml`
//! - **macOS**: `~/Library/Application Support/build-center/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\build-center\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! server = "https://builds.example.com"
//! token = "c2VjcmV0"
//! proxy = "localhost:3128"
//! ```
//!
//! ## Precedence
//!
//! A flag (or its environment variable) wins over the file, and the file
//! wins over the built-in default. Only the server has a default,
//! [`DEFAULT_SERVER`].
//!
//! ```rust,no_run
//! use build_center_cli::config::{Config, Settings};
//!
//! let config = Config::load()?;
//! let settings = Settings::resolve(None, None, None, &config)?;
//! let client = settings.client()?;
//! println!("talking to {}", client.base_url());
//! # Ok::<(), anyhow::Error>(())
//! ```

mod file;

pub use file::*;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::ApiClient;

/// Server used when neither a flag, the environment nor the file names one.
pub const DEFAULT_SERVER: &str = "http://localhost:5000";

/// Keys accepted by [`Config::get`], [`Config::set`] and [`Config::unset`].
pub const CONFIG_KEYS: &[&str] = &["server", "token", "proxy"];

/// Contents of the configuration file.
///
/// Every key is optional; an absent file is the same as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Build Center server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Forward proxy, `host:port`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

impl Config {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration from `path`, or the default one if the file
    /// does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "build-center")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "server" => self.server.as_deref(),
            "token" => self.token.as_deref(),
            "proxy" => self.proxy.as_deref(),
            _ => None,
        }
    }

    /// Sets `key`; returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        match self.slot(key) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Clears `key`; returns `false` for unknown keys.
    pub fn unset(&mut self, key: &str) -> bool {
        match self.slot(key) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "server" => Some(&mut self.server),
            "token" => Some(&mut self.token),
            "proxy" => Some(&mut self.proxy),
            _ => None,
        }
    }
}

/// Effective connection settings after applying precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: String,
    pub token: Option<String>,
    pub proxy: Option<String>,
}

impl Settings {
    /// Merges explicit values (flags or environment) over the file.
    ///
    /// # Errors
    ///
    /// Fails if the resulting server is not an absolute `http` or `https` URL.
    pub fn resolve(
        server: Option<&str>,
        token: Option<&str>,
        proxy: Option<&str>,
        file: &Config,
    ) -> Result<Self> {
        let server = server
            .or(file.server.as_deref())
            .unwrap_or(DEFAULT_SERVER);
        validate_server(server)?;

        Ok(Self {
            server: server.to_string(),
            token: token.or(file.token.as_deref()).map(str::to_string),
            proxy: proxy.or(file.proxy.as_deref()).map(str::to_string),
        })
    }

    /// Builds the transport described by these settings.
    pub fn client(&self) -> Result<ApiClient> {
        let mut client = ApiClient::new(self.server.clone())?;
        if let Some(token) = &self.token {
            client = client.with_token(token.clone());
        }
        if let Some(proxy) = &self.proxy {
            client = client
                .with_proxy(proxy)
                .with_context(|| format!("Invalid proxy '{proxy}'"))?;
        }
        Ok(client)
    }
}

/// Checks that `server` is an absolute `http(s)` URL.
pub fn validate_server(server: &str) -> Result<()> {
    let url = Url::parse(server).with_context(|| format!("Invalid server URL '{server}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid server URL '{server}': scheme must be http or https");
    }
    if url.host_str().is_none() {
        bail!("Invalid server URL '{server}': missing host");
    }
    Ok(())
}
