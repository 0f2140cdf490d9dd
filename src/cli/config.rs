//
//  build-center-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{validate_server, Config, CONFIG_KEYS};
use crate::output::OutputWriter;

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Remove a configuration value
    Unset(GetArgs),

    /// Print the whole configuration file
    #[command(visible_alias = "ls")]
    List,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// One of: server, token, proxy
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// One of: server, token, proxy
    pub key: String,

    pub value: String,
}

fn check_key(key: &str) -> Result<()> {
    if !CONFIG_KEYS.contains(&key) {
        bail!(
            "Unknown configuration key '{}'. Valid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        );
    }
    Ok(())
}

impl ConfigCommand {
    pub async fn run(&self, _global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args),
            ConfigSubcommand::Set(args) => self.set(args),
            ConfigSubcommand::Unset(args) => self.unset(args),
            ConfigSubcommand::List => self.list(),
            ConfigSubcommand::Path => {
                println!("{}", Config::config_path()?.display());
                Ok(())
            }
        }
    }

    fn get(&self, args: &GetArgs) -> Result<()> {
        check_key(&args.key)?;
        let config = Config::load()?;
        if let Some(value) = config.get(&args.key) {
            println!("{}", value);
        }
        Ok(())
    }

    fn set(&self, args: &SetArgs) -> Result<()> {
        check_key(&args.key)?;
        if args.key == "server" {
            validate_server(&args.value)?;
        }

        let mut config = Config::load()?;
        config.set(&args.key, args.value.clone());
        config.save()?;

        let shown = if args.key == "token" { "********" } else { args.value.as_str() };
        OutputWriter::new().write_success(&format!("Set {} = {}", style(&args.key).cyan(), shown));
        Ok(())
    }

    fn unset(&self, args: &GetArgs) -> Result<()> {
        check_key(&args.key)?;
        let mut config = Config::load()?;
        config.unset(&args.key);
        config.save()?;

        OutputWriter::new().write_success(&format!("Unset {}", style(&args.key).cyan()));
        Ok(())
    }

    fn list(&self) -> Result<()> {
        let config = Config::load()?;
        for key in CONFIG_KEYS {
            if let Some(value) = config.get(key) {
                println!("{} = {}", key, value);
            }
        }
        Ok(())
    }
}
