//
//  build-center-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod apps;
mod assets;
mod completion;
mod config;
mod releases;
mod setup;
mod smoke;
mod tokens;
mod webhooks;

pub use apps::AppsCommand;
pub use assets::AssetsCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use releases::ReleasesCommand;
pub use setup::SetupCommand;
pub use smoke::SmokeTestCommand;
pub use tokens::TokensCommand;
pub use webhooks::WebhooksCommand;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::api::{encoding, Api, ApiClient, Bound, Update};
use crate::config::{Config, Settings};
use crate::output::OutputWriter;

/// Build Center CLI - Manage apps, releases and assets from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bc",
    version,
    about = "Manage a Build Center server from the command line",
    long_about = "bc is a CLI for the Build Center admin API.\n\n\
                  It creates, lists, updates and deletes apps, releases, assets,\n\
                  access tokens and webhooks, and prints results as JSON.",
    propagate_version = true,
    after_help = "Use 'bc <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options shared by every command
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Build Center server URL [default: http://localhost:5000]
    #[arg(long, short = 's', global = true, env = "BC_SERVER")]
    pub server: Option<String>,

    /// Access token sent as a bearer token
    #[arg(long, short = 't', global = true, env = "BC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Forward proxy (host:port)
    #[arg(long, global = true, env = "BC_PROXY")]
    pub proxy: Option<String>,

    /// Log filter, e.g. debug or build_center_cli=trace
    #[arg(long, global = true, env = "BC_LOG")]
    pub log: Option<String>,
}

impl GlobalOptions {
    /// Resolves connection settings against the config file.
    pub fn settings(&self) -> Result<Settings> {
        let config = Config::load()?;
        Settings::resolve(
            self.server.as_deref(),
            self.token.as_deref(),
            self.proxy.as_deref(),
            &config,
        )
    }

    pub fn client(&self) -> Result<ApiClient> {
        self.settings()?.client()
    }

    /// The admin endpoints on the configured server.
    pub fn api(&self) -> Result<Api> {
        Ok(Api::new(self.client()?))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage apps
    #[command(visible_alias = "app")]
    Apps(AppsCommand),

    /// Manage releases
    #[command(visible_alias = "release")]
    Releases(ReleasesCommand),

    /// Manage release assets
    #[command(visible_alias = "asset")]
    Assets(AssetsCommand),

    /// Manage access tokens
    #[command(visible_alias = "token")]
    Tokens(TokensCommand),

    /// Manage webhooks
    #[command(visible_alias = "webhook")]
    Webhooks(WebhooksCommand),

    /// Manage the configuration file
    Config(ConfigCommand),

    /// Print instructions to bootstrap the initial admin token
    Setup(SetupCommand),

    /// Run an end-to-end smoke test against the server
    Test(SmokeTestCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Show version information
    Version,
}

/// Arguments of the `update` subcommands.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// File holding a JSON object or array (`-` for stdin)
    #[arg(long, short = 'i', default_value = "-")]
    pub infile: String,
}

/// Arguments of the `get` subcommands.
#[derive(Args, Debug)]
pub struct IdArgs {
    /// Resource identifier
    pub id: String,
}

/// Reads the text of `--infile`, or stdin for `-`.
pub(crate) async fn read_input(infile: &str) -> Result<String> {
    if infile == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(infile)
            .await
            .with_context(|| format!("Failed to read {infile}"))
    }
}

/// Parses update input: one JSON object or an array of them, in wire
/// (camelCase) form.
///
/// Returns the decoded requests and whether the input was an array.
pub(crate) fn parse_update_input<T>(text: &str) -> Result<(Vec<T>, bool)>
where
    T: serde::de::DeserializeOwned,
{
    let value: Value = serde_json::from_str(text).context("Input is not valid JSON")?;
    let value = encoding::decamelize_keys(value);

    match value {
        Value::Array(items) => {
            let requests = items
                .into_iter()
                .map(encoding::from_wire)
                .collect::<Result<Vec<T>, _>>()?;
            Ok((requests, true))
        }
        object @ Value::Object(_) => Ok((vec![encoding::from_wire(object)?], false)),
        _ => anyhow::bail!("Input must be a JSON object or an array of objects"),
    }
}

/// Applies each request of `--infile` through `endpoint` and prints the
/// results, an array for array input.
pub(crate) async fn run_update<E: Update>(endpoint: &E, args: &UpdateArgs) -> Result<()> {
    let text = read_input(&args.infile).await?;
    let (requests, is_array) = parse_update_input::<E::UpdateRequest>(&text)?;

    let mut updated: Vec<Bound<E::Resource>> = Vec::with_capacity(requests.len());
    for request in &requests {
        updated.push(endpoint.update(request).await?);
    }

    let writer = OutputWriter::new();
    if is_array {
        writer.write(&updated)
    } else {
        writer.write(&updated[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{App, Release};
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_object() {
        let (apps, is_array) = parse_update_input::<App>(
            r#"{"name":"myapp","title":"My App","createdAt":5,"url":"admin/apps/abc"}"#,
        )
        .unwrap();
        assert!(!is_array);
        assert_eq!(apps[0].created_at, Some(5));
        assert_eq!(apps[0].url.as_deref(), Some("admin/apps/abc"));
    }

    #[test]
    fn test_parse_update_array() {
        let (releases, is_array) = parse_update_input::<Release>(
            r#"[{"version":"1.0.0","appId":"abc"},{"version":"1.0.1","prerelease":true}]"#,
        )
        .unwrap();
        assert!(is_array);
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].app_id.as_deref(), Some("abc"));
        assert!(releases[1].prerelease);
    }

    #[test]
    fn test_parse_update_rejects_scalars() {
        assert!(parse_update_input::<App>("42").is_err());
        assert!(parse_update_input::<App>("{").is_err());
        assert!(parse_update_input::<App>(r#"{"title":"no name"}"#).is_err());
    }

    #[tokio::test]
    async fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(&path, r#"[{"name":"a","title":"A"}]"#).unwrap();

        let text = read_input(path.to_str().unwrap()).await.unwrap();
        let (apps, is_array) = parse_update_input::<App>(&text).unwrap();
        assert!(is_array);
        assert_eq!(apps[0].name, "a");

        let err = read_input(dir.path().join("missing.json").to_str().unwrap())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_global_options_from_flags() {
        let cli = Cli::try_parse_from([
            "bc",
            "--server",
            "http://bc:5000",
            "--token",
            "abc",
            "apps",
            "ls",
        ])
        .unwrap();
        assert_eq!(cli.global.server.as_deref(), Some("http://bc:5000"));
        assert_eq!(cli.global.token.as_deref(), Some("abc"));
    }
}
