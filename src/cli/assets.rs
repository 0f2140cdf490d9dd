//
//  build-center-cli
//  cli/assets.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use crate::api::{parse_tag, Delete, Get, List, Tags};
use crate::output::OutputWriter;

use super::{GlobalOptions, IdArgs};

#[derive(Args, Debug)]
pub struct AssetsCommand {
    #[command(subcommand)]
    pub command: AssetsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AssetsSubcommand {
    /// Upload a file as an asset of a release
    #[command(visible_alias = "upload")]
    Create(CreateArgs),

    /// List the assets of a release
    #[command(visible_alias = "list")]
    Ls(ListArgs),

    /// Show one asset
    Get(IdArgs),

    /// Delete an asset
    #[command(visible_alias = "delete")]
    Rm(IdArgs),

    /// Download the contents of an asset
    Download(DownloadArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// File to upload (`-` for stdin)
    pub file: String,

    /// Owning release id
    #[arg(long, short = 'r')]
    pub release: String,

    /// Asset name [default: the file's base name]
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Tag as key=value or key, repeatable
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Owning release id
    #[arg(long, short = 'r')]
    pub release: String,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Asset identifier
    pub id: String,

    /// Destination file (`-` for stdout)
    #[arg(long, short = 'o', default_value = "-")]
    pub out: String,
}

/// Name an upload gets when `--name` is not given.
fn default_asset_name(file: &str) -> Result<String> {
    if file == "-" {
        return Ok("stdin".to_string());
    }
    match Path::new(file).file_name() {
        Some(name) => Ok(name.to_string_lossy().into_owned()),
        None => bail!("Cannot derive an asset name from '{file}', pass --name"),
    }
}

fn collect_tags(lines: &[String]) -> Option<Tags> {
    if lines.is_empty() {
        return None;
    }
    Some(lines.iter().map(|line| parse_tag(line)).collect())
}

impl AssetsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AssetsSubcommand::Create(args) => self.create(args, global).await,
            AssetsSubcommand::Ls(args) => self.list(args, global).await,
            AssetsSubcommand::Get(args) => self.get(args, global).await,
            AssetsSubcommand::Rm(args) => self.delete(args, global).await,
            AssetsSubcommand::Download(args) => self.download(args, global).await,
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let name = match &args.name {
            Some(name) => name.clone(),
            None => default_asset_name(&args.file)?,
        };
        let tags = collect_tags(&args.tags);

        let api = global.api()?;
        let release = api.releases.get(&args.release).await?;
        let assets = release.assets()?;

        let asset = if args.file == "-" {
            let mut stdin = tokio::io::stdin();
            assets.upload(&name, &mut stdin, tags.as_ref()).await?
        } else {
            let mut file = tokio::fs::File::open(&args.file)
                .await
                .with_context(|| format!("Failed to open {}", args.file))?;
            assets.upload(&name, &mut file, tags.as_ref()).await?
        };

        OutputWriter::new().write(&asset)
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;
        let release = api.releases.get(&args.release).await?;
        let assets = release.assets()?.list().await?;
        OutputWriter::new().write(&assets)
    }

    async fn get(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let asset = global.api()?.assets.get(&args.id).await?;
        OutputWriter::new().write(&asset)
    }

    async fn delete(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        global.api()?.assets.delete(&args.id).await?;
        OutputWriter::new().write_success(&format!("Deleted asset {}", args.id));
        Ok(())
    }

    async fn download(&self, args: &DownloadArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;
        let asset = api.assets.get(&args.id).await?;

        if args.out == "-" {
            let mut stdout = tokio::io::stdout();
            asset.download(&mut stdout).await?;
        } else {
            let mut file = tokio::fs::File::create(&args.out)
                .await
                .with_context(|| format!("Failed to create {}", args.out))?;
            asset.download(&mut file).await?;
            OutputWriter::new().write_success(&format!("Saved {} to {}", asset.name, args.out));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_asset_name() {
        assert_eq!(default_asset_name("-").unwrap(), "stdin");
        assert_eq!(default_asset_name("dist/app-1.0.0.tar.gz").unwrap(), "app-1.0.0.tar.gz");
        assert!(default_asset_name("..").is_err());
    }

    #[test]
    fn test_collect_tags() {
        assert_eq!(collect_tags(&[]), None);

        let tags = collect_tags(&["os=linux".into(), "nightly".into()]).unwrap();
        assert_eq!(tags.get("os"), Some(&Some("linux".to_string())));
        assert_eq!(tags.get("nightly"), Some(&None));
    }
}
