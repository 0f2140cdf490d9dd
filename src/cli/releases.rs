//
//  build-center-cli
//  cli/releases.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::{Create, Delete, Get, List, Release};
use crate::output::OutputWriter;

use super::{run_update, GlobalOptions, IdArgs, UpdateArgs};

#[derive(Args, Debug)]
pub struct ReleasesCommand {
    #[command(subcommand)]
    pub command: ReleasesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ReleasesSubcommand {
    /// Create a release of an app
    Create(CreateArgs),

    /// List the releases of an app
    #[command(visible_alias = "list")]
    Ls(ListArgs),

    /// Show one release
    Get(IdArgs),

    /// Update releases from JSON
    Update(UpdateArgs),

    /// Delete a release
    #[command(visible_alias = "delete")]
    Rm(IdArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Version string, e.g. 1.0.0
    #[arg(id = "release_version", value_name = "VERSION")]
    pub version: String,

    /// Owning app id
    #[arg(long, short = 'a')]
    pub app: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Source commit the release was built from
    #[arg(long, short = 'c')]
    pub commit: Option<String>,

    #[arg(long)]
    pub prerelease: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Owning app id
    #[arg(long, short = 'a')]
    pub app: String,
}

impl ReleasesCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ReleasesSubcommand::Create(args) => self.create(args, global).await,
            ReleasesSubcommand::Ls(args) => self.list(args, global).await,
            ReleasesSubcommand::Get(args) => self.get(args, global).await,
            ReleasesSubcommand::Update(args) => run_update(&global.api()?.releases, args).await,
            ReleasesSubcommand::Rm(args) => self.delete(args, global).await,
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;
        let app = api.apps.get(&args.app).await?;

        let mut request = Release::new(&args.version);
        request.app_id = app.id.clone();
        request.title = args.title.clone();
        request.description = args.description.clone();
        request.commit = args.commit.clone();
        request.prerelease = args.prerelease;

        let release = app.releases()?.create(&request).await?;
        OutputWriter::new().write(&release)
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;
        let app = api.apps.get(&args.app).await?;
        let releases = app.releases()?.list().await?;
        OutputWriter::new().write(&releases)
    }

    async fn get(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let release = global.api()?.releases.get(&args.id).await?;
        OutputWriter::new().write(&release)
    }

    async fn delete(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        global.api()?.releases.delete(&args.id).await?;
        OutputWriter::new().write_success(&format!("Deleted release {}", args.id));
        Ok(())
    }
}
