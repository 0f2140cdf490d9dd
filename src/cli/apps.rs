//
//  build-center-cli
//  cli/apps.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::{App, Create, Delete, Get, List};
use crate::output::OutputWriter;

use super::{run_update, GlobalOptions, IdArgs, UpdateArgs};

#[derive(Args, Debug)]
pub struct AppsCommand {
    #[command(subcommand)]
    pub command: AppsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AppsSubcommand {
    /// Create an app
    Create(CreateArgs),

    /// List all apps
    #[command(visible_alias = "list")]
    Ls,

    /// Show one app
    Get(IdArgs),

    /// Update apps from JSON
    Update(UpdateArgs),

    /// Delete an app
    #[command(visible_alias = "delete")]
    Rm(IdArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Unique app name
    pub name: String,

    /// Display title
    #[arg(long)]
    pub title: String,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Allow reading releases without a token
    #[arg(long)]
    pub public: bool,
}

impl AppsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AppsSubcommand::Create(args) => self.create(args, global).await,
            AppsSubcommand::Ls => self.list(global).await,
            AppsSubcommand::Get(args) => self.get(args, global).await,
            AppsSubcommand::Update(args) => run_update(&global.api()?.apps, args).await,
            AppsSubcommand::Rm(args) => self.delete(args, global).await,
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;

        let mut request = App::new(&args.name, &args.title).with_public(args.public);
        if let Some(description) = &args.description {
            request = request.with_description(description);
        }

        let app = api.apps.create(&request).await?;
        OutputWriter::new().write(&app)
    }

    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let apps = global.api()?.apps.list().await?;
        OutputWriter::new().write(&apps)
    }

    async fn get(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let app = global.api()?.apps.get(&args.id).await?;
        OutputWriter::new().write(&app)
    }

    async fn delete(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        global.api()?.apps.delete(&args.id).await?;
        OutputWriter::new().write_success(&format!("Deleted app {}", args.id));
        Ok(())
    }
}
