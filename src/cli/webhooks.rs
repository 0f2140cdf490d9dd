//
//  build-center-cli
//  cli/webhooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::{Create, Delete, Get, List, Webhook, WebhookEvent, WebhookType};
use crate::output::OutputWriter;

use super::{GlobalOptions, IdArgs};

#[derive(Args, Debug)]
pub struct WebhooksCommand {
    #[command(subcommand)]
    pub command: WebhooksSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WebhooksSubcommand {
    /// Subscribe a webhook to events of an app
    Create(CreateArgs),

    /// List the webhooks of an app
    #[command(visible_alias = "list")]
    Ls(ListArgs),

    /// Show one webhook
    Get(IdArgs),

    /// Delete a webhook
    #[command(visible_alias = "delete")]
    Rm(IdArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Owning app id
    #[arg(long, short = 'a')]
    pub app: String,

    /// Delivery service
    #[arg(long = "type", default_value = "discord")]
    pub kind: WebhookType,

    /// Delivery URL
    #[arg(long, short = 'u')]
    pub url: String,

    /// Events, comma separated: release_published, prerelease_published
    #[arg(long, short = 'e', value_delimiter = ',', required = true)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Owning app id
    #[arg(long, short = 'a')]
    pub app: String,
}

impl WebhooksCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            WebhooksSubcommand::Create(args) => self.create(args, global).await,
            WebhooksSubcommand::Ls(args) => self.list(args, global).await,
            WebhooksSubcommand::Get(args) => self.get(args, global).await,
            WebhooksSubcommand::Rm(args) => self.delete(args, global).await,
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;
        let app = api.apps.get(&args.app).await?;

        let request = Webhook::new(args.kind, &args.url, args.events.clone());
        let webhook = app.webhooks()?.create(&request).await?;
        OutputWriter::new().write(&webhook)
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;
        let app = api.apps.get(&args.app).await?;
        let webhooks = app.webhooks()?.list().await?;
        OutputWriter::new().write(&webhooks)
    }

    async fn get(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let webhook = global.api()?.webhooks.get(&args.id).await?;
        OutputWriter::new().write(&webhook)
    }

    async fn delete(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        global.api()?.webhooks.delete(&args.id).await?;
        OutputWriter::new().write_success(&format!("Deleted webhook {}", args.id));
        Ok(())
    }
}
