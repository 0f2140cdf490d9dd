//
//  build-center-cli
//  cli/tokens.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::{AccessFlags, CreateAccessTokenCommand, Create, Delete, Get, List};
use crate::output::OutputWriter;

use super::{GlobalOptions, IdArgs};

#[derive(Args, Debug)]
pub struct TokensCommand {
    #[command(subcommand)]
    pub command: TokensSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TokensSubcommand {
    /// Create a global or app access token
    Create(CreateArgs),

    /// List global tokens, or the tokens of an app
    #[command(visible_alias = "list")]
    Ls(ListArgs),

    /// Show one token
    Get(IdArgs),

    /// Delete a token
    #[command(visible_alias = "delete")]
    Rm(IdArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Access flags: a number or names such as admin|read|write
    #[arg(long)]
    pub access: AccessFlags,

    /// Scope the token to this app id
    #[arg(long, short = 'a')]
    pub app: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Lifetime of the token in seconds
    #[arg(long)]
    pub validity_duration: Option<u64>,

    /// Create the token enabled
    #[arg(long)]
    pub enabled: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List the tokens of this app id
    #[arg(long, short = 'a')]
    pub app: Option<String>,
}

impl TokensCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            TokensSubcommand::Create(args) => self.create(args, global).await,
            TokensSubcommand::Ls(args) => self.list(args, global).await,
            TokensSubcommand::Get(args) => self.get(args, global).await,
            TokensSubcommand::Rm(args) => self.delete(args, global).await,
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;

        let mut command = CreateAccessTokenCommand::new(args.access, args.enabled);
        command.description = args.description.clone();
        command.validity_duration = args.validity_duration;

        let token = match &args.app {
            Some(app_id) => {
                let app = api.apps.get(app_id).await?;
                command.app_id = app.id.clone();
                app.tokens()?.create(&command).await?
            }
            None => api.access_tokens.create(&command).await?,
        };

        let writer = OutputWriter::new();
        writer.write(&token)?;
        if token.value.is_some() {
            writer.write_warning("The token value is shown only once, store it now");
        }
        Ok(())
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let api = global.api()?;
        let tokens = match &args.app {
            Some(app_id) => {
                let app = api.apps.get(app_id).await?;
                app.tokens()?.list().await?
            }
            None => api.access_tokens.list().await?,
        };
        OutputWriter::new().write(&tokens)
    }

    async fn get(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        let token = global.api()?.access_tokens.get(&args.id).await?;
        OutputWriter::new().write(&token)
    }

    async fn delete(&self, args: &IdArgs, global: &GlobalOptions) -> Result<()> {
        global.api()?.access_tokens.delete(&args.id).await?;
        OutputWriter::new().write_success(&format!("Deleted access token {}", args.id));
        Ok(())
    }
}
