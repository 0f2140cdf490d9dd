//
//  build-center-cli
//  cli/smoke.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Smoke Test
//!
//! Exercises every admin endpoint against a live server: creates a token,
//! an app with a release, an asset and a webhook, then removes everything
//! again. Run it with the `initial` token printed by `bc setup`.
//!
//! Cleanup is not limited to what this run created: every app and every
//! global token except `initial` is deleted.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use tracing::info;

use crate::api::{
    AccessFlags, Api, App, Create, CreateAccessTokenCommand, Delete, Get, List, Release, Tags,
    Webhook, WebhookEvent, WebhookType,
};
use crate::config::Settings;
use crate::output::OutputWriter;

use super::setup::INITIAL_TOKEN_ID;
use super::GlobalOptions;

const SAMPLE_FILE: &[u8] = b"This is a sample file uploaded by the Build Center smoke test.\n";
const WEBHOOK_TARGET: &str = "http://localhost:5000/webhook-test";

#[derive(Args, Debug)]
pub struct SmokeTestCommand {
    /// Keep the created resources
    #[arg(long)]
    pub skip_delete: bool,
}

impl SmokeTestCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        run_smoke_test(&global.settings()?, self.skip_delete).await?;
        OutputWriter::new().write_success("Smoke test passed");
        Ok(())
    }
}

/// Runs the smoke test with `settings`, whose token must have admin access.
pub async fn run_smoke_test(settings: &Settings, skip_delete: bool) -> Result<()> {
    let initial_api = Api::new(settings.client()?);

    let mut command = CreateAccessTokenCommand::new(
        AccessFlags::ADMIN | AccessFlags::READ | AccessFlags::WRITE,
        true,
    );
    command.description = Some("Global admin read/write token".to_string());
    let admin_token = initial_api.access_tokens.create(&command).await?;
    info!("Created global access token {}", display_id(admin_token.id.as_deref()));

    let token_value = admin_token
        .value
        .clone()
        .context("Server did not return the value of the new access token")?;
    let api = Api::new(
        Settings {
            token: Some(token_value),
            ..settings.clone()
        }
        .client()?,
    );

    let now = Utc::now().timestamp();
    let app = api
        .apps
        .create(&App::new(format!("myapp-{now}"), format!("My App {now}")))
        .await?;
    let app_id = display_id(app.id.as_deref());
    info!("Created app {}", app_id);

    let release = app.releases()?.create(&Release::new("1.0.0")).await?;
    info!("Created release {} for app {}", display_id(release.id.as_deref()), app_id);

    let mut tags = Tags::new();
    tags.insert("arch".to_string(), Some(std::env::consts::ARCH.to_string()));
    tags.insert("os".to_string(), Some(std::env::consts::OS.to_string()));
    let mut source = SAMPLE_FILE;
    let asset = release
        .assets()?
        .upload("file.txt", &mut source, Some(&tags))
        .await?;
    info!(
        "Created asset {} for release {}",
        display_id(asset.id.as_deref()),
        display_id(release.id.as_deref())
    );

    let webhook = app
        .webhooks()?
        .create(&Webhook::new(
            WebhookType::Discord,
            WEBHOOK_TARGET,
            vec![WebhookEvent::ReleasePublished, WebhookEvent::PrereleasePublished],
        ))
        .await?;
    info!("Created webhook {} for app {}", display_id(webhook.id.as_deref()), app_id);

    if !skip_delete {
        clean_up(&api, &initial_api).await?;
    }
    Ok(())
}

/// Deletes every app with its children, then every global token except
/// `initial`. Global tokens are deleted with `initial_api` because the
/// admin token used for the rest is one of them.
async fn clean_up(api: &Api, initial_api: &Api) -> Result<()> {
    for listed in api.apps.list().await? {
        let app = api.apps.get(require_id(listed.id.as_deref())?).await?;
        let app_id = require_id(app.id.as_deref())?;

        for webhook in app.webhooks()?.list().await? {
            let id = require_id(webhook.id.as_deref())?;
            info!("Deleting webhook {} for app {}", id, app_id);
            api.webhooks.delete(id).await?;
        }

        for listed_release in app.releases()?.list().await? {
            let release = api
                .releases
                .get(require_id(listed_release.id.as_deref())?)
                .await?;
            let release_id = require_id(release.id.as_deref())?;

            for asset in release.assets()?.list().await? {
                let id = require_id(asset.id.as_deref())?;
                info!("Deleting asset {} for release {}", id, release_id);
                api.assets.delete(id).await?;
            }

            info!("Deleting release {} for app {}", release_id, app_id);
            api.releases.delete(release_id).await?;
        }

        for token in app.tokens()?.list().await? {
            let id = require_id(token.id.as_deref())?;
            info!("Deleting access token {} for app {}", id, app_id);
            api.access_tokens.delete(id).await?;
        }

        info!("Deleting app {}", app_id);
        api.apps.delete(app_id).await?;
    }

    for token in api.access_tokens.list().await? {
        let id = require_id(token.id.as_deref())?;
        if id != INITIAL_TOKEN_ID {
            info!("Deleting global access token {}", id);
            initial_api.access_tokens.delete(id).await?;
        }
    }
    Ok(())
}

fn require_id(id: Option<&str>) -> Result<&str> {
    id.context("Server returned a resource without an id")
}

fn display_id(id: Option<&str>) -> &str {
    id.unwrap_or("<no id>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn settings(server: &mockito::ServerGuard) -> Settings {
        Settings {
            server: server.url(),
            token: Some("initial-secret".into()),
            proxy: None,
        }
    }

    #[tokio::test]
    async fn test_creates_every_resource() {
        let mut server = mockito::Server::new_async().await;
        let token = server
            .mock("POST", "/admin/access-tokens")
            .match_header("authorization", "Bearer initial-secret")
            .match_body(Matcher::PartialJson(json!({"enabled": true, "access": 7})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"t1","enabled":true,"access":7,"value":"admin-secret"}"#)
            .create_async()
            .await;
        let app = server
            .mock("POST", "/admin/apps")
            .match_header("authorization", "Bearer admin-secret")
            .match_body(Matcher::Regex(r#""name":"myapp-\d+""#.into()))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"a1","name":"myapp-1","title":"My App 1","url":"admin/apps/a1"}"#)
            .create_async()
            .await;
        let release = server
            .mock("POST", "/admin/apps/a1/releases")
            .match_body(Matcher::PartialJson(json!({"version": "1.0.0"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"r1","version":"1.0.0","url":"admin/releases/r1"}"#)
            .create_async()
            .await;
        let asset = server
            .mock("POST", "/admin/releases/r1/assets")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"filename="file.txt""#.into()),
                Matcher::Regex(format!("arch={}", std::env::consts::ARCH)),
                Matcher::Regex(format!("os={}", std::env::consts::OS)),
            ]))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"f1","name":"file.txt"}"#)
            .create_async()
            .await;
        let webhook = server
            .mock("POST", "/admin/apps/a1/webhooks")
            .match_body(Matcher::PartialJson(json!({
                "type": "discord",
                "url": WEBHOOK_TARGET,
                "events": ["release_published", "prerelease_published"]
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"w1","type":"discord","url":"http://localhost:5000/webhook-test","events":[]}"#)
            .create_async()
            .await;

        run_smoke_test(&settings(&server), true).await.unwrap();

        for mock in [token, app, release, asset, webhook] {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_missing_token_value_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/admin/access-tokens")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"t1","enabled":true,"access":7}"#)
            .create_async()
            .await;

        let err = run_smoke_test(&settings(&server), true).await.unwrap_err();
        assert!(err.to_string().contains("did not return the value"));
    }

    #[tokio::test]
    async fn test_clean_up_keeps_initial_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/apps")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("GET", "/admin/access-tokens")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"initial","enabled":true,"access":7},{"id":"t1","enabled":true,"access":7}]"#)
            .create_async()
            .await;
        let deleted = server
            .mock("DELETE", "/admin/access-tokens/t1")
            .match_header("authorization", "Bearer initial-secret")
            .with_status(204)
            .create_async()
            .await;
        let kept = server
            .mock("DELETE", "/admin/access-tokens/initial")
            .expect(0)
            .create_async()
            .await;

        let settings = settings(&server);
        let initial_api = Api::new(settings.client().unwrap());
        let api = Api::new(
            Settings {
                token: Some("admin-secret".into()),
                ..settings
            }
            .client()
            .unwrap(),
        );
        clean_up(&api, &initial_api).await.unwrap();

        deleted.assert_async().await;
        kept.assert_async().await;
    }
}
