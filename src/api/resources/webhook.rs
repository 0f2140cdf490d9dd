//
//  build-center-cli
//  api/resources/webhook.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Webhook subscriptions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::api::endpoints::{Create, Delete, Get, List, ResourceEndpoint};

/// The service a webhook delivers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookType {
    Discord,
}

/// Events a webhook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    ReleasePublished,
    PrereleasePublished,
}

impl FromStr for WebhookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discord" => Ok(Self::Discord),
            other => Err(format!("unknown webhook type '{other}' (expected: discord)")),
        }
    }
}

impl fmt::Display for WebhookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discord => write!(f, "discord"),
        }
    }
}

impl FromStr for WebhookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release_published" => Ok(Self::ReleasePublished),
            "prerelease_published" => Ok(Self::PrereleasePublished),
            other => Err(format!(
                "unknown webhook event '{other}' (expected: release_published, prerelease_published)"
            )),
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReleasePublished => write!(f, "release_published"),
            Self::PrereleasePublished => write!(f, "prerelease_published"),
        }
    }
}

/// A webhook subscription on an app.
///
/// `url` is the delivery target, not the resource's own address; webhooks
/// are addressed by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(rename = "type")]
    pub kind: WebhookType,
    /// Delivery target
    pub url: String,
    pub events: Vec<WebhookEvent>,

    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Webhook {
    /// Creates an unattached webhook.
    pub fn new(kind: WebhookType, url: impl Into<String>, events: Vec<WebhookEvent>) -> Self {
        Self {
            kind,
            url: url.into(),
            events,
            id: None,
            created_at: None,
        }
    }
}

impl Resource for Webhook {
    type Children = ();

    const KIND: &'static str = "webhook";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn resource_url(&self) -> Option<&str> {
        None
    }
}

/// Endpoint for webhook collections.
pub type WebhookEndpoint = ResourceEndpoint<Webhook>;

impl Create for WebhookEndpoint {
    type CreateRequest = Webhook;
}
impl Get for WebhookEndpoint {}
impl List for WebhookEndpoint {}
impl Delete for WebhookEndpoint {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::encoding::to_wire;
    use crate::api::ApiClient;
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_events_encode_as_strings() {
        let webhook = Webhook::new(
            WebhookType::Discord,
            "http://localhost:5000/webhook-test",
            vec![WebhookEvent::ReleasePublished, WebhookEvent::PrereleasePublished],
        );
        let wire = to_wire(&webhook).unwrap();
        assert_eq!(wire["type"], "discord");
        assert_eq!(wire["events"], json!(["release_published", "prerelease_published"]));
        assert_eq!(wire["createdAt"], json!(null));
    }

    #[test]
    fn test_parse_event() {
        assert_eq!("release_published".parse::<WebhookEvent>(), Ok(WebhookEvent::ReleasePublished));
        assert!("push".parse::<WebhookEvent>().is_err());
        assert_eq!(WebhookType::Discord.to_string(), "discord");
    }

    #[tokio::test]
    async fn test_list_preserves_server_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/apps/abc/webhooks")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":"w3","type":"discord","url":"http://c","events":[]},
                    {"id":"w1","type":"discord","url":"http://a","events":["release_published"]},
                    {"id":"w2","type":"discord","url":"http://b","events":["prerelease_published"]}
                ]"#,
            )
            .create_async()
            .await;

        let client = Arc::new(ApiClient::new(server.url()).unwrap());
        let webhooks = WebhookEndpoint::new("admin/apps/abc/webhooks", client);
        let listed = webhooks.list().await.unwrap();

        let ids: Vec<_> = listed.iter().map(|w| w.id.clone().unwrap()).collect();
        assert_eq!(ids, ["w3", "w1", "w2"]);
        assert_eq!(listed[1].events, [WebhookEvent::ReleasePublished]);
    }

    #[tokio::test]
    async fn test_create_sends_type_and_events() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/apps/abc/webhooks")
            .match_body(Matcher::PartialJson(json!({
                "type": "discord",
                "url": "http://hook",
                "events": ["release_published"]
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"w1","type":"discord","url":"http://hook","events":["release_published"],"createdAt":5}"#)
            .create_async()
            .await;

        let client = Arc::new(ApiClient::new(server.url()).unwrap());
        let webhooks = WebhookEndpoint::new("admin/apps/abc/webhooks", client);
        let created = webhooks
            .create(&Webhook::new(
                WebhookType::Discord,
                "http://hook",
                vec![WebhookEvent::ReleasePublished],
            ))
            .await
            .unwrap();

        assert_eq!(created.created_at, Some(5));
        mock.assert_async().await;
    }
}
