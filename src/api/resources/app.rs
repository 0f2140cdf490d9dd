//
//  build-center-cli
//  api/resources/app.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Apps and their nested collections

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::{AccessTokenEndpoint, Bound, ReleaseEndpoint, Resource, WebhookEndpoint};
use crate::api::client::join_url;
use crate::api::common::ApiError;
use crate::api::endpoints::{Create, Delete, Get, List, ResourceEndpoint, Update};

/// An application whose releases are published through Build Center.
///
/// # Example
///
/// ```rust
/// use build_center_cli::api::App;
///
/// let app = App::new("myapp", "My App").with_description("Desktop client");
/// assert!(app.id.is_none());
/// assert!(!app.public);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    /// Unique short name
    pub name: String,
    /// Display title
    pub title: String,

    #[serde(default)]
    pub id: Option<String>,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether releases can be read without a token
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub url: Option<String>,
}

impl App {
    /// Creates an unattached app with the required fields.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            id: None,
            created_at: None,
            description: None,
            public: false,
            url: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the public flag.
    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

/// Lazily built endpoints for an app's nested collections.
#[derive(Default)]
pub struct AppChildren {
    releases: OnceCell<ReleaseEndpoint>,
    webhooks: OnceCell<WebhookEndpoint>,
    tokens: OnceCell<AccessTokenEndpoint>,
}

impl Resource for App {
    type Children = AppChildren;

    const KIND: &'static str = "app";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn resource_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Endpoint for app collections.
pub type AppEndpoint = ResourceEndpoint<App>;

impl Create for AppEndpoint {
    type CreateRequest = App;
}
impl Get for AppEndpoint {}
impl List for AppEndpoint {}
impl Update for AppEndpoint {
    type UpdateRequest = App;
}
impl Delete for AppEndpoint {}

impl Bound<App> {
    /// The app's releases, at `<url>/releases`.
    ///
    /// Built on first access and reused for the lifetime of this value.
    pub fn releases(&self) -> Result<&ReleaseEndpoint, ApiError> {
        self.children.releases.get_or_try_init(|| {
            Ok(ReleaseEndpoint::new(
                join_url(self.require_url()?, "releases"),
                self.client.clone(),
            ))
        })
    }

    /// The app's webhooks, at `<url>/webhooks`.
    pub fn webhooks(&self) -> Result<&WebhookEndpoint, ApiError> {
        self.children.webhooks.get_or_try_init(|| {
            Ok(WebhookEndpoint::new(
                join_url(self.require_url()?, "webhooks"),
                self.client.clone(),
            ))
        })
    }

    /// The app's access tokens, at `<url>/tokens`.
    pub fn tokens(&self) -> Result<&AccessTokenEndpoint, ApiError> {
        self.children.tokens.get_or_try_init(|| {
            Ok(AccessTokenEndpoint::new(
                join_url(self.require_url()?, "tokens"),
                self.client.clone(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints::Endpoint;
    use crate::api::ApiClient;
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::Arc;

    fn bound_app(url: Option<&str>) -> Bound<App> {
        let mut app = App::new("myapp", "My App");
        app.id = Some("abc".into());
        app.url = url.map(str::to_string);
        let client = Arc::new(ApiClient::new("http://localhost:5000").unwrap());
        Bound::bind(app, client, "{}".into())
    }

    #[test]
    fn test_releases_endpoint_is_nested_and_memoized() {
        let app = bound_app(Some("admin/apps/abc"));

        let first = app.releases().unwrap();
        assert_eq!(first.url(), "admin/apps/abc/releases");

        let second = app.releases().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_webhook_and_token_endpoints() {
        let app = bound_app(Some("admin/apps/abc/"));
        assert_eq!(app.webhooks().unwrap().url(), "admin/apps/abc/webhooks");
        assert_eq!(app.tokens().unwrap().url(), "admin/apps/abc/tokens");
    }

    #[test]
    fn test_children_require_url() {
        let app = bound_app(None);
        assert!(matches!(app.releases(), Err(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn test_children_reject_empty_url() {
        let app = bound_app(Some(""));
        assert!(matches!(app.releases(), Err(ApiError::MalformedResponse(_))));
        assert!(matches!(app.tokens(), Err(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn test_wire_round_trip() {
        let mut app = App::new("myapp", "My App").with_public(true);
        app.id = Some("abc".into());
        app.created_at = Some(1_700_000_000_000);
        app.url = Some("admin/apps/abc".into());

        let wire = crate::api::encoding::to_wire(&app).unwrap();
        assert_eq!(wire["createdAt"], json!(1_700_000_000_000i64));

        let decoded: App =
            crate::api::encoding::from_wire(crate::api::encoding::decamelize_keys(wire)).unwrap();
        assert_eq!(decoded, app);
    }

    #[tokio::test]
    async fn test_create_bad_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/apps")
            .match_body(Matcher::PartialJson(json!({"name": "myapp", "title": "My App"})))
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"name already taken"}}"#)
            .create_async()
            .await;

        let client = Arc::new(ApiClient::new(server.url()).unwrap());
        let apps = AppEndpoint::new("admin/apps", client);
        let result = apps.create(&App::new("myapp", "My App")).await;

        assert!(matches!(result, Err(ApiError::BadRequest(m)) if m == "name already taken"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_targets_own_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/admin/apps/abc")
            .match_body(Matcher::PartialJson(json!({"title": "Renamed"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"abc","name":"myapp","title":"Renamed","url":"admin/apps/abc"}"#)
            .create_async()
            .await;

        let client = Arc::new(ApiClient::new(server.url()).unwrap());
        let apps = AppEndpoint::new("admin/apps", client);

        let mut request = App::new("myapp", "Renamed");
        request.url = Some("admin/apps/abc".into());
        let updated = apps.update(&request).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_falls_back_to_endpoint_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/admin/apps")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"abc","name":"myapp","title":"T"}"#)
            .create_async()
            .await;

        let client = Arc::new(ApiClient::new(server.url()).unwrap());
        let apps = AppEndpoint::new("admin/apps", client);
        apps.update(&App::new("myapp", "T")).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_with_empty_url_uses_endpoint_url() {
        let mut server = mockito::Server::new_async().await;
        let root = server.mock("PUT", "/").expect(0).create_async().await;
        let mock = server
            .mock("PUT", "/admin/apps")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"abc","name":"myapp","title":"T"}"#)
            .create_async()
            .await;

        let client = Arc::new(ApiClient::new(server.url()).unwrap());
        let apps = AppEndpoint::new("admin/apps", client);
        let mut request = App::new("myapp", "T");
        request.url = Some(String::new());
        let updated = apps.update(&request).await.unwrap();

        assert_eq!(updated.id.as_deref(), Some("abc"));
        mock.assert_async().await;
        root.assert_async().await;
    }
}
