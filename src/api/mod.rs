//
//  build-center-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides a typed client for the Build Center REST API.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`client`]: The HTTP transport (authentication, content negotiation, status mapping)
//! - [`encoding`]: Conversion between typed values and camelCase wire mappings
//! - [`endpoints`]: Composable capabilities (create, get, list, update, delete, upload)
//! - [`resources`]: Typed records and bound resources with nested collections
//! - [`common`]: Shared error and response types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use build_center_cli::api::{Api, ApiClient, App, Create, Get, List};
//!
//! # async fn example() -> Result<(), build_center_cli::api::ApiError> {
//! let api = Api::new(ApiClient::new("http://localhost:5000")?.with_token("token"));
//!
//! let app = api.apps.create(&App::new("myapp", "My App")).await?;
//! for release in app.releases()?.list().await? {
//!     println!("{} {}", app.name, release.version);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiError`]; see its documentation for the
//! mapping of HTTP statuses to variants.

/// The HTTP transport.
///
/// Provides the [`ApiClient`] struct which handles:
/// - URL resolution against the configured server
/// - Bearer token injection and proxy routing
/// - Content type negotiation and status code mapping
/// - Streaming downloads
pub mod client;

/// Shared error and response types.
pub mod common;

/// Wire encoding: field name case conversion and private field stripping.
pub mod encoding;

/// Endpoint capability traits and the generic collection endpoint.
pub mod endpoints;

/// Resource records (apps, releases, assets, webhooks, tokens).
pub mod resources;

use std::sync::Arc;

pub use client::ApiClient;
pub use common::{ApiError, WireResponse};
pub use endpoints::{Create, CreateWithFile, Delete, Endpoint, Get, List, ResourceEndpoint, Update};
pub use resources::*;

/// Collection path of the admin apps endpoint.
pub const APPS_PATH: &str = "admin/apps";
/// Collection path of the admin releases endpoint.
pub const RELEASES_PATH: &str = "admin/releases";
/// Collection path of the admin assets endpoint.
pub const ASSETS_PATH: &str = "admin/assets";
/// Collection path of the admin access tokens endpoint.
pub const ACCESS_TOKENS_PATH: &str = "admin/access-tokens";
/// Collection path of the admin webhooks endpoint.
pub const WEBHOOKS_PATH: &str = "admin/webhooks";

/// The top-level admin endpoints, all sharing one transport.
///
/// This is the entry point for the command-line tool and for any other
/// consumer of the API.
#[derive(Debug)]
pub struct Api {
    pub apps: AppEndpoint,
    pub releases: ReleaseEndpoint,
    pub assets: AssetEndpoint,
    pub access_tokens: AccessTokenEndpoint,
    pub webhooks: WebhookEndpoint,
    client: Arc<ApiClient>,
}

impl Api {
    /// Binds the admin endpoints to `client`.
    pub fn new(client: ApiClient) -> Self {
        Self::from_shared(Arc::new(client))
    }

    /// Binds the admin endpoints to an already shared client.
    pub fn from_shared(client: Arc<ApiClient>) -> Self {
        Self {
            apps: AppEndpoint::new(APPS_PATH, Arc::clone(&client)),
            releases: ReleaseEndpoint::new(RELEASES_PATH, Arc::clone(&client)),
            assets: AssetEndpoint::new(ASSETS_PATH, Arc::clone(&client)),
            access_tokens: AccessTokenEndpoint::new(ACCESS_TOKENS_PATH, Arc::clone(&client)),
            webhooks: WebhookEndpoint::new(WEBHOOKS_PATH, Arc::clone(&client)),
            client,
        }
    }

    /// The shared transport.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_paths() {
        let api = Api::new(ApiClient::new("http://localhost:5000").unwrap());
        assert_eq!(api.apps.url(), "admin/apps");
        assert_eq!(api.releases.url(), "admin/releases");
        assert_eq!(api.assets.url(), "admin/assets");
        assert_eq!(api.access_tokens.url(), "admin/access-tokens");
        assert_eq!(api.webhooks.url(), "admin/webhooks");
        assert!(Arc::ptr_eq(api.apps.client(), api.client()));
    }
}
