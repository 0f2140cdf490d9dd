//
//  build-center-cli
//  api/resources/release.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Releases and their assets

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::{AssetEndpoint, Bound, Resource};
use crate::api::client::join_url;
use crate::api::common::ApiError;
use crate::api::endpoints::{Create, Delete, Get, List, ResourceEndpoint, Update};

/// A versioned release of an app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    /// Version string, e.g. `1.0.0`
    pub version: String,

    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Source commit the release was built from
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
}

impl Release {
    /// Creates an unattached release for `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            id: None,
            created_at: None,
            title: None,
            description: None,
            commit: None,
            prerelease: false,
            published: false,
            url: None,
            app_id: None,
        }
    }
}

/// Lazily built endpoint for a release's assets.
#[derive(Default)]
pub struct ReleaseChildren {
    assets: OnceCell<AssetEndpoint>,
}

impl Resource for Release {
    type Children = ReleaseChildren;

    const KIND: &'static str = "release";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn resource_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Endpoint for release collections.
pub type ReleaseEndpoint = ResourceEndpoint<Release>;

impl Create for ReleaseEndpoint {
    type CreateRequest = Release;
}
impl Get for ReleaseEndpoint {}
impl List for ReleaseEndpoint {}
impl Update for ReleaseEndpoint {
    type UpdateRequest = Release;
}
impl Delete for ReleaseEndpoint {}

impl Bound<Release> {
    /// The release's assets, at `<url>/assets`. Built once per bound release.
    pub fn assets(&self) -> Result<&AssetEndpoint, ApiError> {
        self.children.assets.get_or_try_init(|| {
            Ok(AssetEndpoint::new(
                join_url(self.require_url()?, "assets"),
                self.client.clone(),
            ))
        })
    }
}
