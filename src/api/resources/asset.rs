//
//  build-center-cli
//  api/resources/asset.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Assets
//!
//! Binary files attached to a release. Assets are created by uploading a
//! file (there is no JSON create), carry optional `key` or `key=value` tags,
//! and can be streamed back with [`Bound::download`].

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::io::{AsyncRead, AsyncWrite};

use super::{Bound, Resource};
use crate::api::client::join_url;
use crate::api::common::ApiError;
use crate::api::endpoints::{CreateWithFile, Delete, Get, List, ResourceEndpoint};

/// Asset tags: keys with an optional value, kept in insertion order.
///
/// Travels as a JSON object. Inserting an existing key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<(String, Option<String>)>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: Option<String>) {
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.0.iter().map(|(key, value)| (key, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Option<String>)> for Tags {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        let mut tags = Self::new();
        for (key, value) in iter {
            tags.insert(key, value);
        }
        tags
    }
}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagsVisitor;

        impl<'de> Visitor<'de> for TagsVisitor {
            type Value = Tags;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of tag names to optional values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Tags, A::Error> {
                let mut tags = Tags::new();
                while let Some((key, value)) = access.next_entry::<String, Option<String>>()? {
                    tags.insert(key, value);
                }
                Ok(tags)
            }
        }

        deserializer.deserialize_map(TagsVisitor)
    }
}

/// Algorithm used for [`Asset::content_hash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "sha256")]
    Sha256,
}

/// A binary file attached to a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// File name
    pub name: String,

    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Size in bytes
    #[serde(default)]
    pub content_size: Option<u64>,
    #[serde(default)]
    pub content_hash_algorithm: Option<HashAlgorithm>,
    /// Hex digest of the contents
    #[serde(default)]
    pub content_hash: Option<String>,
    #[serde(default)]
    pub tags: Option<Tags>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Resource for Asset {
    type Children = ();

    const KIND: &'static str = "asset";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn resource_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Encodes tags as the `tag` form values the server expects.
///
/// A tag with a value becomes `key=value`, a bare tag just `key`.
///
/// ```rust
/// use build_center_cli::api::{encode_tags, Tags};
///
/// let mut tags = Tags::new();
/// tags.insert("arch".into(), Some("x86_64".into()));
/// tags.insert("os".into(), None);
/// assert_eq!(encode_tags(&tags), ["arch=x86_64", "os"]);
/// ```
pub fn encode_tags(tags: &Tags) -> Vec<String> {
    tags.iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{key}={value}"),
            None => key.clone(),
        })
        .collect()
}

/// Parses a `key=value` or bare `key` tag argument.
pub fn parse_tag(line: &str) -> (String, Option<String>) {
    match line.split_once('=') {
        Some((key, value)) => (key.to_string(), Some(value.to_string())),
        None => (line.to_string(), None),
    }
}

/// Endpoint for asset collections.
pub type AssetEndpoint = ResourceEndpoint<Asset>;

impl CreateWithFile for AssetEndpoint {}
impl Get for AssetEndpoint {}
impl List for AssetEndpoint {}
impl Delete for AssetEndpoint {}

impl AssetEndpoint {
    /// Uploads `source` as a new asset called `name`, sending each tag as a
    /// `tag` form field.
    pub async fn upload(
        &self,
        name: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
        tags: Option<&Tags>,
    ) -> Result<Bound<Asset>, ApiError> {
        let fields = tags
            .map(encode_tags)
            .unwrap_or_default()
            .into_iter()
            .map(|tag| ("tag".to_string(), tag))
            .collect();
        self.create_with_file(name, source, fields).await
    }
}

impl Bound<Asset> {
    /// Streams the asset contents from `<url>/download` into `sink`.
    ///
    /// The body is written in order, one chunk at a time, without being
    /// buffered whole.
    ///
    /// # Errors
    ///
    /// [`ApiError::ContentTypeMismatch`] if the server does not answer with
    /// `application/octet-stream`, [`ApiError::Io`] if writing fails.
    pub async fn download<W>(&self, sink: &mut W) -> Result<(), ApiError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let url = join_url(self.require_url()?, "download");
        self.client.download(&url, sink).await
    }
}
