//
//  build-center-cli
//  api/resources/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Object Model
//!
//! Typed records for the Build Center resources and the [`Bound`] wrapper
//! that pairs a record with the transport it came from.
//!
//! A record on its own (e.g. [`App`]) is *unattached*: it is what you build
//! locally and send in a create or update request. Every server response is
//! turned into a [`Bound`] value in one step, so there is no
//! partially-initialized state in between. Bound values expose the record's
//! fields through `Deref`, keep the raw response text, and lazily build
//! endpoints for their nested collections:
//!
//! | Parent | Child collection | URL |
//! |--------|------------------|-----|
//! | App | releases | `<app url>/releases` |
//! | App | webhooks | `<app url>/webhooks` |
//! | App | tokens | `<app url>/tokens` |
//! | Release | assets | `<release url>/assets` |
//!
//! ## Submodules
//!
//! - [`app`]: apps and their nested collections
//! - [`release`]: releases and their assets
//! - [`asset`]: binary assets, tags and downloads
//! - [`webhook`]: webhook subscriptions
//! - [`access_token`]: access tokens and access flags

pub mod access_token;
pub mod app;
pub mod asset;
pub mod release;
pub mod webhook;

pub use access_token::*;
pub use app::*;
pub use asset::*;
pub use release::*;
pub use webhook::*;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::client::ApiClient;
use super::common::{ApiError, WireResponse};
use super::encoding;

/// A record type the server owns.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Per-instance cache of lazily built child endpoints
    type Children: Default + Send + Sync;

    /// Human-readable resource name used in error messages
    const KIND: &'static str;

    /// Server-assigned identifier, absent before creation
    fn id(&self) -> Option<&str>;

    /// Server-assigned canonical URL, absent before creation. An empty URL
    /// counts as absent.
    fn resource_url(&self) -> Option<&str>;
}

/// A resource record rehydrated from a server response.
///
/// Holds the record, the transport it was fetched with and the raw
/// response text (re-indented). Built only through [`Bound::bind`] or the
/// rehydration helpers, never mutated afterwards.
pub struct Bound<R: Resource> {
    record: R,
    client: Arc<ApiClient>,
    raw: String,
    children: R::Children,
}

impl<R: Resource> Bound<R> {
    /// Pairs a decoded record with its transport and raw text.
    pub fn bind(record: R, client: Arc<ApiClient>, raw: String) -> Self {
        Self {
            record,
            client,
            raw,
            children: R::Children::default(),
        }
    }

    /// Decodes a single-object response into a bound resource.
    ///
    /// # Errors
    ///
    /// [`ApiError::MalformedResponse`] if a required field is missing.
    pub fn rehydrate(client: &Arc<ApiClient>, response: WireResponse) -> Result<Self, ApiError> {
        let record = encoding::from_wire(response.body)?;
        let raw = encoding::reformat(&response.raw)?;
        Ok(Self::bind(record, Arc::clone(client), raw))
    }

    /// Decodes an array response into bound resources, keeping the server's order.
    ///
    /// Each resource's raw text is the matching element of the raw array.
    pub fn rehydrate_list(
        client: &Arc<ApiClient>,
        response: WireResponse,
    ) -> Result<Vec<Self>, ApiError> {
        let Value::Array(items) = response.body else {
            return Err(ApiError::MalformedResponse(format!(
                "expected a list of {}s",
                R::KIND
            )));
        };
        let raw_items: Vec<Value> = serde_json::from_str(&response.raw)
            .map_err(|e| ApiError::MalformedResponse(format!("invalid JSON: {e}")))?;
        if raw_items.len() != items.len() {
            return Err(ApiError::MalformedResponse(
                "raw text does not match the decoded list".to_string(),
            ));
        }

        items
            .into_iter()
            .zip(raw_items)
            .map(|(item, raw)| {
                let record = encoding::from_wire(item)?;
                let raw = serde_json::to_string_pretty(&raw)
                    .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
                Ok(Self::bind(record, Arc::clone(client), raw))
            })
            .collect()
    }

    /// The decoded record.
    pub fn record(&self) -> &R {
        &self.record
    }

    /// Consumes the bound value and returns the record.
    pub fn into_record(self) -> R {
        self.record
    }

    /// The response text this resource was decoded from, 2-space indented.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The transport this resource was fetched with.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// The canonical URL, required to reach nested collections.
    ///
    /// # Errors
    ///
    /// [`ApiError::MalformedResponse`] if the server did not send one.
    pub fn require_url(&self) -> Result<&str, ApiError> {
        self.record.resource_url().ok_or_else(|| {
            ApiError::MalformedResponse(format!("{} response carries no url", R::KIND))
        })
    }
}

impl<R: Resource> Deref for Bound<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.record
    }
}

impl<R: Resource> Serialize for Bound<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

impl<R: Resource + fmt::Debug> fmt::Debug for Bound<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("record", &self.record)
            .field("base_url", &self.client.base_url())
            .finish()
    }
}
