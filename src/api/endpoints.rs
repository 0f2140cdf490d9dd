//
//  build-center-cli
//  api/endpoints.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Endpoint Capabilities
//!
//! Every Build Center collection (apps, releases, assets, webhooks, access
//! tokens) is served by the same [`ResourceEndpoint`] type: a base URL, a
//! shared [`ApiClient`] and a resource type tag. What an endpoint can do is
//! declared by implementing capability traits for it:
//!
//! | Capability | Request | Response |
//! |------------|---------|----------|
//! | [`Create`] | `POST <url>` with the encoded request | bound resource |
//! | [`CreateWithFile`] | multipart `POST <url>` | bound resource |
//! | [`Get`] | `GET <url>/<id>` | bound resource |
//! | [`List`] | `GET <url>` | bound resources, server order |
//! | [`Update`] | `PUT <request url or url>` | bound resource |
//! | [`Delete`] | `DELETE <url>/<id>` | nothing |
//!
//! All capability methods have default bodies, so opting in is a one-line
//! `impl`:
//!
//! ```rust,ignore
//! pub type AppEndpoint = ResourceEndpoint<App>;
//!
//! impl Get for AppEndpoint {}
//! impl Create for AppEndpoint {
//!     type CreateRequest = App;
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::client::{join_url, ApiClient, FileUpload};
use super::common::ApiError;
use super::resources::{Bound, Resource};

/// The state shared by every capability: where the collection lives and how
/// to reach it.
pub trait Endpoint: Send + Sync {
    /// The resource type this endpoint returns
    type Resource: Resource;

    /// The collection URL, relative to the server or absolute
    fn url(&self) -> &str;

    /// The transport used for every call
    fn client(&self) -> &Arc<ApiClient>;
}

/// A collection endpoint for resources of type `R`.
///
/// Carries no state besides its URL and transport. Which operations it
/// supports depends on the capability traits implemented for
/// `ResourceEndpoint<R>`.
pub struct ResourceEndpoint<R> {
    url: String,
    client: Arc<ApiClient>,
    resource: PhantomData<fn() -> R>,
}

impl<R> ResourceEndpoint<R> {
    /// Binds an endpoint to `url` on the shared `client`.
    pub fn new(url: impl Into<String>, client: Arc<ApiClient>) -> Self {
        Self {
            url: url.into(),
            client,
            resource: PhantomData,
        }
    }
}

impl<R> fmt::Debug for ResourceEndpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceEndpoint")
            .field("url", &self.url)
            .field("resource", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: Resource> Endpoint for ResourceEndpoint<R> {
    type Resource = R;

    fn url(&self) -> &str {
        &self.url
    }

    fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}

/// Creates a resource from a JSON request.
#[async_trait]
pub trait Create: Endpoint {
    /// The request shape sent to the server
    type CreateRequest: Serialize + Send + Sync;

    /// POSTs `request` to the collection URL.
    ///
    /// # Errors
    ///
    /// [`ApiError::BadRequest`] if the server rejects the fields. No resource
    /// is returned on failure.
    async fn create(
        &self,
        request: &Self::CreateRequest,
    ) -> Result<Bound<Self::Resource>, ApiError> {
        let response = self.client().post(self.url(), request).await?;
        Bound::rehydrate(self.client(), response)
    }
}

/// Creates a resource by uploading a file.
#[async_trait]
pub trait CreateWithFile: Endpoint {
    /// Reads `source` to the end and POSTs it as multipart.
    ///
    /// The bytes travel in the `file` part under `name`; `fields` become plain
    /// form fields, repeated keys included.
    ///
    /// # Errors
    ///
    /// [`ApiError::Io`] if reading `source` fails, [`ApiError::BadRequest`] if
    /// the server rejects the upload.
    async fn create_with_file(
        &self,
        name: &str,
        source: &mut (dyn AsyncRead + Unpin + Send),
        fields: Vec<(String, String)>,
    ) -> Result<Bound<Self::Resource>, ApiError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes).await?;

        let upload = FileUpload {
            file_name: name.to_string(),
            bytes,
            fields,
        };
        let response = self.client().post_with_file(self.url(), upload).await?;
        Bound::rehydrate(self.client(), response)
    }
}

/// Fetches a single resource by identifier.
#[async_trait]
pub trait Get: Endpoint {
    /// GETs `<url>/<id>`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] if no resource has this identifier.
    async fn get(&self, id: &str) -> Result<Bound<Self::Resource>, ApiError> {
        let response = self.client().get(&join_url(self.url(), id)).await?;
        Bound::rehydrate(self.client(), response)
    }
}

/// Lists every resource of the collection.
#[async_trait]
pub trait List: Endpoint {
    /// GETs the collection URL. The server's order is preserved.
    async fn list(&self) -> Result<Vec<Bound<Self::Resource>>, ApiError> {
        let response = self.client().get(self.url()).await?;
        Bound::rehydrate_list(self.client(), response)
    }
}

/// Replaces a resource's state.
#[async_trait]
pub trait Update: Endpoint {
    /// The request shape; its own `url`, when present, is the update target
    type UpdateRequest: Resource;

    /// PUTs `request` to its own URL, or to the collection URL when it has none.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] or [`ApiError::BadRequest`] as reported by the server.
    async fn update(
        &self,
        request: &Self::UpdateRequest,
    ) -> Result<Bound<Self::Resource>, ApiError> {
        let url = request.resource_url().unwrap_or(self.url());
        let response = self.client().put(url, request).await?;
        Bound::rehydrate(self.client(), response)
    }
}

/// Deletes a resource by identifier.
#[async_trait]
pub trait Delete: Endpoint {
    /// DELETEs `<url>/<id>`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] if no resource has this identifier.
    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client().delete(&join_url(self.url(), id)).await
    }
}
