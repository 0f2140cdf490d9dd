//
//  build-center-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Build Center CLI Library
//!
//! A typed client for the Build Center admin REST API and the `bc`
//! command-line tool built on top of it.
//!
//! ## Overview
//!
//! Build Center stores apps, their versioned releases and the binary assets
//! attached to those releases. Access is controlled with bearer tokens and
//! app owners can subscribe webhooks to release events. This library
//! exposes each of those collections as an endpoint whose capabilities
//! (create, get, list, update, delete, upload) are expressed as traits.
//!
//! ## Module Structure
//!
//! - [`api`]: Transport, wire encoding, endpoint capabilities and resources
//! - [`cli`]: Command-line interface definitions using clap
//! - [`config`]: Configuration file and connection settings
//! - [`output`]: JSON output and status messages
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use build_center_cli::api::{Api, ApiClient, List};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = Api::new(ApiClient::new("http://localhost:5000")?.with_token("token"));
//! for app in api.apps.list().await? {
//!     println!("{} ({})", app.title, app.name);
//! }
//! # Ok(())
//! # }
//! ```

/// API client for the Build Center admin endpoints.
///
/// Handles authentication, content negotiation, status mapping and
/// camelCase/snake_case translation. Everything here returns
/// [`api::ApiError`].
pub mod api;

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// Configuration file management.
///
/// - Linux: `~/.config/build-center/config.toml`
/// - macOS: `~/Library/Application Support/build-center/config.toml`
/// - Windows: `%APPDATA%\build-center\config\config.toml`
pub mod config;

/// Output helpers for the command-line tool.
pub mod output;

pub use cli::Cli;
pub use config::Config;

/// Application version constant.
///
/// The current version of the CLI, automatically derived from Cargo.toml
/// at compile time using the `CARGO_PKG_VERSION` environment variable.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes allowing scripts to detect the outcome of an
/// operation.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource and response issues
/// - `32+`: Transport issues
///
/// # Example
///
/// ```rust
/// use build_center_cli::api::ApiError;
/// use build_center_cli::exit_codes;
///
/// let error = anyhow::Error::new(ApiError::NotFound("no such app".into()));
/// assert_eq!(exit_codes::for_error(&error), exit_codes::NOT_FOUND);
/// ```
pub mod exit_codes {
    use crate::api::ApiError;

    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// Returned by clap when arguments fail to parse.
    pub const USAGE: i32 = 2;

    /// Authentication required or failed.
    ///
    /// The token is missing, invalid, or lacks the required access.
    /// Set `BC_TOKEN` or run `bc setup` on a fresh server.
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found.
    pub const NOT_FOUND: i32 = 8;

    /// The server rejected the request fields.
    pub const BAD_REQUEST: i32 = 9;

    /// The response had the wrong type, could not be decoded, or carried an
    /// error message.
    pub const RESPONSE_ERROR: i32 = 10;

    /// The server could not be reached or answered with an unexpected status.
    pub const TRANSPORT: i32 = 32;

    /// Picks the exit code for an error returned by a command.
    pub fn for_error(error: &anyhow::Error) -> i32 {
        match error.downcast_ref::<ApiError>() {
            Some(ApiError::Unauthorized(_) | ApiError::Forbidden(_)) => AUTH_ERROR,
            Some(ApiError::NotFound(_)) => NOT_FOUND,
            Some(ApiError::BadRequest(_)) => BAD_REQUEST,
            Some(
                ApiError::ContentTypeMismatch { .. }
                | ApiError::MalformedResponse(_)
                | ApiError::ServerReported(_),
            ) => RESPONSE_ERROR,
            Some(ApiError::TransportFailure { .. } | ApiError::Network(_)) => TRANSPORT,
            Some(ApiError::Io(_)) | None => ERROR,
        }
    }

}
