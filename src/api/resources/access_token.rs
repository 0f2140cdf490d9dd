//
//  build-center-cli
//  api/resources/access_token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Access Tokens
//!
//! Bearer tokens for the Build Center API, either global or scoped to an
//! app. What a token may do is an [`AccessFlags`] bit set, sent on the wire
//! as a plain integer.
//!
//! The secret `value` is only returned once, in the response to the create
//! call.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::api::endpoints::{Create, Delete, Get, List, ResourceEndpoint};

/// Bit flags describing what a token may do.
///
/// | Flag | Bit |
/// |------|-----|
/// | `NONE` | 0 |
/// | `ADMIN` | 1 |
/// | `READ` | 2 |
/// | `WRITE` | 4 |
///
/// ```rust
/// use build_center_cli::api::AccessFlags;
///
/// let access = AccessFlags::ADMIN | AccessFlags::READ | AccessFlags::WRITE;
/// assert_eq!(access.bits(), 7);
/// assert!(access.contains(AccessFlags::READ));
/// assert_eq!("read|write".parse::<AccessFlags>().unwrap().bits(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessFlags(u8);

impl AccessFlags {
    pub const NONE: Self = Self(0);
    pub const ADMIN: Self = Self(1);
    pub const READ: Self = Self(2);
    pub const WRITE: Self = Self(4);

    const NAMED: [(&'static str, Self); 3] = [
        ("admin", Self::ADMIN),
        ("read", Self::READ),
        ("write", Self::WRITE),
    ];

    /// Builds flags from their integer value. Unknown bits are kept.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The integer value sent on the wire.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AccessFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AccessFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Accepts an integer (`7`) or `|`-separated names (`admin|read|write`, `none`).
impl FromStr for AccessFlags {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(bits) = s.trim().parse::<u8>() {
            return Ok(Self(bits));
        }

        s.split('|')
            .map(str::trim)
            .try_fold(Self::NONE, |flags, name| {
                if name.eq_ignore_ascii_case("none") {
                    return Ok(flags);
                }
                Self::NAMED
                    .iter()
                    .find(|(flag_name, _)| name.eq_ignore_ascii_case(flag_name))
                    .map(|(_, flag)| flags | *flag)
                    .ok_or_else(|| {
                        format!("unknown access flag '{name}' (expected: admin, read, write, none or a number)")
                    })
            })
    }
}

impl fmt::Display for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

/// An access token as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub enabled: bool,
    pub access: AccessFlags,

    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// The secret, present only in the create response
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Expiry time, epoch milliseconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Owning app, absent for global tokens
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Resource for AccessToken {
    type Children = ();

    const KIND: &'static str = "access token";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn resource_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Request shape for creating an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccessTokenCommand {
    pub enabled: bool,
    pub access: AccessFlags,

    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Lifetime of the token
    #[serde(default)]
    pub validity_duration: Option<u64>,
}

impl CreateAccessTokenCommand {
    /// Creates a request with the required fields.
    pub fn new(access: AccessFlags, enabled: bool) -> Self {
        Self {
            enabled,
            access,
            app_id: None,
            description: None,
            validity_duration: None,
        }
    }
}

/// Endpoint for access token collections.
pub type AccessTokenEndpoint = ResourceEndpoint<AccessToken>;

impl Create for AccessTokenEndpoint {
    type CreateRequest = CreateAccessTokenCommand;
}
impl Get for AccessTokenEndpoint {}
impl List for AccessTokenEndpoint {}
impl Delete for AccessTokenEndpoint {}
