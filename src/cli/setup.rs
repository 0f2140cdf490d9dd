//
//  build-center-cli
//  cli/setup.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Initial Token Bootstrap
//!
//! A fresh server has no tokens, so the API cannot be used to create the
//! first one. `bc setup` generates a random token locally and prints the
//! SQL statement that stores its digest, with full admin access, under the
//! id `initial`.

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use clap::Args;
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::GlobalOptions;

/// Number of random bytes in a generated token.
pub const TOKEN_BYTES: usize = 64;

/// Identifier the bootstrap token is stored under.
pub const INITIAL_TOKEN_ID: &str = "initial";

#[derive(Args, Debug)]
pub struct SetupCommand {}

/// A freshly generated token and what the server stores for it.
#[derive(Debug, Clone)]
pub struct BootstrapToken {
    /// The secret, base64
    pub value: String,
    /// Hex SHA-256 digest of the raw bytes
    pub digest_hex: String,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl BootstrapToken {
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self::from_bytes(&bytes, Utc::now().timestamp_millis())
    }

    fn from_bytes(bytes: &[u8], created_at: i64) -> Self {
        let digest_hex = Sha256::digest(bytes)
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect();

        Self {
            value: STANDARD.encode(bytes),
            digest_hex,
            created_at,
        }
    }

    /// The statement inserting this token with access 7 (admin, read, write).
    pub fn sql(&self) -> String {
        format!(
            "insert into access_token (uuid, value_digest, created_at, enabled, access) values (\n    \
             '{INITIAL_TOKEN_ID}', unhex('{}'),\n    {}, 1, 7);",
            self.digest_hex, self.created_at
        )
    }

    pub fn instructions(&self) -> String {
        let sql = self
            .sql()
            .lines()
            .map(|line| format!("    {line}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Following the instructions below will create your first access token in order to use the Build Center API.\n\n\
             Executing the following SQL statement in your Build Center database will save the access token with full admin privileges.\n\n\
             {sql}\n\n\
             This is your access token:\n\n    \
             {}\n\n\
             You can use this token with the Build Center CLI tool by setting the BC_TOKEN environment variable.\n",
            self.value
        )
    }
}

impl SetupCommand {
    pub async fn run(&self, _global: &GlobalOptions) -> Result<()> {
        let token = BootstrapToken::generate();
        print!("{}", token.instructions());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        let token = BootstrapToken::from_bytes(b"abc", 1_700_000_000_000);
        assert_eq!(
            token.digest_hex,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(token.value, "YWJj");
    }

    #[test]
    fn test_sql_statement() {
        let token = BootstrapToken::from_bytes(b"abc", 1_700_000_000_000);
        let sql = token.sql();
        assert!(sql.starts_with("insert into access_token (uuid, value_digest, created_at, enabled, access) values ("));
        assert!(sql.contains("'initial', unhex('ba7816bf"));
        assert!(sql.ends_with("1700000000000, 1, 7);"));
    }

    #[test]
    fn test_generated_token_shape() {
        let token = BootstrapToken::generate();
        assert_eq!(token.digest_hex.len(), 64);
        assert_eq!(STANDARD.decode(&token.value).unwrap().len(), TOKEN_BYTES);
        assert!(token.created_at > 0);
        assert!(token.instructions().contains(&token.value));
        assert!(token.instructions().contains("BC_TOKEN"));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(BootstrapToken::generate().value, BootstrapToken::generate().value);
    }
}
