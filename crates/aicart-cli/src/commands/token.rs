//! Token commands.
//!
//! `aicart token verify` - Check a session token's signature and expiry.

use aicart_token::keys::{load_public_key_file, load_public_key_hex};
use aicart_token::{PublicKey, SessionClaims, TokenVerifier};
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Resolve a public key from either a file path or a hex-encoded string.
fn resolve_public_key(key: &str) -> anyhow::Result<PublicKey> {
    let path = Path::new(key);
    if path.exists() {
        return load_public_key_file(path)
            .with_context(|| format!("Failed to load public key from file: {}", path.display()));
    }
    load_public_key_hex(key.trim())
        .context("Failed to parse public key. Expected hex-encoded Ed25519 public key")
}

/// Verify `token` (or a file containing it) and return its claims.
pub fn check(public_key: &str, token: &str) -> anyhow::Result<SessionClaims> {
    let verifier = TokenVerifier::new(resolve_public_key(public_key)?);

    let token_str = if Path::new(token).exists() {
        fs::read_to_string(token)?.trim().to_string()
    } else {
        token.trim().to_string()
    };

    verifier
        .verify(&token_str)
        .context("Token verification failed")
}

pub fn verify(public_key: &str, token: &str) -> anyhow::Result<()> {
    let claims = check(public_key, token)?;

    println!("✔ Token is valid");
    println!();
    println!("Session Details:");
    println!("  Subject:   {}", claims.subject);
    println!("  Role:      {}", claims.role);
    println!("  Issued at: {}", claims.issued_at.to_rfc3339());
    println!("  Expires:   {}", claims.expires_at.to_rfc3339());

    Ok(())
}
