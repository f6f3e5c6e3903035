//! `aicart password hash` - Produce a stored-password digest.
//!
//! Used to seed admin accounts directly in the database. The plaintext is
//! read from stdin so it never shows up in shell history.

use aicart_access::PasswordVerifier;
use std::io::BufRead;

/// Read one line from `input` and hash it with the production work factor.
pub fn hash_from(input: impl BufRead, verifier: &PasswordVerifier) -> anyhow::Result<String> {
    let line = input
        .lines()
        .next()
        .transpose()?
        .unwrap_or_default();
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("No password provided on stdin");
    }
    Ok(verifier.hash_blocking(password)?)
}

pub fn hash() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let digest = hash_from(stdin.lock(), &PasswordVerifier::new())?;
    println!("{digest}");
    Ok(())
}
