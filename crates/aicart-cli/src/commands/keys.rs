//! Key management commands.
//!
//! `aicart keys generate` - Generate a new token signing keypair.

use aicart_token::KeyPair;
use std::fs;
use std::path::PathBuf;

/// Generate a new Ed25519 keypair for signing session tokens.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let keypair = KeyPair::generate()?;

    if let Some(output_dir) = output {
        fs::create_dir_all(&output_dir)?;

        let private_path = output_dir.join("private.key");
        let public_path = output_dir.join("public.key");
        keypair.save_to_files(&private_path, &public_path)?;

        println!("✔ Generated token signing keypair:");
        println!("  Private key: {}", private_path.display());
        println!("  Public key:  {}", public_path.display());
        println!();
        println!("⚠️  Keep your private key secure! Never commit it to version control.");
        println!("    Replacing it invalidates every session issued with the old key.");
        println!();
        println!("Point the server at it with either:");
        println!("  export AICART_TOKEN_KEY=$(cat {})", private_path.display());
        println!("  token.private_key_file: {}", private_path.display());
    } else {
        println!("Private key (keep secure!):");
        println!("{}", keypair.private_key_hex());
        println!();
        println!("Public key:");
        println!("{}", keypair.public_key_hex());
        println!();
        println!("Use --output <dir> to save keys to files.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_keys_to_files() {
        let dir = tempdir().unwrap();
        generate(Some(dir.path().to_path_buf())).unwrap();

        let private_hex = fs::read_to_string(dir.path().join("private.key")).unwrap();
        let public_hex = fs::read_to_string(dir.path().join("public.key")).unwrap();

        // 32-byte keys
        assert_eq!(private_hex.len(), 64);
        assert_eq!(public_hex.len(), 64);

        let loaded = KeyPair::load_from_file(&dir.path().join("private.key")).unwrap();
        assert_eq!(loaded.public_key_hex(), public_hex);
    }

    #[test]
    fn test_generate_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("keys").join("prod");
        generate(Some(nested.clone())).unwrap();
        assert!(nested.join("private.key").exists());
    }
}
