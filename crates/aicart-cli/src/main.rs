use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "aicart", version, about = "aicart access service")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Path to the YAML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Token signing key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Session token utilities
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Password digest utilities
    Password {
        #[command(subcommand)]
        cmd: PasswordCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new Ed25519 keypair
    Generate {
        /// Directory to write private.key and public.key into
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Verify a session token's signature and expiry
    Verify {
        /// Token string or path to a file containing it
        token: String,

        /// Public key as hex or path to a key file
        #[arg(long, short, env = "AICART_PUBLIC_KEY")]
        key: String,
    },
}

#[derive(Subcommand, Debug)]
enum PasswordCommand {
    /// Hash a password read from stdin
    Hash,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve { config } => commands::serve::run(config).await?,

        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => commands::keys::generate(output)?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Verify { token, key } => commands::token::verify(&key, &token)?,
        },

        Command::Password { cmd } => match cmd {
            PasswordCommand::Hash => commands::password::hash()?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_token_verify() {
        let cli =
            Cli::try_parse_from(["aicart", "token", "verify", "abc", "--key", "00ff"]).unwrap();
        match cli.cmd {
            Command::Token {
                cmd: TokenCommand::Verify { token, key },
            } => {
                assert_eq!(token, "abc");
                assert_eq!(key, "00ff");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
