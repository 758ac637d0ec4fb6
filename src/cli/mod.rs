// CLI module for medcot
// Author: kelexine (https://github.com/kelexine)

use crate::providers::ProviderKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// medcot - Medical image chain-of-thought demo backed by hosted vision models
#[derive(Parser, Debug)]
#[command(name = "medcot", version, about, long_about = None)]
pub struct Args {
    /// Config file to read instead of ~/.medcot/config.toml
    #[arg(long, global = true, env = "MEDCOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize an image, send it to a provider and print the result
    Diagnose {
        /// Image file to upload
        image: PathBuf,

        /// Backend to ask
        #[arg(short, long, value_enum, default_value_t = ProviderKind::default())]
        provider: ProviderKind,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also write the normalized JPEG to this path
        #[arg(long)]
        save_normalized: Option<PathBuf>,
    },

    /// Serve the diagnose workflow over HTTP
    Serve {
        /// Bind address (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnose_defaults() {
        let args = Args::try_parse_from(["medcot", "diagnose", "scan.png"]).unwrap();
        match args.command {
            Command::Diagnose {
                image,
                provider,
                format,
                save_normalized,
            } => {
                assert_eq!(image, PathBuf::from("scan.png"));
                assert_eq!(provider, ProviderKind::HuggingFace);
                assert_eq!(format, OutputFormat::Text);
                assert!(save_normalized.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_provider_alias() {
        let args =
            Args::try_parse_from(["medcot", "diagnose", "scan.png", "--provider", "gpt4o"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Diagnose {
                provider: ProviderKind::OpenAi,
                ..
            }
        ));
    }

    #[test]
    fn test_serve_overrides() {
        let args = Args::try_parse_from(["medcot", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Serve {
                host: None,
                port: Some(9000)
            }
        ));
    }
}
