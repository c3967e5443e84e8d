use std::path::PathBuf;

use clap::Parser;

/// pdfchat — upload a PDF to ChatPDF and chat about it from the terminal.
#[derive(Parser, Debug)]
#[command(name = "pdfchat", version, about)]
pub struct Args {
    /// PDF to select and analyze immediately.
    pub file: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Environment variable holding the API key (overrides `api.key_env`).
    #[arg(long)]
    pub key_env: Option<String>,

    /// Service base URL (overrides `api.base_url`).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_and_overrides() {
        let args = Args::parse_from([
            "pdfchat",
            "paper.pdf",
            "--key-env",
            "MY_KEY",
            "--base-url",
            "http://localhost:9000/v1",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("paper.pdf")));
        assert_eq!(args.key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:9000/v1"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }

    #[test]
    fn no_arguments_is_valid() {
        let args = Args::parse_from(["pdfchat"]);
        assert!(args.file.is_none());
        assert!(args.key_env.is_none());
    }
}
