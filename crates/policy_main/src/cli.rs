use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "policy-bot", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask every question in the test catalog and grade the answers.
    Validate(ValidateArgs),

    /// Serve the chat endpoint, answering through the Anthropic API.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["api", "url"])))]
pub struct ValidateArgs {
    /// Ask the Anthropic API directly. Requires ANTHROPIC_API_KEY.
    #[arg(long)]
    pub api: bool,

    /// Base URL of a deployed chat service, e.g. https://hr-bot.example.com
    #[arg(long)]
    pub url: Option<String>,

    /// Model identifier to use in API mode.
    #[arg(long)]
    pub model: Option<String>,

    /// JSON test catalog to use instead of the built-in one.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Where to write the JSON report.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Pause between questions in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

/// Where answers come from during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    Api,
    Url(String),
}

impl ValidateArgs {
    pub fn mode(&self) -> SourceMode {
        match &self.url {
            Some(url) => SourceMode::Url(url.clone()),
            None => SourceMode::Api,
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Model identifier to answer with.
    #[arg(long)]
    pub model: Option<String>,

    /// Port to listen on.
    #[arg(long, short)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    use super::*;

    fn validate(args: &[&str]) -> Result<ValidateArgs, clap::Error> {
        let argv = ["policy-bot", "validate"].iter().copied().chain(args.iter().copied());
        match Cli::try_parse_from(argv)?.command {
            Command::Validate(args) => Ok(args),
            Command::Serve(_) => panic!("Expected validate command"),
        }
    }

    #[test]
    fn test_api_mode() {
        let actual = validate(&["--api", "--model", "claude-haiku"]).unwrap();

        assert_eq!(actual.mode(), SourceMode::Api);
        assert_eq!(actual.model.as_deref(), Some("claude-haiku"));
    }

    #[test]
    fn test_url_mode() {
        let actual = validate(&["--url", "https://hr.example.com", "-o", "out.json"]).unwrap();

        assert_eq!(actual.mode(), SourceMode::Url("https://hr.example.com".to_string()));
        assert_eq!(actual.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_source_mode_is_required() {
        let actual = validate(&[]).unwrap_err();
        assert_eq!(actual.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_source_modes_are_exclusive() {
        let actual = validate(&["--api", "--url", "https://hr.example.com"]).unwrap_err();
        assert_eq!(actual.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_serve_port_override() {
        let actual = Cli::try_parse_from(["policy-bot", "serve", "--port", "9000"]).unwrap();

        match actual.command {
            Command::Serve(args) => assert_eq!(args.port, Some(9000)),
            Command::Validate(_) => panic!("Expected serve command"),
        }
    }
}
