use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the quill expression language", long_about = None)]
pub struct Args {
    /// Script to run; starts a REPL when omitted
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Evaluate SOURCE directly instead of reading a file
    #[arg(short = 'e', long = "eval", value_name = "SOURCE", conflicts_with = "file")]
    pub eval: Option<String>,

    /// Print the parsed program instead of evaluating it
    #[arg(long = "ast")]
    pub ast: bool,

    /// Print the token stream instead of evaluating
    #[arg(long = "tokens", conflicts_with = "ast")]
    pub tokens: bool,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}
