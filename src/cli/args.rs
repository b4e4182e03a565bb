//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Mirror Google Fonts stylesheets and font files onto local static storage
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: fontmirror.toml)
    #[arg(short = 'C', long, default_value = "fontmirror.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Parent of the font destination directory (overrides `fonts.dir`)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// URL base written into mirrored stylesheets (overrides `fonts.url`)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Mirror every configured family that is not mirrored yet
    #[command(visible_alias = "m")]
    Mirror {
        /// User-Agent sent to the CSS API (overrides `http.user_agent`)
        #[arg(short = 'A', long)]
        user_agent: Option<String>,

        /// Request timeout in seconds (overrides `http.timeout`)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Print the mirrored stylesheet of a family
    #[command(visible_alias = "c")]
    Css {
        /// Family name exactly as configured (e.g. "Open Sans")
        family: String,
    },

    /// Show which configured families are mirrored
    #[command(visible_alias = "s")]
    Status,
}

#[allow(unused)]
impl Cli {
    pub const fn is_mirror(&self) -> bool {
        matches!(self.command, Commands::Mirror { .. })
    }
    pub const fn is_css(&self) -> bool {
        matches!(self.command, Commands::Css { .. })
    }
    pub const fn is_status(&self) -> bool {
        matches!(self.command, Commands::Status)
    }
}
