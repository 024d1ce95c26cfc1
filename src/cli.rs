//! Command-line interface for mdplay.

use clap::Parser;
use mdplay_core::{PlaygroundError, Position, Result};
use std::path::PathBuf;

/// mdplay - Markdown playground: tokenize a document and run its code blocks.
///
/// Lists the markdown elements of a document, or executes one of its fenced
/// code blocks with an external interpreter.
#[derive(Parser, Debug)]
#[command(
    name = "mdplay",
    author = "mdplay Contributors",
    version,
    about = "Tokenize markdown and run its code blocks",
    after_help = "Examples:\n  \
                  mdplay notes.md\n  \
                  mdplay --blocks notes.md\n  \
                  mdplay --run 0 notes.md\n  \
                  mdplay --at-line 12:1 --interpreter 'python3 -' notes.md\n  \
                  cat notes.md | mdplay --at 240"
)]
pub struct Cli {
    /// Markdown file to read (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// List the markdown elements (default)
    #[arg(long = "elements", conflicts_with = "blocks")]
    pub elements: bool,

    /// List the fenced code blocks with their index
    #[arg(long = "blocks")]
    pub blocks: bool,

    /// Run the code block with this index (0-based, as listed by --blocks)
    #[arg(short = 'r', long = "run", value_name = "INDEX", conflicts_with_all = ["at", "at_line"])]
    pub run: Option<usize>,

    /// Run the code block enclosing this char offset
    #[arg(long = "at", value_name = "OFFSET", conflicts_with = "at_line")]
    pub at: Option<usize>,

    /// Run the code block enclosing this 1-based line:column
    #[arg(long = "at-line", value_name = "LINE:COL", value_parser = parse_position)]
    pub at_line: Option<Position>,

    /// Use a custom config file or inline TOML
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Interpreter command reading a program from stdin (e.g. "python3 -")
    #[arg(short = 'i', long = "interpreter", value_name = "CMD")]
    pub interpreter: Option<String>,

    /// Kill the program after this many seconds (0 disables)
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Send code as written, without printing the last expression
    #[arg(long = "no-auto-print")]
    pub no_auto_print: bool,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "loglevel", default_value = "warn")]
    pub log_level: String,

    /// Show configuration paths and exit
    #[arg(long = "paths")]
    pub show_paths: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Elements,
    Blocks,
    Run(Target),
}

/// How the code block to run is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Index(usize),
    Offset(usize),
    Position(Position),
}

impl Cli {
    /// The requested action; listing elements when nothing else is asked.
    pub fn action(&self) -> Action {
        if let Some(index) = self.run {
            Action::Run(Target::Index(index))
        } else if let Some(offset) = self.at {
            Action::Run(Target::Offset(offset))
        } else if let Some(position) = self.at_line {
            Action::Run(Target::Position(position))
        } else if self.blocks {
            Action::Blocks
        } else {
            Action::Elements
        }
    }

    /// Split `--interpreter` into program and arguments.
    pub fn interpreter_command(&self) -> Result<Option<(String, Vec<String>)>> {
        let Some(command) = &self.interpreter else {
            return Ok(None);
        };
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| PlaygroundError::Cli("empty interpreter command".to_string()))?;
        Ok(Some((program, parts.collect())))
    }
}

/// Parse `LINE:COL` into a 1-based position.
fn parse_position(value: &str) -> std::result::Result<Position, String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got `{}`", value))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|e| format!("invalid line `{}`: {}", line, e))?;
    let column: usize = column
        .trim()
        .parse()
        .map_err(|e| format!("invalid column `{}`: {}", column, e))?;
    if line == 0 || column == 0 {
        return Err("line and column start at 1".to_string());
    }
    Ok(Position::new(line, column))
}

/// Show paths information.
pub fn show_paths() {
    use mdplay_config::Config;

    let config_path = Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());

    println!("paths:");
    println!("  config                {}", config_path);
}
