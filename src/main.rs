//! mdplay - Markdown playground engine.
//!
//! This binary tokenizes a markdown document and lists its elements or
//! code blocks, or runs one code block with an external interpreter.

mod cli;

use clap::Parser as ClapParser;
use cli::{Action, Cli, Target};
use crossterm::style::Stylize;
use log::{debug, error, info, LevelFilter};
use mdplay_config::Config;
use mdplay_core::{ElementKind, LineIndex, PlaygroundError, Result};
use mdplay_parser::{code_block_at, CodeBlock, IncrementalParser, MarkdownElement, Tokenizer};
use mdplay_runner::{FnSink, OutputSink, Runner, NO_OUTPUT_NOTICE};
use std::io::{self, Read, Write};

fn main() {
    let cli = <Cli as ClapParser>::parse();

    // Handle --paths flag
    if cli.show_paths {
        cli::show_paths();
        return;
    }

    // Set up logging
    setup_logging(&cli.log_level);
    info!("mdplay v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Set up logging based on the log level argument.
fn setup_logging(level: &str) {
    let filter = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    };

    env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Main application logic. Returns the process exit code.
fn run(cli: &Cli) -> Result<i32> {
    let config = load_config(cli)?;
    debug!("Loaded config: {:?}", config);

    let text = read_input(cli)?;
    let color = atty::is(atty::Stream::Stdout);

    let tokenizer = Tokenizer::with_settings(config.features.links, config.features.highlights);
    let mut parser = IncrementalParser::with_tokenizer(tokenizer);
    let elements = parser.parse_if_needed(&text);
    info!("Found {} elements", elements.len());

    match cli.action() {
        Action::Elements => {
            print_elements(elements, color)?;
            Ok(0)
        }
        Action::Blocks => {
            print_blocks(&parser.code_blocks(), color)?;
            Ok(0)
        }
        Action::Run(target) => {
            let blocks = parser.code_blocks();
            let block = select_block(&blocks, target, &text)?;
            run_block(&config, block, color)
        }
    }
}

/// Load configuration and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_with_override(cli.config.as_deref())?;

    if let Some((program, args)) = cli.interpreter_command()? {
        config.runner.interpreter = program;
        config.runner.args = args;
    }
    if let Some(timeout) = cli.timeout {
        config.runner.timeout = timeout;
    }
    if cli.no_auto_print {
        config.runner.auto_print = false;
    }

    Ok(config)
}

/// Read the document from the file argument or stdin.
fn read_input(cli: &Cli) -> Result<String> {
    match &cli.file {
        Some(path) => {
            info!("Reading {}", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            info!("Reading from stdin");
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_elements(elements: &[MarkdownElement], color: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for element in elements {
        if color {
            let kind = element.kind.to_string();
            let kind = match element.kind {
                ElementKind::Header(_) => kind.as_str().magenta().bold(),
                ElementKind::CodeBlock { .. } | ElementKind::InlineCode => kind.as_str().green(),
                ElementKind::Link { .. } => kind.as_str().blue().underlined(),
                _ => kind.as_str().cyan(),
            };
            write!(out, "{} {} {:?}", element.range.to_string().dark_grey(), kind, element.content)?;
            if let Some(url) = element.url() {
                write!(out, " -> {}", url)?;
            }
            writeln!(out)?;
        } else {
            writeln!(out, "{}", element)?;
        }
    }
    out.flush()
}

fn print_blocks(blocks: &[CodeBlock], color: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for (index, block) in blocks.iter().enumerate() {
        let language = block.language.as_deref().unwrap_or("-");
        let lines = block.text.lines().count();
        if color {
            writeln!(
                out,
                "[{}] {} {} ({} lines)",
                index.to_string().bold(),
                block.range.to_string().dark_grey(),
                language.green(),
                lines
            )?;
        } else {
            writeln!(out, "[{}] {} {} ({} lines)", index, block.range, language, lines)?;
        }
    }
    out.flush()
}

/// Resolve the code block an execution request points at.
fn select_block<'a>(blocks: &'a [CodeBlock], target: Target, text: &str) -> Result<&'a CodeBlock> {
    let offset = match target {
        Target::Index(index) => {
            return blocks.get(index).ok_or_else(|| {
                PlaygroundError::Cli(format!(
                    "no code block #{} (document has {})",
                    index,
                    blocks.len()
                ))
            });
        }
        Target::Offset(offset) => offset,
        Target::Position(position) => LineIndex::new(text).offset(position).ok_or_else(|| {
            PlaygroundError::Cli(format!("position {} is outside the document", position))
        })?,
    };

    code_block_at(blocks, offset).ok_or(PlaygroundError::NoCodeBlock { offset })
}

/// Execute one block and stream its output to the terminal.
fn run_block(config: &Config, block: &CodeBlock, color: bool) -> Result<i32> {
    info!(
        "Running block at {} ({} chars)",
        block.range,
        block.text.chars().count()
    );

    let runner = Runner::from_config(&config.runner, terminal_sink(color));
    let outcome = runner.execute(&block.text).wait();
    info!("Execution {}", outcome);

    Ok(if outcome.is_success() { 0 } else { 1 })
}

fn terminal_sink(color: bool) -> impl OutputSink {
    FnSink::new(
        move |text: String| {
            let mut out = io::stdout().lock();
            let written = if color && text == NO_OUTPUT_NOTICE {
                write!(out, "{}", text.as_str().green())
            } else {
                write!(out, "{}", text)
            };
            if let Err(e) = written.and_then(|_| out.flush()) {
                error!("Could not write output: {}", e);
            }
        },
        move |text: String| {
            let mut err = io::stderr().lock();
            let written = if color {
                write!(err, "{}", text.as_str().red())
            } else {
                write!(err, "{}", text)
            };
            if let Err(e) = written.and_then(|_| err.flush()) {
                error!("Could not write output: {}", e);
            }
        },
    )
}
