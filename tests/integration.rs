//! Integration tests for mdplay.
//!
//! These tests drive the whole path an editor takes: tokenize a document,
//! find the code block under the cursor, and run it with an interpreter
//! configured through TOML. Execution tests use `sh` and only run on unix.

use mdplay_config::Config;
use mdplay_core::{ElementKind, LineIndex, Position};
use mdplay_parser::{code_block_at, IncrementalParser, Tokenizer};

const DOCUMENT: &str = r#"# Shell notes

Run the **first** block to greet:

```sh
echo "hello from mdplay"
```

Then a *failing* one:

```sh
echo partial
no_such_command_for_mdplay
```

- [manual](https://example.com/sh)
> blocks run in a fresh process
"#;

/// Helper to list the kinds of a document in order.
fn kinds(text: &str) -> Vec<String> {
    Tokenizer::new()
        .parse(text)
        .iter()
        .map(|element| element.kind.to_string())
        .collect()
}

#[test]
fn test_document_elements() {
    assert_eq!(
        kinds(DOCUMENT),
        vec![
            "header1",
            "bold",
            "code_block",
            "inline_code",
            // The backticks of the first closing fence pair with the next opening fence
            "inline_code",
            "italic",
            "code_block",
            "inline_code",
            "list_item",
            "link",
            "quote",
        ]
    );
}

#[test]
fn test_cursor_selects_block() {
    let mut parser = IncrementalParser::new();
    parser.parse_if_needed(DOCUMENT);
    let blocks = parser.code_blocks();
    assert_eq!(blocks.len(), 2);

    // Line 6 holds the first echo
    let index = LineIndex::new(DOCUMENT);
    let cursor = index.offset(Position::new(6, 3)).unwrap();
    let block = code_block_at(&blocks, cursor).unwrap();
    assert_eq!(block.text, "echo \"hello from mdplay\"");
    assert_eq!(block.language.as_deref(), Some("sh"));

    // The header line is outside every block
    let cursor = index.offset(Position::new(1, 1)).unwrap();
    assert!(code_block_at(&blocks, cursor).is_none());
}

#[test]
fn test_link_url_is_kept() {
    let elements = Tokenizer::new().parse(DOCUMENT);
    let link = elements
        .iter()
        .find(|element| matches!(element.kind, ElementKind::Link { .. }))
        .unwrap();
    assert_eq!(link.content, "manual");
    assert_eq!(link.url(), Some("https://example.com/sh"));
}

#[test]
fn test_features_config_drives_tokenizer() {
    let config = Config::parse_override("[features]\nLinks = false\nHighlights = false").unwrap();
    let tokenizer = Tokenizer::with_settings(config.features.links, config.features.highlights);

    let elements = tokenizer.parse("[a](b) ==c== **d**");
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].kind, ElementKind::Bold);
}

#[test]
fn test_memo_survives_cursor_moves() {
    let mut parser = IncrementalParser::new();
    for _ in 0..5 {
        parser.parse_if_needed(DOCUMENT);
    }
    assert_eq!(parser.scan_count(), 1);

    let edited = DOCUMENT.replace("first", "second");
    parser.parse_if_needed(&edited);
    assert_eq!(parser.scan_count(), 2);
}

#[cfg(unix)]
mod execution {
    use super::*;
    use mdplay_runner::{ExecutionOutcome, FnSink, Runner, NO_OUTPUT_NOTICE};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Runner for `sh` built from TOML, recording both streams.
    fn sh_runner() -> (Runner, Log, Log) {
        let config = Config::parse_override(
            "[runner]\nInterpreter = \"sh\"\nArgs = [\"-s\"]\nAutoPrint = false\nTimeout = 10.0",
        )
        .unwrap();

        let stdout: Log = Arc::new(Mutex::new(Vec::new()));
        let stderr: Log = Arc::new(Mutex::new(Vec::new()));
        let (out, err) = (Arc::clone(&stdout), Arc::clone(&stderr));
        let sink = FnSink::new(
            move |text: String| out.lock().unwrap().push(text),
            move |text: String| err.lock().unwrap().push(text),
        );

        (Runner::from_config(&config.runner, sink), stdout, stderr)
    }

    #[test]
    fn test_run_block_under_cursor() {
        let blocks = mdplay_parser::code_blocks(&Tokenizer::new().parse(DOCUMENT));
        let (runner, stdout, stderr) = sh_runner();

        let outcome = runner.execute(&blocks[0].text).wait();

        assert_eq!(outcome, ExecutionOutcome::Exited { code: Some(0) });
        assert_eq!(*stdout.lock().unwrap(), vec!["hello from mdplay\n"]);
        assert!(stderr.lock().unwrap().is_empty());
    }

    #[test]
    fn test_run_failing_block() {
        let blocks = mdplay_parser::code_blocks(&Tokenizer::new().parse(DOCUMENT));
        let (runner, stdout, stderr) = sh_runner();

        let outcome = runner.execute(&blocks[1].text).wait();

        assert!(!outcome.is_success());
        assert_eq!(*stdout.lock().unwrap(), vec!["partial\n"]);
        let stderr = stderr.lock().unwrap();
        assert_eq!(stderr.len(), 1);
        assert!(stderr[0].starts_with("❌ Error:\n"));
        assert!(stderr[0].contains("no_such_command_for_mdplay"));
    }

    #[test]
    fn test_silent_block_gets_notice() {
        let (runner, stdout, stderr) = sh_runner();

        runner.execute("x=1").wait();

        assert_eq!(*stdout.lock().unwrap(), vec![NO_OUTPUT_NOTICE]);
        assert!(stderr.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rapid_executions_do_not_block_each_other() {
        let (runner, stdout, _stderr) = sh_runner();

        let handles: Vec<_> = (0..4)
            .map(|i| runner.execute(&format!("sleep 0.2\necho run{}", i)))
            .collect();
        let started = std::time::Instant::now();
        for handle in handles {
            assert!(handle.wait().is_success());
        }

        // Run in parallel, not one after the other
        assert!(started.elapsed() < Duration::from_millis(750));
        let mut lines = stdout.lock().unwrap().clone();
        lines.sort();
        assert_eq!(lines, vec!["run0\n", "run1\n", "run2\n", "run3\n"]);
    }

    #[test]
    fn test_config_timeout_applies() {
        let config = Config::parse_override(
            "[runner]\nInterpreter = \"sh\"\nArgs = [\"-s\"]\nAutoPrint = false\nTimeout = 0.2",
        )
        .unwrap();
        let stderr: Log = Arc::new(Mutex::new(Vec::new()));
        let err = Arc::clone(&stderr);
        let runner = Runner::from_config(
            &config.runner,
            FnSink::new(|_: String| {}, move |text: String| err.lock().unwrap().push(text)),
        );

        let outcome = runner.execute("sleep 5").wait();

        assert_eq!(outcome, ExecutionOutcome::TimedOut);
        assert_eq!(
            stderr.lock().unwrap().last().map(String::as_str),
            Some("⏱ Execution timed out after 0.2s\n")
        );
    }
}
