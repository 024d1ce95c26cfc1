//! Interpreter configuration.
//!
//! This module contains the `RunnerConfig` struct which describes the
//! external interpreter used to execute code blocks.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interpreter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunnerConfig {
    /// Interpreter executable, resolved through `PATH` when not absolute.
    /// Default: "swift"
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Arguments making the interpreter read its program from stdin.
    /// Default: ["-"]
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Wrap a trailing bare expression in a print call.
    /// Default: true
    #[serde(default = "default_true")]
    pub auto_print: bool,

    /// Name of the print function used by auto-print.
    /// Default: "print"
    #[serde(default = "default_print_function")]
    pub print_function: String,

    /// Seconds before a running program is killed, 0 disables.
    /// Default: 30.0
    #[serde(default = "default_timeout")]
    pub timeout: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            args: default_args(),
            auto_print: true,
            print_function: default_print_function(),
            timeout: default_timeout(),
        }
    }
}

impl RunnerConfig {
    /// Merge another RunnerConfig into this one.
    pub fn merge(&mut self, other: &RunnerConfig) {
        self.interpreter = other.interpreter.clone();
        self.args = other.args.clone();
        self.auto_print = other.auto_print;
        self.print_function = other.print_function.clone();
        self.timeout = other.timeout;
    }

    /// The timeout as a duration, `None` when disabled.
    ///
    /// Zero, negative, non-finite and unrepresentably large values all
    /// disable the timeout.
    pub fn timeout_duration(&self) -> Option<Duration> {
        if self.timeout > 0.0 {
            Duration::try_from_secs_f64(self.timeout).ok()
        } else {
            None
        }
    }
}

fn default_interpreter() -> String {
    "swift".to_string()
}

fn default_args() -> Vec<String> {
    vec!["-".to_string()]
}

fn default_print_function() -> String {
    "print".to_string()
}

fn default_timeout() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let runner = RunnerConfig::default();
        assert_eq!(runner.interpreter, "swift");
        assert_eq!(runner.args, vec!["-".to_string()]);
        assert!(runner.auto_print);
        assert_eq!(runner.print_function, "print");
        assert_eq!(runner.timeout_duration(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_serde_pascal_case() {
        let toml_str = r#"
            Interpreter = "python3"
            Args = ["-u", "-"]
            AutoPrint = false
            PrintFunction = "echo"
            Timeout = 2.5
        "#;

        let runner: RunnerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(runner.interpreter, "python3");
        assert_eq!(runner.args, vec!["-u".to_string(), "-".to_string()]);
        assert!(!runner.auto_print);
        assert_eq!(runner.print_function, "echo");
        assert_eq!(runner.timeout_duration(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_timeout_disabled() {
        let mut runner = RunnerConfig::default();
        runner.timeout = 0.0;
        assert_eq!(runner.timeout_duration(), None);
        runner.timeout = -1.0;
        assert_eq!(runner.timeout_duration(), None);
        runner.timeout = f64::NAN;
        assert_eq!(runner.timeout_duration(), None);
    }
}
