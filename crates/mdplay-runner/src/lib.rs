//! mdplay Runner
//!
//! Executes code blocks with an external interpreter. The code is prepared
//! (optionally auto-printing its last expression), piped to a freshly
//! spawned interpreter, and the captured output is delivered to an
//! [`OutputSink`] from a worker thread.
//!
//! # Example
//!
//! ```no_run
//! use mdplay_runner::{FnSink, Runner};
//!
//! let sink = FnSink::new(|text: String| print!("{}", text), |text: String| eprint!("{}", text));
//! let runner = Runner::new(sink).with_interpreter("python3", &["-"]);
//!
//! let handle = runner.execute("1 + 1");
//! println!("{}", handle.wait());
//! ```

mod runner;
mod sink;
mod transform;

pub use runner::{
    error_message, failure_message, timeout_message, ExecutionHandle, ExecutionOutcome, Runner,
    CANCELLED_NOTICE, NO_OUTPUT_NOTICE,
};
pub use sink::{FnSink, OutputSink};
pub use transform::wrap_last_expression_in_print;
