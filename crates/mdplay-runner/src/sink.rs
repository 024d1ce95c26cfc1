//! Output delivery.

/// Receiver of execution output.
///
/// Called from worker threads, possibly from several executions at once.
/// Every call carries non-empty text.
pub trait OutputSink: Send + Sync {
    /// Standard output of a finished execution, or the no-output notice.
    fn on_stdout(&self, text: String);

    /// Interpreter diagnostics and runner status messages.
    fn on_stderr(&self, text: String);
}

/// Sink built from a pair of closures.
///
/// # Example
///
/// ```
/// use mdplay_runner::{FnSink, OutputSink};
///
/// let sink = FnSink::new(|text: String| print!("{}", text), |text: String| eprint!("{}", text));
/// sink.on_stdout("hello\n".to_string());
/// ```
pub struct FnSink<O, E> {
    on_stdout: O,
    on_stderr: E,
}

impl<O, E> FnSink<O, E>
where
    O: Fn(String) + Send + Sync,
    E: Fn(String) + Send + Sync,
{
    pub fn new(on_stdout: O, on_stderr: E) -> Self {
        Self {
            on_stdout,
            on_stderr,
        }
    }
}

impl<O, E> OutputSink for FnSink<O, E>
where
    O: Fn(String) + Send + Sync,
    E: Fn(String) + Send + Sync,
{
    fn on_stdout(&self, text: String) {
        (self.on_stdout)(text)
    }

    fn on_stderr(&self, text: String) {
        (self.on_stderr)(text)
    }
}

impl<O, E> std::fmt::Debug for FnSink<O, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fn_sink_routes_streams() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let err = Arc::new(Mutex::new(Vec::new()));
        let (out_log, err_log) = (Arc::clone(&out), Arc::clone(&err));

        let sink = FnSink::new(
            move |text: String| out_log.lock().unwrap().push(text),
            move |text: String| err_log.lock().unwrap().push(text),
        );
        sink.on_stdout("a".to_string());
        sink.on_stderr("b".to_string());
        sink.on_stdout("c".to_string());

        assert_eq!(*out.lock().unwrap(), vec!["a", "c"]);
        assert_eq!(*err.lock().unwrap(), vec!["b"]);
    }
}
