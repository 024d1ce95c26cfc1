//! Interpreter process lifecycle.
//!
//! Every [`Runner::execute`] call owns one child process and one worker
//! thread. Writing the prepared source to stdin and draining stdout and
//! stderr each happen on a pipe thread of their own. The worker only polls:
//! for exit, for the pipes to finish, for the cancel flag and for the
//! deadline. It finally hands the captured text to the [`OutputSink`].

use crate::sink::OutputSink;
use crate::transform::wrap_last_expression_in_print;
use log::{debug, info, warn};
use mdplay_config::RunnerConfig;
use mdplay_core::PlaygroundError;
use std::fmt;
use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Interval between exit polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to wait for pipe readers once the child has been killed.
///
/// Grandchildren may keep the pipes open after the child is gone.
const KILL_GRACE: Duration = Duration::from_millis(250);

// =============================================================================
// Messages
// =============================================================================

/// Delivered on stdout when a program exits without printing anything.
pub const NO_OUTPUT_NOTICE: &str = "✅ Code executed (no output)\n";

/// Delivered on stderr after a cancelled execution's output.
pub const CANCELLED_NOTICE: &str = "⏹ Execution cancelled\n";

/// Interpreter diagnostics, as delivered on stderr.
pub fn error_message(stderr: &str) -> String {
    format!("❌ Error:\n{}\n", stderr)
}

/// Infrastructure failure (spawn or stdin write), as delivered on stderr.
pub fn failure_message(cause: &str) -> String {
    format!("❌ Execution failed: {}\n", cause)
}

/// Deadline expiry, as delivered on stderr.
pub fn timeout_message(limit: Duration) -> String {
    format!("⏱ Execution timed out after {}s\n", limit.as_secs_f64())
}

// =============================================================================
// Outcome and handle
// =============================================================================

/// How an execution ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The interpreter exited on its own. `code` is `None` when it was
    /// terminated by a signal.
    Exited { code: Option<i32> },
    /// Killed after [`ExecutionHandle::cancel`].
    Cancelled,
    /// Killed when the runner's timeout expired.
    TimedOut,
    /// The interpreter could not be started or fed.
    Failed(String),
}

impl ExecutionOutcome {
    /// Whether the interpreter exited with status 0.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Exited { code: Some(0) })
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Exited { code: Some(code) } => write!(f, "exited with status {}", code),
            ExecutionOutcome::Exited { code: None } => write!(f, "terminated by signal"),
            ExecutionOutcome::Cancelled => write!(f, "cancelled"),
            ExecutionOutcome::TimedOut => write!(f, "timed out"),
            ExecutionOutcome::Failed(cause) => write!(f, "failed: {}", cause),
        }
    }
}

/// One in-flight execution.
///
/// Dropping the handle detaches it; the process keeps running and its
/// output is still delivered.
#[derive(Debug)]
pub struct ExecutionHandle {
    id: u64,
    cancel: Arc<AtomicBool>,
    worker: JoinHandle<ExecutionOutcome>,
}

impl ExecutionHandle {
    /// Runner-unique id of this execution.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ask the worker to kill the process. Has no effect once it has ended.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Whether the execution has ended and all output was delivered.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Block until the execution ends.
    pub fn wait(self) -> ExecutionOutcome {
        self.worker
            .join()
            .unwrap_or_else(|_| ExecutionOutcome::Failed("execution worker panicked".to_string()))
    }
}

// =============================================================================
// Runner
// =============================================================================

/// Spawns interpreter processes for code blocks.
///
/// `Runner` is `Send + Sync`; concurrent `execute` calls are independent
/// and share only the sink.
pub struct Runner {
    program: String,
    args: Vec<String>,
    auto_print: bool,
    print_function: String,
    timeout: Option<Duration>,
    sink: Arc<dyn OutputSink>,
    next_id: AtomicU64,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("auto_print", &self.auto_print)
            .field("print_function", &self.print_function)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Runner {
    /// Create a runner with the default interpreter settings.
    pub fn new(sink: impl OutputSink + 'static) -> Self {
        Self::from_config(&RunnerConfig::default(), sink)
    }

    /// Create a runner from the `[runner]` configuration section.
    pub fn from_config(config: &RunnerConfig, sink: impl OutputSink + 'static) -> Self {
        Self {
            program: config.interpreter.clone(),
            args: config.args.clone(),
            auto_print: config.auto_print,
            print_function: config.print_function.clone(),
            timeout: config.timeout_duration(),
            sink: Arc::new(sink),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set the interpreter program and its arguments.
    pub fn with_interpreter(mut self, program: impl Into<String>, args: &[&str]) -> Self {
        self.program = program.into();
        self.args = args.iter().map(|arg| arg.to_string()).collect();
        self
    }

    pub fn with_auto_print(mut self, auto_print: bool) -> Self {
        self.auto_print = auto_print;
        self
    }

    pub fn with_print_function(mut self, print_function: impl Into<String>) -> Self {
        self.print_function = print_function.into();
        self
    }

    /// Set the deadline after which a running program is killed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The source that would be sent to the interpreter for `code`.
    pub fn prepare(&self, code: &str) -> String {
        if self.auto_print {
            wrap_last_expression_in_print(code, &self.print_function)
        } else {
            code.to_string()
        }
    }

    /// Start executing `code` on a worker thread and return immediately.
    pub fn execute(&self, code: &str) -> ExecutionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = Arc::new(AtomicBool::new(false));

        let job = Job {
            id,
            program: self.program.clone(),
            args: self.args.clone(),
            source: self.prepare(code),
            timeout: self.timeout,
            cancel: Arc::clone(&cancel),
            sink: Arc::clone(&self.sink),
        };

        info!("Execution #{} starting: {} {}", id, self.program, self.args.join(" "));
        let worker = thread::spawn(move || job.run());

        ExecutionHandle { id, cancel, worker }
    }
}

// =============================================================================
// Worker
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Progress reported to the worker by its pipe threads.
enum Event {
    /// A stream reached end-of-file
    Output(Stream, Vec<u8>),
    /// The program was written and stdin closed, or the write failed
    Fed(io::Result<()>),
}

/// How the wait loop ended.
enum Ended {
    Exited(Option<i32>),
    Cancelled,
    TimedOut(Duration),
    Failed(String),
}

/// What the pipe threads have reported so far.
#[derive(Default)]
struct Captured {
    stdout: Option<Vec<u8>>,
    stderr: Option<Vec<u8>>,
    fed: Option<io::Result<()>>,
}

impl Captured {
    fn record(&mut self, event: Event) {
        match event {
            Event::Output(Stream::Stdout, bytes) => self.stdout = Some(bytes),
            Event::Output(Stream::Stderr, bytes) => self.stderr = Some(bytes),
            Event::Fed(result) => self.fed = Some(result),
        }
    }

    /// Both streams hit EOF and stdin is done.
    fn is_complete(&self) -> bool {
        self.stdout.is_some() && self.stderr.is_some() && self.fed.is_some()
    }

    fn write_error(&self) -> Option<&io::Error> {
        self.fed.as_ref().and_then(|fed| fed.as_ref().err())
    }
}

struct Job {
    id: u64,
    program: String,
    args: Vec<String>,
    source: String,
    timeout: Option<Duration>,
    cancel: Arc<AtomicBool>,
    sink: Arc<dyn OutputSink>,
}

impl Job {
    fn run(self) -> ExecutionOutcome {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                let err = PlaygroundError::Spawn {
                    program: self.program.clone(),
                    source,
                };
                return self.fail(err.to_string());
            }
        };
        debug!("Execution #{} spawned pid {}", self.id, child.id());

        // Every pipe gets its own thread so the worker only ever polls
        let (tx, rx) = mpsc::channel();
        spawn_reader(child.stdout.take(), Stream::Stdout, tx.clone());
        spawn_reader(child.stderr.take(), Stream::Stderr, tx.clone());
        spawn_writer(child.stdin.take(), self.source.clone(), tx);

        let mut captured = Captured::default();
        let ended = self.supervise(&mut child, &rx, &mut captured);

        match ended {
            Ended::Exited(code) => {
                self.deliver(&captured, true);
                info!("Execution #{} exited with {:?}", self.id, code);
                ExecutionOutcome::Exited { code }
            }
            Ended::Cancelled => {
                collect(&rx, &mut captured, KILL_GRACE);
                self.deliver(&captured, false);
                info!("Execution #{} cancelled", self.id);
                self.sink.on_stderr(CANCELLED_NOTICE.to_string());
                ExecutionOutcome::Cancelled
            }
            Ended::TimedOut(limit) => {
                collect(&rx, &mut captured, KILL_GRACE);
                self.deliver(&captured, false);
                warn!("Execution #{} timed out after {:?}", self.id, limit);
                self.sink.on_stderr(timeout_message(limit));
                ExecutionOutcome::TimedOut
            }
            Ended::Failed(cause) => self.fail(cause),
        }
    }

    /// Poll until the child has exited and every pipe is done, checking the
    /// cancel flag and the deadline on each round. Output is only complete
    /// once the pipes close, which a grandchild can delay past the exit of
    /// the child itself.
    fn supervise(
        &self,
        child: &mut Child,
        rx: &Receiver<Event>,
        captured: &mut Captured,
    ) -> Ended {
        let started = Instant::now();
        let mut exit_code = None;

        loop {
            while let Ok(event) = rx.try_recv() {
                captured.record(event);
            }

            if let Some(err) = captured.write_error() {
                let cause = format!("could not write program to interpreter: {}", err);
                kill(child);
                return Ended::Failed(cause);
            }

            if exit_code.is_none() {
                match child.try_wait() {
                    Ok(Some(status)) => exit_code = Some(status.code()),
                    Ok(None) => {}
                    Err(err) => {
                        kill(child);
                        return Ended::Failed(format!("could not wait for interpreter: {}", err));
                    }
                }
            }
            if let Some(code) = exit_code {
                if captured.is_complete() {
                    return Ended::Exited(code);
                }
            }

            if self.cancel.load(Ordering::SeqCst) {
                kill(child);
                return Ended::Cancelled;
            }
            if let Some(limit) = self.timeout {
                if started.elapsed() >= limit {
                    kill(child);
                    return Ended::TimedOut(limit);
                }
            }

            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(event) => captured.record(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => thread::sleep(POLL_INTERVAL),
            }
        }
    }

    fn deliver(&self, captured: &Captured, exited: bool) {
        let stdout = String::from_utf8_lossy(captured.stdout.as_deref().unwrap_or_default());
        if !stdout.is_empty() {
            self.sink.on_stdout(stdout.into_owned());
        } else if exited {
            self.sink.on_stdout(NO_OUTPUT_NOTICE.to_string());
        }

        let stderr = String::from_utf8_lossy(captured.stderr.as_deref().unwrap_or_default());
        if !stderr.is_empty() {
            self.sink.on_stderr(error_message(&stderr));
        }
    }

    fn fail(&self, cause: String) -> ExecutionOutcome {
        warn!("Execution #{} failed: {}", self.id, cause);
        self.sink.on_stderr(failure_message(&cause));
        ExecutionOutcome::Failed(cause)
    }
}

fn spawn_reader<R>(pipe: Option<R>, stream: Stream, tx: Sender<Event>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            // Keep whatever was read before an error
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(Event::Output(stream, buf));
    });
}

/// Write the program, then drop stdin so the interpreter sees EOF.
fn spawn_writer(stdin: Option<ChildStdin>, source: String, tx: Sender<Event>) {
    thread::spawn(move || {
        let result = match stdin {
            Some(mut stdin) => stdin
                .write_all(source.as_bytes())
                .and_then(|_| stdin.flush()),
            None => Ok(()),
        };
        let _ = tx.send(Event::Fed(result));
    });
}

/// Wait up to `grace` for streams still open after a kill.
fn collect(rx: &Receiver<Event>, captured: &mut Captured, grace: Duration) {
    let deadline = Instant::now() + grace;
    while captured.stdout.is_none() || captured.stderr.is_none() {
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(event) => captured.record(event),
            Err(_) => break,
        }
    }
}

/// Kill and reap, ignoring a child that already exited.
fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
