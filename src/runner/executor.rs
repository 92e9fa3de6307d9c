//! @ai:module:intent Run one external command while streaming and buffering its output
//! @ai:module:layer infrastructure
//! @ai:module:public_api CommandExecutor, CommandExecutorTrait, ExecutionResult, ErrorPolicy
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::resolver::ResolvedCommand;
use crate::runner::sink::{LogSink, TracingSink};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, PipeWriter, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus, Stdio};

/// @ai:intent What to do when a command exits with a non-zero status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    #[default]
    Abort,
    Continue,
}

impl ErrorPolicy {
    /// @ai:effects pure
    pub fn from_continue_flag(continue_on_error: bool) -> Self {
        if continue_on_error {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        }
    }
}

/// @ai:intent Captured output of one command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Merged stdout/stderr lines in arrival order, without line terminators
    pub lines: Vec<String>,
    /// -1 when the process was terminated by a signal
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// @ai:intent Trait for command execution
pub trait CommandExecutorTrait {
    /// @ai:intent Execute a resolved command to completion and return its output
    fn execute(&self, command: &ResolvedCommand) -> Result<ExecutionResult>;
}

/// @ai:intent Executes commands synchronously with merged, line-streamed output
pub struct CommandExecutor<S: LogSink = TracingSink> {
    policy: ErrorPolicy,
    sink: S,
    working_dir: Option<PathBuf>,
}

impl CommandExecutor<TracingSink> {
    /// @ai:intent Create an executor that logs output through tracing
    /// @ai:effects pure
    pub fn new(policy: ErrorPolicy) -> Self {
        Self::with_sink(policy, TracingSink)
    }
}

impl<S: LogSink> CommandExecutor<S> {
    /// @ai:effects pure
    pub fn with_sink(policy: ErrorPolicy, sink: S) -> Self {
        Self {
            policy,
            sink,
            working_dir: None,
        }
    }

    /// @ai:intent Run every command inside `dir`
    /// @ai:effects pure
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// @ai:intent Spawn the process with stdout and stderr sharing one pipe
    /// @ai:effects process
    fn spawn(&self, command: &ResolvedCommand, writer: PipeWriter) -> Result<Child> {
        let mut process = std::process::Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        if let Some(dir) = &self.working_dir {
            process.current_dir(dir);
        }

        // `process` owns our copies of the write end; they close when it drops
        // here, so the reader sees EOF once the child and its descendants exit.
        process.spawn().map_err(|source| Error::Spawn {
            program: command.program.clone(),
            source,
        })
    }

    /// @ai:intent Read the merged stream until EOF, forwarding and buffering each line
    /// @ai:post lines keep arrival order
    /// @ai:effects io
    fn pump(&self, source: &str, stream: impl Read) -> Result<Vec<String>> {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let mut lines = Vec::new();

        loop {
            buf.clear();

            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf)
                .trim_end_matches(['\n', '\r'])
                .to_string();

            self.sink.line(source, &line);
            lines.push(line);
        }

        Ok(lines)
    }

    /// @ai:intent Apply the error policy to a finished invocation
    /// @ai:effects io
    fn enforce(&self, command: &ResolvedCommand, result: ExecutionResult) -> Result<ExecutionResult> {
        if result.success() {
            return Ok(result);
        }

        match self.policy {
            ErrorPolicy::Continue => {
                tracing::error!(
                    "Command returned with non-zero exit code ({})",
                    result.exit_code
                );
                Ok(result)
            }
            ErrorPolicy::Abort => Err(Error::CommandFailed {
                program: command.program.clone(),
                exit_code: result.exit_code,
            }),
        }
    }
}

/// @ai:intent Executable name used to tag output lines
/// @ai:effects pure
fn source_tag(program: &str) -> &str {
    Path::new(program)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program)
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

impl<S: LogSink> CommandExecutorTrait for CommandExecutor<S> {
    /// @ai:intent Run the command, blocking until it exits
    /// @ai:effects process, io
    fn execute(&self, command: &ResolvedCommand) -> Result<ExecutionResult> {
        tracing::info!("run command: {}", command);

        let (reader, writer) = std::io::pipe()?;
        let mut child = self.spawn(command, writer)?;

        let lines = match self.pump(source_tag(&command.program), reader) {
            Ok(lines) => lines,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        let status = child.wait()?;
        let result = ExecutionResult {
            lines,
            exit_code: exit_code(status),
        };

        self.enforce(command, result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct MemorySink {
        lines: Mutex<Vec<(String, String)>>,
    }

    impl LogSink for MemorySink {
        fn line(&self, source: &str, line: &str) {
            self.lines
                .lock()
                .unwrap()
                .push((source.to_string(), line.to_string()));
        }
    }

    fn shell(script: &str) -> ResolvedCommand {
        ResolvedCommand::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_captures_merged_output_in_order() {
        let executor = CommandExecutor::with_sink(ErrorPolicy::Abort, MemorySink::default());

        let result = executor
            .execute(&shell("echo first; echo second >&2; echo third"))
            .unwrap();

        assert!(result.success());
        assert_eq!(result.lines, vec!["first", "second", "third"]);

        let logged = executor.sink().lines.lock().unwrap().clone();
        assert_eq!(logged.len(), 3);
        assert!(logged.iter().all(|(source, _)| source == "sh"));
        assert_eq!(logged[1].1, "second");
    }

    #[test]
    fn test_continue_policy_returns_partial_output() {
        let executor = CommandExecutor::with_sink(ErrorPolicy::Continue, MemorySink::default());

        let result = executor.execute(&shell("echo partial; exit 3")).unwrap();

        assert_eq!(result.exit_code, 3);
        assert_eq!(result.lines, vec!["partial"]);
    }

    #[test]
    fn test_abort_policy_fails_with_exit_code() {
        let executor = CommandExecutor::with_sink(ErrorPolicy::Abort, MemorySink::default());

        let err = executor.execute(&shell("echo partial; exit 3")).unwrap_err();

        assert!(matches!(err, Error::CommandFailed { exit_code: 3, .. }));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let executor = CommandExecutor::new(ErrorPolicy::Continue);

        let err = executor
            .execute(&ResolvedCommand::new("nonexistent_program_xyz", vec![]))
            .unwrap_err();

        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn test_runs_in_working_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "here").unwrap();
        let executor = CommandExecutor::with_sink(ErrorPolicy::Abort, MemorySink::default())
            .in_dir(temp.path());

        let result = executor.execute(&shell("cat marker.txt")).unwrap();

        assert_eq!(result.lines, vec!["here"]);
    }

    #[test]
    fn test_last_line_without_newline_is_kept() {
        let executor = CommandExecutor::with_sink(ErrorPolicy::Abort, MemorySink::default());

        let result = executor.execute(&shell("printf 'a\\r\\nb'")).unwrap();

        assert_eq!(result.lines, vec!["a", "b"]);
    }

    #[derive(Default)]
    struct TimedSink {
        arrivals: Mutex<Vec<(String, Instant)>>,
    }

    impl LogSink for TimedSink {
        fn line(&self, _source: &str, line: &str) {
            self.arrivals
                .lock()
                .unwrap()
                .push((line.to_string(), Instant::now()));
        }
    }

    #[test]
    fn test_lines_reach_sink_while_running() {
        let executor = CommandExecutor::with_sink(ErrorPolicy::Abort, TimedSink::default());

        let result = executor.execute(&shell("echo a; sleep 0.5; echo b")).unwrap();
        let finished = Instant::now();

        assert_eq!(result.lines, vec!["a", "b"]);

        let arrivals = executor.sink().arrivals.lock().unwrap().clone();
        assert_eq!(arrivals[0].0, "a");
        assert!(finished.duration_since(arrivals[0].1) >= Duration::from_millis(400));
    }

    #[test]
    fn test_source_tag_uses_file_name() {
        assert_eq!(source_tag("/usr/bin/make"), "make");
        assert_eq!(source_tag("bench"), "bench");
    }
}
