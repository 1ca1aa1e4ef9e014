//! Bounded helper invocation
//!
//! The core never blocks the event-processing context on an external
//! process. `ProcessTransport` runs the helper on a worker thread and
//! waits with a deadline; a helper that outlives its deadline is
//! abandoned and its eventual output discarded.

use std::process::Command;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Errors from invoking an external helper
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("helper not found: {0}")]
    NotFound(String),

    #[error("helper did not respond within {0:?}")]
    Timeout(Duration),

    #[error("helper invocation failed: {0}")]
    Io(String),
}

/// Captured result of a helper invocation
#[derive(Debug, Clone)]
pub struct HelperOutput {
    /// Whether the helper exited successfully
    pub success: bool,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

/// Narrow capability: run an external helper with arguments, capture its
/// output, bounded by a deadline. Test doubles implement this to count and
/// script invocations.
pub trait HelperTransport {
    fn invoke(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<HelperOutput, TransportError>;
}

/// Real transport backed by `std::process::Command` on a worker thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTransport;

impl HelperTransport for ProcessTransport {
    fn invoke(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<HelperOutput, TransportError> {
        let (tx, rx) = mpsc::channel();
        let program_owned = program.to_string();
        let args_owned = args.to_vec();

        thread::spawn(move || {
            let result = Command::new(&program_owned).args(&args_owned).output();
            // Send fails when the caller already gave up; the late result
            // is dropped here rather than applied.
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(output)) => Ok(HelperOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TransportError::NotFound(program.to_string()))
            }
            Ok(Err(e)) => Err(TransportError::Io(e.to_string())),
            Err(_) => {
                log::warn!("Helper '{}' exceeded {:?}, abandoning", program, timeout);
                Err(TransportError::Timeout(timeout))
            }
        }
    }
}
