//! Supervised launch of an external memory/disk imaging tool.
//!
//! The tool is invoked as `<exe> /O <output_file> /Q`. Its stdout and stderr are
//! read line by line by two reader tasks feeding a bounded channel; a drain task
//! forwards every non-empty line to the log. The orchestrator waits for the
//! process to exit, joins all three tasks, and only then builds the outcome.
//!
//! When a deadline kills the tool, processes it spawned may still hold the
//! pipes open. The readers then get a short grace period before they are
//! aborted, so the call never outlives the deadline by more than that.

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::diagnostics::ImagingOutcome;

const OUTPUT_CHANNEL_CAPACITY: usize = 64;

/// How long readers may keep draining after the tool was killed
const OUTPUT_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputStream {
    Stdout,
    Stderr,
}

#[derive(Debug)]
struct OutputLine {
    stream: OutputStream,
    text: String,
}

/// `DiskImage_<YYYYMMDD_HHmmss>.raw`
pub fn image_file_name(now: DateTime<Local>) -> String {
    format!("DiskImage_{}.raw", now.format("%Y%m%d_%H%M%S"))
}

#[derive(Debug, Clone, Default)]
pub struct ImagingOrchestrator {
    deadline: Option<Duration>,
}

impl ImagingOrchestrator {
    /// Orchestrator that waits for the tool without a time limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the tool and report failure if it runs longer than `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Run the imaging tool. Never fails: every failure mode is described by the
    /// returned outcome, and logged.
    pub async fn create_disk_image(&self, executable: &Path, output_dir: &Path) -> ImagingOutcome {
        info!("Creating disk image using {}", executable.display());

        if !executable.is_file() {
            let message = format!("Imaging executable not found at {}", executable.display());
            error!("{}", message);
            return ImagingOutcome::failed(message);
        }

        if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
            let message = format!(
                "Failed to create output directory {}: {}",
                output_dir.display(),
                e
            );
            error!("{}", message);
            return ImagingOutcome::failed(message);
        }

        let output_file = output_dir.join(image_file_name(Local::now()));

        let outcome = match self.run(executable, &output_file).await {
            Ok(outcome) => outcome,
            Err(e) => ImagingOutcome::failed(format!("Error creating disk image: {}", e)),
        };

        if outcome.success {
            info!("{}", outcome.message);
        } else {
            error!("{}", outcome.message);
        }
        outcome
    }

    async fn run(&self, executable: &Path, output_file: &Path) -> io::Result<ImagingOutcome> {
        let mut child = Command::new(executable)
            .arg("/O")
            .arg(output_file)
            .arg("/Q")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let (tx, rx) = mpsc::channel(OUTPUT_CHANNEL_CAPACITY);
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(forward_lines(stdout, OutputStream::Stdout, tx.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(forward_lines(stderr, OutputStream::Stderr, tx.clone())));
        }
        drop(tx);
        let drain = tokio::spawn(drain_output(rx));

        let waited = match self.deadline {
            None => Some(child.wait().await),
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => Some(status),
                Err(_) => {
                    child.kill().await?;
                    None
                }
            },
        };

        let grace = waited.is_none().then_some(OUTPUT_GRACE);
        join_output(readers, drain, grace).await;

        let status: ExitStatus = match waited {
            Some(status) => status?,
            None => {
                let limit = self.deadline.unwrap_or_default();
                return Ok(ImagingOutcome::failed(format!(
                    "Imaging process timed out after {:?} and was terminated",
                    limit
                )));
            }
        };

        Ok(match status.code() {
            Some(0) => ImagingOutcome::succeeded(format!(
                "Disk image created successfully at {}",
                output_file.display()
            )),
            Some(code) => {
                ImagingOutcome::failed(format!("Imaging process exited with code {}", code))
            }
            None => ImagingOutcome::failed("Imaging process terminated without an exit code"),
        })
    }
}

/// Read `reader` line by line and push non-empty lines into the channel.
/// Invalid UTF-8 is replaced rather than aborting the read.
async fn forward_lines<R>(reader: R, stream: OutputStream, tx: mpsc::Sender<OutputLine>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf).trim_end().to_string();
                if text.is_empty() {
                    continue;
                }
                if tx.send(OutputLine { stream, text }).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Stopped reading imaging tool {:?}: {}", stream, e);
                break;
            }
        }
    }
}

async fn drain_output(mut rx: mpsc::Receiver<OutputLine>) -> usize {
    let mut forwarded = 0;
    while let Some(line) = rx.recv().await {
        match line.stream {
            OutputStream::Stdout => info!("Imaging tool output: {}", line.text),
            OutputStream::Stderr => error!("Imaging tool error: {}", line.text),
        }
        forwarded += 1;
    }
    forwarded
}

/// Wait for the readers, then the drain. With a `grace` limit, readers still
/// running when it expires are aborted; that drops their senders and lets the
/// drain finish.
async fn join_output(
    readers: Vec<JoinHandle<()>>,
    drain: JoinHandle<usize>,
    grace: Option<Duration>,
) {
    let aborts: Vec<_> = readers.iter().map(JoinHandle::abort_handle).collect();
    let wait_readers = async move {
        for reader in readers {
            match reader.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => debug!("Output reader aborted"),
                Err(e) => debug!("Output reader task failed: {}", e),
            }
        }
    };

    match grace {
        None => wait_readers.await,
        Some(limit) => {
            if tokio::time::timeout(limit, wait_readers).await.is_err() {
                warn!("Imaging tool output still open {:?} after kill, abandoning it", limit);
                for handle in aborts {
                    handle.abort();
                }
            }
        }
    }
    match drain.await {
        Ok(lines) => debug!("Forwarded {} imaging tool output lines", lines),
        Err(e) => debug!("Output drain task failed: {}", e),
    }
}
