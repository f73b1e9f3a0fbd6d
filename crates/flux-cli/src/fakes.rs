//! In-memory [`ProcessRunner`] fake (testing only)
//!
//! `ScriptedRunner` records every invocation and answers from a queue of
//! scripted outputs, so callers can test against `Flux` without a flux
//! binary or a cluster.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::FluxError;
use crate::runner::{ProcessOutput, ProcessRunner};
use crate::Result;

/// One recorded call to [`ScriptedRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
enum Reply {
    Output(ProcessOutput),
    /// Never exits; only cancellation ends the call
    Hang,
}

/// Runner that replays scripted outputs.
///
/// Replies are consumed in order; once the queue is empty every call gets the
/// fallback (exit code 0, no output, unless changed with [`Self::with_fallback`]).
#[derive(Debug)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: Mutex<Vec<Invocation>>,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Reply::Output(ProcessOutput::new(0, "")),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner whose every call returns `exit_code` and `output`.
    pub fn always(exit_code: i32, output: &str) -> Self {
        Self::new().with_fallback(exit_code, output)
    }

    /// Runner whose every call blocks until cancelled.
    pub fn hanging() -> Self {
        Self {
            fallback: Reply::Hang,
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, exit_code: i32, output: &str) -> Self {
        self.fallback = Reply::Output(ProcessOutput::new(exit_code, output));
        self
    }

    /// Queue a reply for the next unanswered call.
    pub fn push_reply(&self, exit_code: i32, output: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Output(ProcessOutput::new(exit_code, output)));
    }

    /// Every invocation so far, oldest first.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        cancel: Option<&CancellationToken>,
    ) -> Result<ProcessOutput> {
        let operation = args.first().cloned().unwrap_or_default();
        if cancel.is_some_and(|token| token.is_cancelled()) {
            return Err(FluxError::Cancelled { operation });
        }

        self.calls.lock().unwrap().push(Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::Output(output) => Ok(output),
            Reply::Hang => match cancel {
                Some(token) => {
                    token.cancelled().await;
                    Err(FluxError::Cancelled { operation })
                }
                None => std::future::pending().await,
            },
        }
    }
}
