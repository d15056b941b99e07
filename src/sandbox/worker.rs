use std::any::Any;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc as std_mpsc;
use std::thread;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::sandbox::error::SandboxError;
use crate::sandbox::protocol::{ResumeEnvelope, WorkerReply, WorkerRequest};
use crate::sandbox::runtime::{CycleOutcome, SandboxRuntime};
use crate::sandbox::script::{DonationScript, ScriptStep};
use crate::sandbox::vfs::ScratchFs;
use crate::session::SessionId;
use crate::wire::Payload;

type ScriptFactory = Box<dyn FnOnce() -> Box<dyn DonationScript> + Send>;

/// Hosts a [`DonationScript`] on a dedicated worker thread.
///
/// The thread is the sandbox's executor: it owns the script and its
/// scratch filesystem, and nothing else reaches them. Requests and
/// replies cross as JSON values, so the boundary carries exactly what the
/// wire protocol allows. Dropping the sandbox closes the request channel;
/// the worker observes that and exits without any graceful shutdown of an
/// in-flight routine.
pub struct WorkerSandbox {
    factory: Option<ScriptFactory>,
    channels: Option<Channels>,
    started: bool,
    suspended: bool,
}

struct Channels {
    request_tx: std_mpsc::Sender<Value>,
    reply_rx: mpsc::UnboundedReceiver<Value>,
}

impl WorkerSandbox {
    /// Build a sandbox around a script factory. The factory runs on the
    /// worker thread during `initialise`, mirroring a script package that
    /// is loaded inside the sandbox rather than shipped into it.
    pub fn new<F>(factory: F) -> Self
    where
        F: FnOnce() -> Box<dyn DonationScript> + Send + 'static,
    {
        Self {
            factory: Some(Box::new(factory)),
            channels: None,
            started: false,
            suspended: false,
        }
    }

    fn send(&self, request: WorkerRequest) -> Result<(), SandboxError> {
        let channels = self.channels.as_ref().ok_or(SandboxError::NotInitialised)?;
        let raw = serde_json::to_value(&request)?;
        channels
            .request_tx
            .send(raw)
            .map_err(|_| SandboxError::Disconnected)
    }

    async fn recv(&mut self) -> Result<WorkerReply, SandboxError> {
        let channels = self.channels.as_mut().ok_or(SandboxError::NotInitialised)?;
        let raw = channels
            .reply_rx
            .recv()
            .await
            .ok_or(SandboxError::Disconnected)?;
        Ok(serde_json::from_value(raw)?)
    }

    fn cycle_outcome(&mut self, reply: WorkerReply) -> Result<CycleOutcome, SandboxError> {
        match reply {
            WorkerReply::RunCycleDone { command } => {
                self.suspended = true;
                Ok(CycleOutcome::Suspended(command))
            }
            WorkerReply::ScriptDone => Ok(CycleOutcome::Finished),
            WorkerReply::ScriptFailed { error } => Err(SandboxError::ScriptFailed(error)),
            WorkerReply::InitialiseDone => Err(SandboxError::Protocol(
                "initialiseDone outside bootstrap".to_string(),
            )),
        }
    }
}

#[async_trait]
impl SandboxRuntime for WorkerSandbox {
    async fn initialise(&mut self) -> Result<(), SandboxError> {
        if self.channels.is_some() {
            return Err(SandboxError::AlreadyInitialised);
        }
        let factory = self
            .factory
            .take()
            .ok_or(SandboxError::AlreadyInitialised)?;

        let (request_tx, request_rx) = std_mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("datapledge-sandbox".to_string())
            .spawn(move || worker_main(factory, request_rx, reply_tx))?;
        self.channels = Some(Channels {
            request_tx,
            reply_rx,
        });

        self.send(WorkerRequest::Initialise)?;
        match self.recv().await? {
            WorkerReply::InitialiseDone => {
                info!("sandbox worker initialised");
                Ok(())
            }
            WorkerReply::ScriptFailed { error } => Err(SandboxError::ScriptFailed(error)),
            other => Err(SandboxError::Protocol(format!(
                "unexpected bootstrap reply: {other:?}"
            ))),
        }
    }

    async fn start(&mut self, session_id: SessionId) -> Result<CycleOutcome, SandboxError> {
        if self.channels.is_none() {
            return Err(SandboxError::NotInitialised);
        }
        if self.started {
            return Err(SandboxError::AlreadyStarted);
        }
        self.started = true;

        self.send(WorkerRequest::FirstRunCycle { session_id })?;
        let reply = self.recv().await?;
        self.cycle_outcome(reply)
    }

    async fn resume(&mut self, payload: Payload) -> Result<CycleOutcome, SandboxError> {
        if !self.suspended {
            return Err(SandboxError::NoPendingCycle);
        }
        self.suspended = false;

        self.send(WorkerRequest::NextRunCycle {
            response: ResumeEnvelope { payload },
        })?;
        let reply = self.recv().await?;
        self.cycle_outcome(reply)
    }
}

/// Worker thread main loop: decode each request, drive the script, reply.
fn worker_main(
    factory: ScriptFactory,
    request_rx: std_mpsc::Receiver<Value>,
    reply_tx: mpsc::UnboundedSender<Value>,
) {
    let mut factory = Some(factory);
    let mut script: Option<Box<dyn DonationScript>> = None;
    let mut scratch: Option<ScratchFs> = None;

    while let Ok(raw) = request_rx.recv() {
        let request = match serde_json::from_value::<WorkerRequest>(raw) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "rejecting malformed worker request");
                let reply = WorkerReply::ScriptFailed {
                    error: format!("malformed request: {e}"),
                };
                if reply_tx.send(reply_value(reply)).is_err() {
                    return;
                }
                continue;
            }
        };

        let reply = handle_request(request, &mut factory, &mut script, &mut scratch);
        if reply_tx.send(reply_value(reply)).is_err() {
            // Engine side went away; the session was abandoned.
            return;
        }
    }
    debug!("request channel closed; sandbox thread exiting");
}

fn handle_request(
    request: WorkerRequest,
    factory: &mut Option<ScriptFactory>,
    script: &mut Option<Box<dyn DonationScript>>,
    scratch: &mut Option<ScratchFs>,
) -> WorkerReply {
    match request {
        WorkerRequest::Initialise => {
            let Some(factory) = factory.take() else {
                return WorkerReply::ScriptFailed {
                    error: "already initialised".to_string(),
                };
            };
            match ScratchFs::new() {
                Ok(fs) => {
                    *scratch = Some(fs);
                    *script = Some(factory());
                    WorkerReply::InitialiseDone
                }
                Err(e) => WorkerReply::ScriptFailed {
                    error: format!("scratch filesystem setup failed: {e}"),
                },
            }
        }
        WorkerRequest::FirstRunCycle { session_id } => {
            let Some(script) = script.as_mut() else {
                return not_initialised();
            };
            step_reply(catch_unwind(AssertUnwindSafe(|| script.start(&session_id))))
        }
        WorkerRequest::NextRunCycle { response } => {
            let (Some(script), Some(scratch)) = (script.as_mut(), scratch.as_ref()) else {
                return not_initialised();
            };
            let payload = match deliverable(response.payload, scratch) {
                Ok(payload) => payload,
                Err(e) => {
                    return WorkerReply::ScriptFailed {
                        error: format!("file mount failed: {e}"),
                    }
                }
            };
            step_reply(catch_unwind(AssertUnwindSafe(|| script.resume(payload))))
        }
    }
}

/// A `file` payload is mounted first; the script receives the mounted
/// path as a `string` payload. The resume is only delivered once the
/// mount has completed.
fn deliverable(payload: Payload, scratch: &ScratchFs) -> io::Result<Payload> {
    match payload {
        Payload::File { value } => {
            let mounted = scratch.mount(&value)?;
            Ok(Payload::String {
                value: mounted.to_string_lossy().into_owned(),
            })
        }
        other => Ok(other),
    }
}

fn step_reply(step: thread::Result<ScriptStep>) -> WorkerReply {
    match step {
        Ok(ScriptStep::Suspend(command)) => WorkerReply::RunCycleDone { command },
        Ok(ScriptStep::Finished) => WorkerReply::ScriptDone,
        Err(panic) => WorkerReply::ScriptFailed {
            error: panic_text(panic),
        },
    }
}

fn not_initialised() -> WorkerReply {
    WorkerReply::ScriptFailed {
        error: "run cycle before initialise".to_string(),
    }
}

fn panic_text(panic: Box<dyn Any + Send>) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "script panicked".to_string())
}

fn reply_value(reply: WorkerReply) -> Value {
    serde_json::to_value(&reply).unwrap_or_else(|e| {
        serde_json::json!({"event": "scriptFailed", "error": format!("reply encode failure: {e}")})
    })
}
