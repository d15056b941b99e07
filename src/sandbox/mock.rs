//! Mock sandbox runtime for deterministic testing.
//!
//! Implements [`SandboxRuntime`] by replaying a pre-configured command
//! sequence instead of hosting a real script, and captures every payload
//! resumed into it for later verification.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::sandbox::error::SandboxError;
use crate::sandbox::runtime::{CycleOutcome, SandboxRuntime};
use crate::session::SessionId;
use crate::wire::{Command, Payload};

/// Scripted sandbox: suspends on each configured command in order, then
/// reports completion.
pub struct MockSandbox {
    commands: VecDeque<Command>,
    resumed: Arc<Mutex<Vec<Payload>>>,
    started_sessions: Arc<Mutex<Vec<SessionId>>>,
    fail_on_initialise: Option<String>,
    initialised: bool,
    started: bool,
    suspended: bool,
}

impl MockSandbox {
    pub fn new() -> Self {
        Self {
            commands: VecDeque::new(),
            resumed: Arc::new(Mutex::new(Vec::new())),
            started_sessions: Arc::new(Mutex::new(Vec::new())),
            fail_on_initialise: None,
            initialised: false,
            started: false,
            suspended: false,
        }
    }

    /// Configure the commands to suspend on, in order.
    pub fn with_commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = commands.into();
        self
    }

    /// Configure bootstrap to fail with the given error text.
    pub fn failing_initialise(mut self, error: impl Into<String>) -> Self {
        self.fail_on_initialise = Some(error.into());
        self
    }

    /// Handle to the payloads resumed so far; clone before moving the
    /// mock into an engine.
    pub fn resumed_payloads(&self) -> Arc<Mutex<Vec<Payload>>> {
        Arc::clone(&self.resumed)
    }

    /// Handle to the session ids `start` was called with.
    pub fn started_sessions(&self) -> Arc<Mutex<Vec<SessionId>>> {
        Arc::clone(&self.started_sessions)
    }

    fn next_outcome(&mut self) -> CycleOutcome {
        match self.commands.pop_front() {
            Some(command) => {
                self.suspended = true;
                CycleOutcome::Suspended(command)
            }
            None => CycleOutcome::Finished,
        }
    }
}

impl Default for MockSandbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SandboxRuntime for MockSandbox {
    async fn initialise(&mut self) -> Result<(), SandboxError> {
        if self.initialised {
            return Err(SandboxError::AlreadyInitialised);
        }
        if let Some(error) = self.fail_on_initialise.take() {
            return Err(SandboxError::ScriptFailed(error));
        }
        self.initialised = true;
        Ok(())
    }

    async fn start(&mut self, session_id: SessionId) -> Result<CycleOutcome, SandboxError> {
        if !self.initialised {
            return Err(SandboxError::NotInitialised);
        }
        if self.started {
            return Err(SandboxError::AlreadyStarted);
        }
        self.started = true;
        self.started_sessions.lock().push(session_id);
        Ok(self.next_outcome())
    }

    async fn resume(&mut self, payload: Payload) -> Result<CycleOutcome, SandboxError> {
        if !self.suspended {
            return Err(SandboxError::NoPendingCycle);
        }
        self.suspended = false;
        self.resumed.lock().push(payload);
        Ok(self.next_outcome())
    }
}
