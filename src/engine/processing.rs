use tokio::sync::mpsc;
use tracing::{error, info};

use crate::engine::error::EngineError;
use crate::engine::router::CommandRouter;
use crate::engine::sink::DonationSink;
use crate::engine::visualisation::VisualisationEngine;
use crate::sandbox::{CycleOutcome, SandboxRuntime};
use crate::session::Session;
use crate::wire::{Payload, Response};

/// Engine lifecycle states. Commands and responses strictly alternate:
/// `Ready` means the engine is waiting on the UI, `CycleInFlight` means
/// the script is running and nothing may be resumed into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Initialising,
    Ready,
    CycleInFlight,
    Terminated,
}

enum CycleInput {
    Start,
    Resume(Payload),
}

/// Owns one session's lifecycle and drives the sandbox through run
/// cycles.
///
/// The engine owns its [`SandboxRuntime`] outright; there is no shared or
/// global handle to the sandbox. At most one cycle is in flight at any
/// time, and a response arriving while the script runs is a fatal
/// protocol violation, never queued.
pub struct ProcessingEngine<R: SandboxRuntime> {
    session: Session,
    runtime: R,
    router: CommandRouter,
    response_rx: mpsc::Receiver<Response>,
    state: EngineState,
}

impl<R: SandboxRuntime> ProcessingEngine<R> {
    pub fn new(
        runtime: R,
        visualisation: Box<dyn VisualisationEngine>,
        sink: Box<dyn DonationSink>,
    ) -> Self {
        let (response_tx, response_rx) = mpsc::channel(4);
        Self {
            session: Session::new(),
            runtime,
            router: CommandRouter::new(visualisation, sink, response_tx),
            response_rx,
            state: EngineState::Idle,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Drive the session from bootstrap to script completion.
    ///
    /// Blocks (asynchronously) for as long as the script and the user
    /// keep the dialogue going; there is no timeout. On a protocol
    /// violation the method returns the error and the session is dead.
    pub async fn run(&mut self) -> Result<(), EngineError> {
        if self.state != EngineState::Idle {
            return Err(EngineError::ProtocolViolation(
                "engine already started".to_string(),
            ));
        }

        self.state = EngineState::Initialising;
        self.runtime.initialise().await?;
        self.state = EngineState::Ready;
        info!(session = %self.session.id(), "sandbox initialised, starting script");

        let mut outcome = self.drive_cycle(CycleInput::Start).await?;
        loop {
            let command = match outcome {
                CycleOutcome::Suspended(command) => command,
                CycleOutcome::Finished => break,
            };

            self.state = EngineState::Ready;
            self.router.route(command);

            let response = match self.response_rx.recv().await {
                Some(response) => response,
                None => return Err(EngineError::VisualisationGone),
            };
            let payload = self.on_response(response)?;
            outcome = self.drive_cycle(CycleInput::Resume(payload)).await?;
        }

        self.state = EngineState::Terminated;
        info!(session = %self.session.id(), "session complete");
        Ok(())
    }

    /// Accept the response that resolves the current prompt. Legal only
    /// in `Ready`; anything else is a protocol violation.
    pub fn on_response(&mut self, response: Response) -> Result<Payload, EngineError> {
        if self.state != EngineState::Ready {
            error!(
                state = ?self.state,
                prompt = response.prompt.value(),
                "response delivered while no prompt was awaiting one"
            );
            return Err(EngineError::ProtocolViolation(format!(
                "response for prompt {} delivered in state {:?}",
                response.prompt.value(),
                self.state
            )));
        }
        self.state = EngineState::CycleInFlight;
        Ok(response.payload)
    }

    /// Run one cycle to its next suspension point while watching for
    /// stray responses. The sandbox has exactly one continuation point,
    /// so a response arriving mid-cycle is fatal.
    async fn drive_cycle(&mut self, input: CycleInput) -> Result<CycleOutcome, EngineError> {
        self.state = EngineState::CycleInFlight;

        let Self {
            runtime,
            response_rx,
            session,
            ..
        } = self;
        let mut cycle = match input {
            CycleInput::Start => runtime.start(session.id().clone()),
            CycleInput::Resume(payload) => runtime.resume(payload),
        };

        let mut ui_gone = false;
        loop {
            tokio::select! {
                outcome = &mut cycle => return Ok(outcome?),
                stray = response_rx.recv(), if !ui_gone => match stray {
                    Some(stray) => {
                        error!(
                            prompt = stray.prompt.value(),
                            "response arrived while a cycle was in flight"
                        );
                        return Err(EngineError::ProtocolViolation(format!(
                            "response for prompt {} arrived while a cycle was in flight",
                            stray.prompt.value()
                        )));
                    }
                    // The UI went away; the script may still finish the
                    // current cycle on its own.
                    None => ui_gone = true,
                },
            }
        }
    }
}
