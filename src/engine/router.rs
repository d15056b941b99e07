use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::engine::sink::DonationSink;
use crate::engine::visualisation::VisualisationEngine;
use crate::wire::{Command, Payload, PromptHandle, Response};

/// Interprets each command the sandbox emits.
///
/// UI commands go to the visualisation engine and resolve whenever the
/// user completes the interaction; system commands resolve immediately.
/// Unrecognized kinds are logged and dropped, which stalls the cycle by
/// design rather than crashing the session.
pub struct CommandRouter {
    visualisation: Box<dyn VisualisationEngine>,
    sink: Box<dyn DonationSink>,
    response_tx: mpsc::Sender<Response>,
    next_prompt: u64,
}

impl CommandRouter {
    pub(crate) fn new(
        visualisation: Box<dyn VisualisationEngine>,
        sink: Box<dyn DonationSink>,
        response_tx: mpsc::Sender<Response>,
    ) -> Self {
        Self {
            visualisation,
            sink,
            response_tx,
            next_prompt: 0,
        }
    }

    pub fn route(&mut self, command: Command) {
        match command {
            Command::RenderPage { page } => {
                let resolver = self.resolver();
                debug!(prompt = resolver.prompt().value(), "rendering page");
                self.visualisation.render(page, resolver);
            }
            Command::Donate { key, json_string } => {
                debug!(key = %key, bytes = json_string.len(), "forwarding donation to sink");
                if let Err(e) = self.sink.submit(&key, &json_string) {
                    error!(key = %key, error = %e, "donation sink failed");
                }
                // System commands need no user interaction; acknowledge
                // the cycle at once.
                self.resolver().resolve(Payload::Void);
            }
            Command::Unknown(value) => {
                warn!(command = %value, "unknown command kind; dropping (cycle stalls)");
            }
        }
    }

    fn resolver(&mut self) -> PageResolver {
        let prompt = PromptHandle::new(self.next_prompt);
        self.next_prompt += 1;
        PageResolver {
            prompt,
            response_tx: self.response_tx.clone(),
            fired: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Single-shot resolver for one rendered page instance.
///
/// The first `resolve` builds the response and hands it to the engine;
/// any later call (a double submit, a stale callback) is logged and
/// ignored, so one page can never produce two responses.
#[derive(Clone)]
pub struct PageResolver {
    prompt: PromptHandle,
    response_tx: mpsc::Sender<Response>,
    fired: Arc<AtomicBool>,
}

impl PageResolver {
    pub fn prompt(&self) -> PromptHandle {
        self.prompt
    }

    pub fn resolve(&self, payload: Payload) {
        if self.fired.swap(true, Ordering::SeqCst) {
            warn!(
                prompt = self.prompt.value(),
                "page resolved twice; ignoring the extra resolve"
            );
            return;
        }
        debug!(
            prompt = self.prompt.value(),
            payload = payload.kind_name(),
            "page resolved"
        );
        if self
            .response_tx
            .try_send(Response::new(self.prompt, payload))
            .is_err()
        {
            warn!(
                prompt = self.prompt.value(),
                "engine no longer accepting responses; dropping"
            );
        }
    }
}
