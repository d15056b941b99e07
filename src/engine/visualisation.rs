use std::collections::VecDeque;

use tracing::{error, info};

use crate::consent::ConsentForm;
use crate::engine::router::PageResolver;
use crate::wire::{FileRef, Page, Payload, PromptBody};

/// Rendering seam. A real implementation displays the page, stashes the
/// resolver, and calls it when the user acts; nothing here prescribes how
/// pages look.
pub trait VisualisationEngine: Send {
    /// Display the page; call `resolver.resolve` exactly once, whenever
    /// the interaction completes.
    fn render(&mut self, page: Page, resolver: PageResolver);
}

/// Visualisation without a display, for unattended runs and tests.
///
/// File prompts hand out the configured files in order and skip once
/// exhausted; confirm prompts decline; consent forms are parsed,
/// serialized unedited, and donated. Consent failures cancel the form
/// rather than submitting a partial bundle.
pub struct HeadlessVisualisation {
    files: VecDeque<FileRef>,
    locale: String,
}

impl HeadlessVisualisation {
    pub fn new(files: Vec<FileRef>, locale: impl Into<String>) -> Self {
        Self {
            files: files.into(),
            locale: locale.into(),
        }
    }
}

impl VisualisationEngine for HeadlessVisualisation {
    fn render(&mut self, page: Page, resolver: PageResolver) {
        match page {
            Page::Splash => resolver.resolve(Payload::Void),
            Page::End => {
                info!("flow reached the end page");
                resolver.resolve(Payload::Void);
            }
            Page::Donation(page) => match page.body {
                PromptBody::FileInput(_) => match self.files.pop_front() {
                    Some(file) => {
                        info!(platform = %page.platform, file = %file.name, "offering file");
                        resolver.resolve(Payload::File { value: file });
                    }
                    None => resolver.resolve(Payload::False),
                },
                PromptBody::Confirm(_) => resolver.resolve(Payload::False),
                PromptBody::ConsentForm(prompt) => {
                    match ConsentForm::from_prompt(&prompt, &self.locale)
                        .and_then(|form| form.serialize())
                    {
                        Ok(bundle) => resolver.resolve(Payload::Json { value: bundle }),
                        Err(e) => {
                            error!(error = %e, "consent form rejected; cancelling");
                            resolver.resolve(Payload::False);
                        }
                    }
                }
            },
        }
    }
}
