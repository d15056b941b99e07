use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::sandbox::{DonationScript, ScriptStep};
use crate::session::SessionId;
use crate::wire::{
    Command, ConfirmPrompt, ConsentFormPrompt, DonationPage, FileInputPrompt, Page, PageFooter,
    PageHeader, Payload, PromptBody, TableSpec, Translatable,
};

/// Demonstration flow: prompt for a file, summarize it, ask for consent,
/// donate the reviewed summary. One "platform", four steps, the same
/// dialogue shape a real platform script walks through.
pub struct DemoFlow {
    platform: String,
    state: FlowState,
}

enum FlowState {
    Created,
    AwaitingFile,
    AwaitingRetry,
    AwaitingConsent,
    AwaitingDonateAck,
    AwaitingEnd,
    Done,
}

impl DemoFlow {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            state: FlowState::Created,
        }
    }

    fn donation_page(&self, body: PromptBody, progress: f64) -> Command {
        Command::RenderPage {
            page: Page::Donation(DonationPage {
                platform: self.platform.clone(),
                header: PageHeader {
                    title: Translatable::new("en", &self.platform),
                },
                body,
                footer: PageFooter { progress },
            }),
        }
    }

    fn file_prompt(&self) -> Command {
        self.donation_page(
            PromptBody::FileInput(FileInputPrompt {
                description: Translatable::new(
                    "en",
                    format!(
                        "Choose the {} export file you stored on your device, \
                         or skip if you do not have one.",
                        self.platform
                    ),
                ),
                extensions: "application/zip, text/plain".to_string(),
            }),
            25.0,
        )
    }

    fn retry_prompt(&self) -> Command {
        self.donation_page(
            PromptBody::Confirm(ConfirmPrompt {
                text: Translatable::new(
                    "en",
                    format!("We could not process your {} file.", self.platform),
                ),
                ok: Translatable::new("en", "Try again"),
                cancel: Translatable::new("en", "Continue"),
            }),
            50.0,
        )
    }

    fn consent_prompt(&self, summary: FileSummary) -> Command {
        let head = vec!["Property".to_string(), "Value".to_string()];
        let rows = vec![
            vec!["name".to_string(), summary.name],
            vec!["size_bytes".to_string(), summary.size_bytes.to_string()],
            vec!["line_count".to_string(), summary.line_count.to_string()],
            vec!["modified".to_string(), summary.modified],
        ];
        let table = TableSpec::new(
            format!("{}_file_summary", self.platform.to_lowercase()),
            Translatable::new("en", "What we derived from your file:"),
            TableSpec::encode_frame(&head, &rows),
        );

        let log_head = vec!["Event".to_string()];
        let log_rows = summary.log.into_iter().map(|line| vec![line]).collect::<Vec<_>>();
        let meta = TableSpec::new(
            format!("{}_inspection_log", self.platform.to_lowercase()),
            Translatable::new("en", "Inspection log:"),
            TableSpec::encode_frame(&log_head, &log_rows),
        );

        self.donation_page(
            PromptBody::ConsentForm(ConsentFormPrompt {
                description: Translatable::new(
                    "en",
                    "Review the derived data below. Remove any rows you do not \
                     want to share before donating.",
                ),
                donate_question: Translatable::new("en", "Do you want to donate this data?"),
                donate_button: Translatable::new("en", "Yes, donate"),
                cancel_button: Translatable::new("en", "No"),
                tables: vec![table],
                meta_tables: vec![meta],
            }),
            75.0,
        )
    }

    fn end_page(&mut self) -> ScriptStep {
        self.state = FlowState::AwaitingEnd;
        ScriptStep::Suspend(Command::RenderPage { page: Page::End })
    }
}

impl DonationScript for DemoFlow {
    fn start(&mut self, session_id: &SessionId) -> ScriptStep {
        info!(session = %session_id, platform = %self.platform, "starting donation flow");
        self.state = FlowState::AwaitingFile;
        ScriptStep::Suspend(self.file_prompt())
    }

    fn resume(&mut self, payload: Payload) -> ScriptStep {
        match self.state {
            FlowState::AwaitingFile => match payload {
                Payload::String { value: path } => match inspect(Path::new(&path)) {
                    Ok(summary) => {
                        self.state = FlowState::AwaitingConsent;
                        ScriptStep::Suspend(self.consent_prompt(summary))
                    }
                    Err(e) => {
                        info!(error = %e, "file could not be inspected, asking to retry");
                        self.state = FlowState::AwaitingRetry;
                        ScriptStep::Suspend(self.retry_prompt())
                    }
                },
                _ => {
                    info!(platform = %self.platform, "file prompt skipped");
                    self.end_page()
                }
            },
            FlowState::AwaitingRetry => match payload {
                Payload::True => {
                    self.state = FlowState::AwaitingFile;
                    ScriptStep::Suspend(self.file_prompt())
                }
                _ => self.end_page(),
            },
            FlowState::AwaitingConsent => match payload {
                Payload::Json { value } => {
                    info!(platform = %self.platform, "consent given, donating");
                    self.state = FlowState::AwaitingDonateAck;
                    ScriptStep::Suspend(Command::Donate {
                        key: self.platform.clone(),
                        json_string: value,
                    })
                }
                _ => {
                    info!(platform = %self.platform, "consent declined");
                    self.end_page()
                }
            },
            FlowState::AwaitingDonateAck => self.end_page(),
            FlowState::AwaitingEnd | FlowState::Done | FlowState::Created => {
                self.state = FlowState::Done;
                ScriptStep::Finished
            }
        }
    }
}

struct FileSummary {
    name: String,
    size_bytes: u64,
    line_count: usize,
    modified: String,
    log: Vec<String>,
}

fn inspect(path: &Path) -> io::Result<FileSummary> {
    let metadata = fs::metadata(path)?;
    let bytes = fs::read(path)?;
    let line_count = bytes.iter().filter(|b| **b == b'\n').count();

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let modified = metadata
        .modified()
        .map(|time| DateTime::<Utc>::from(time).to_rfc3339())
        .unwrap_or_else(|_| "unknown".to_string());

    let log = vec![
        format!("opened {name}"),
        format!("measured {} bytes", metadata.len()),
    ];

    Ok(FileSummary {
        name,
        size_bytes: metadata.len(),
        line_count,
        modified,
        log,
    })
}
