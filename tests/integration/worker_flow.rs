//! Full-stack sessions over the real worker sandbox.
//!
//! The script runs on its own thread behind the JSON message protocol;
//! these tests drive whole sessions through the engine and observe only
//! what crosses the boundaries.

use std::fs;
use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use datapledge::flows::DemoFlow;
use datapledge::wire::{
    DonationPage, FileInputPrompt, Page, PageFooter, PageHeader, PromptBody, Translatable,
};
use datapledge::{
    Command, DonationScript, FileRef, HeadlessVisualisation, MemorySink, Payload,
    ProcessingEngine, ScriptStep, SessionId, WorkerSandbox,
};

fn sample_file(dir: &std::path::Path, name: &str, contents: &[u8]) -> FileRef {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    FileRef::from_path(path)
}

#[tokio::test]
async fn demo_flow_donates_the_reviewed_summary() {
    let dir = tempfile::tempdir().unwrap();
    let file = sample_file(dir.path(), "export.txt", b"one\ntwo\nthree\n");

    let sandbox = WorkerSandbox::new(|| Box::new(DemoFlow::new("Files")));
    let visualisation = HeadlessVisualisation::new(vec![file], "en");
    let sink = MemorySink::new();
    let submissions = sink.clone();

    let mut engine = ProcessingEngine::new(sandbox, Box::new(visualisation), Box::new(sink));
    engine.run().await.unwrap();

    let submissions = submissions.submissions();
    assert_eq!(submissions.len(), 1);
    let (key, body) = &submissions[0];
    assert_eq!(key, "Files");

    let bundle: Vec<serde_json::Value> = serde_json::from_str(body).unwrap();
    assert_eq!(bundle.len(), 3);

    let summary = bundle[0]["files_file_summary"].as_array().unwrap();
    assert_eq!(summary.len(), 4);
    assert_eq!(summary[0], serde_json::json!({"Property": "name", "Value": "export.txt"}));
    assert_eq!(summary[2]["Property"], "line_count");
    assert_eq!(summary[2]["Value"], "3");

    let log = bundle[1]["files_inspection_log"].as_array().unwrap();
    assert_eq!(log.len(), 2);

    let omissions: Vec<String> =
        serde_json::from_str(bundle[2]["user_omissions"].as_str().unwrap()).unwrap();
    assert!(omissions.is_empty());
}

#[tokio::test]
async fn demo_flow_without_a_file_donates_nothing() {
    let sandbox = WorkerSandbox::new(|| Box::new(DemoFlow::new("Files")));
    let visualisation = HeadlessVisualisation::new(vec![], "en");
    let sink = MemorySink::new();
    let submissions = sink.clone();

    let mut engine = ProcessingEngine::new(sandbox, Box::new(visualisation), Box::new(sink));
    engine.run().await.unwrap();

    assert!(submissions.submissions().is_empty());
}

/// Prompts for a file a fixed number of times and records every payload
/// the worker delivers.
struct CollectPaths {
    received: Arc<Mutex<Vec<String>>>,
    prompts_left: u32,
}

impl CollectPaths {
    fn file_prompt() -> Command {
        Command::RenderPage {
            page: Page::Donation(DonationPage {
                platform: "Test".into(),
                header: PageHeader {
                    title: Translatable::new("en", "Test"),
                },
                body: PromptBody::FileInput(FileInputPrompt {
                    description: Translatable::new("en", "Choose a file"),
                    extensions: "text/plain".into(),
                }),
                footer: PageFooter { progress: 0.0 },
            }),
        }
    }
}

impl DonationScript for CollectPaths {
    fn start(&mut self, _session_id: &SessionId) -> ScriptStep {
        self.prompts_left -= 1;
        ScriptStep::Suspend(Self::file_prompt())
    }

    fn resume(&mut self, payload: Payload) -> ScriptStep {
        if let Payload::String { value } = payload {
            self.received.lock().push(value);
        }
        if self.prompts_left > 0 {
            self.prompts_left -= 1;
            ScriptStep::Suspend(Self::file_prompt())
        } else {
            ScriptStep::Finished
        }
    }
}

#[tokio::test]
async fn sequential_file_payloads_mount_at_distinct_paths() {
    let dir = tempfile::tempdir().unwrap();
    let file = sample_file(dir.path(), "export.zip", b"zipbytes");

    let received = Arc::new(Mutex::new(Vec::new()));
    let script_received = Arc::clone(&received);
    let sandbox = WorkerSandbox::new(move || {
        Box::new(CollectPaths {
            received: script_received,
            prompts_left: 2,
        })
    });

    let visualisation = HeadlessVisualisation::new(vec![file.clone(), file], "en");
    let mut engine =
        ProcessingEngine::new(sandbox, Box::new(visualisation), Box::new(MemorySink::new()));
    engine.run().await.unwrap();

    let paths = received.lock().clone();
    assert_eq!(paths.len(), 2);
    assert_ne!(paths[0], paths[1]);

    // Both mounts carry the source bytes; the scratch tree lives as long
    // as the sandbox does.
    assert_eq!(fs::read(&paths[0]).unwrap(), b"zipbytes");
    assert_eq!(fs::read(&paths[1]).unwrap(), b"zipbytes");
    drop(engine);
}
