//! Engine-level session flow over the mock sandbox.
//!
//! Tests the flow: scripted commands -> router -> headless visualisation
//! -> responses resumed back into the sandbox, including the consent
//! round trip driven entirely by wire values.

use datapledge::wire::{
    ConsentFormPrompt, DonationPage, FileInputPrompt, Page, PageFooter, PageHeader, PromptBody,
    TableSpec, Translatable,
};
use datapledge::{
    Command, EngineState, HeadlessVisualisation, MemorySink, MockSandbox, Payload,
    ProcessingEngine,
};

fn donation_page(body: PromptBody) -> Command {
    Command::RenderPage {
        page: Page::Donation(DonationPage {
            platform: "Twitter".into(),
            header: PageHeader {
                title: Translatable::new("en", "Twitter"),
            },
            body,
            footer: PageFooter { progress: 50.0 },
        }),
    }
}

fn consent_command() -> Command {
    let head = vec!["A".to_string(), "B".to_string()];
    let rows = vec![
        vec!["a0".to_string(), "b0".to_string()],
        vec!["a1".to_string(), "b1".to_string()],
    ];
    donation_page(PromptBody::ConsentForm(ConsentFormPrompt {
        description: Translatable::new("en", "Review"),
        donate_question: Translatable::new("en", "Donate?"),
        donate_button: Translatable::new("en", "Donate"),
        cancel_button: Translatable::new("en", "Cancel"),
        tables: vec![TableSpec::new(
            "t1",
            Translatable::new("en", "Derived data"),
            TableSpec::encode_frame(&head, &rows),
        )],
        meta_tables: vec![],
    }))
}

#[tokio::test]
async fn consent_page_resumes_with_the_serialized_bundle() {
    let sandbox = MockSandbox::new().with_commands(vec![
        consent_command(),
        Command::RenderPage { page: Page::End },
    ]);
    let resumed = sandbox.resumed_payloads();

    let visualisation = HeadlessVisualisation::new(vec![], "en");
    let mut engine =
        ProcessingEngine::new(sandbox, Box::new(visualisation), Box::new(MemorySink::new()));
    engine.run().await.unwrap();
    assert_eq!(engine.state(), EngineState::Terminated);

    let resumed = resumed.lock();
    assert_eq!(resumed.len(), 2);
    let bundle = match &resumed[0] {
        Payload::Json { value } => value.clone(),
        other => panic!("expected a json payload, got {:?}", other),
    };

    let parsed: Vec<serde_json::Value> = serde_json::from_str(&bundle).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(
        parsed[0]["t1"],
        serde_json::json!([{"A": "a0", "B": "b0"}, {"A": "a1", "B": "b1"}])
    );
    let omissions: Vec<String> =
        serde_json::from_str(parsed[1]["user_omissions"].as_str().unwrap()).unwrap();
    assert!(omissions.is_empty());

    // The end page resolves void.
    assert_eq!(resumed[1], Payload::Void);
}

#[tokio::test]
async fn file_prompts_are_skipped_once_files_run_out() {
    let file_prompt = donation_page(PromptBody::FileInput(FileInputPrompt {
        description: Translatable::new("en", "Choose a file"),
        extensions: "application/zip".into(),
    }));
    let sandbox = MockSandbox::new().with_commands(vec![file_prompt]);
    let resumed = sandbox.resumed_payloads();

    let visualisation = HeadlessVisualisation::new(vec![], "en");
    let mut engine =
        ProcessingEngine::new(sandbox, Box::new(visualisation), Box::new(MemorySink::new()));
    engine.run().await.unwrap();

    assert_eq!(*resumed.lock(), vec![Payload::False]);
}

#[tokio::test]
async fn malformed_consent_table_cancels_instead_of_donating() {
    let bad = donation_page(PromptBody::ConsentForm(ConsentFormPrompt {
        description: Translatable::new("en", "Review"),
        donate_question: Translatable::new("en", "Donate?"),
        donate_button: Translatable::new("en", "Donate"),
        cancel_button: Translatable::new("en", "Cancel"),
        tables: vec![TableSpec::new(
            "broken",
            Translatable::new("en", "broken"),
            "{not json",
        )],
        meta_tables: vec![],
    }));
    let sandbox = MockSandbox::new().with_commands(vec![bad]);
    let resumed = sandbox.resumed_payloads();

    let visualisation = HeadlessVisualisation::new(vec![], "en");
    let mut engine =
        ProcessingEngine::new(sandbox, Box::new(visualisation), Box::new(MemorySink::new()));
    engine.run().await.unwrap();

    // No partial bundle: the render aborts and the form is cancelled.
    assert_eq!(*resumed.lock(), vec![Payload::False]);
}
