//! Consent-table donation bundle scenarios.
//!
//! Covers the deletion-accounting and serialization contracts end to end
//! on the consent engine, without any engine or sandbox in the loop.

use datapledge::wire::{ConsentFormPrompt, TableSpec, Translatable};
use datapledge::ConsentForm;

fn table(id: &str, head: &[&str], rows: &[&[&str]]) -> TableSpec {
    let head: Vec<String> = head.iter().map(|s| s.to_string()).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect();
    TableSpec::new(
        id,
        Translatable::new("en", id),
        TableSpec::encode_frame(&head, &rows),
    )
}

fn prompt(tables: Vec<TableSpec>, meta_tables: Vec<TableSpec>) -> ConsentFormPrompt {
    ConsentFormPrompt {
        description: Translatable::new("en", "Review"),
        donate_question: Translatable::new("en", "Donate?"),
        donate_button: Translatable::new("en", "Donate"),
        cancel_button: Translatable::new("en", "Cancel"),
        tables,
        meta_tables,
    }
}

#[test]
fn deleting_one_of_three_rows_emits_a_notice() {
    let spec = table(
        "t1",
        &["A", "B"],
        &[&["a0", "b0"], &["a1", "b1"], &["a2", "b2"]],
    );
    let mut form = ConsentForm::from_prompt(&prompt(vec![spec], vec![]), "en").unwrap();

    form.edit(
        "t1",
        vec![
            vec!["a0".into(), "b0".into()],
            vec!["a2".into(), "b2".into()],
        ],
    )
    .unwrap();
    assert_eq!(form.tables()[0].deleted_row_count(), 1);

    let bundle: Vec<serde_json::Value> = serde_json::from_str(&form.serialize().unwrap()).unwrap();
    let omissions: Vec<String> =
        serde_json::from_str(bundle.last().unwrap()["user_omissions"].as_str().unwrap()).unwrap();
    assert_eq!(omissions, ["User deleted 1 rows from table: t1"]);
}

#[test]
fn serialize_is_last_write_wins_per_table() {
    let spec = table("t1", &["A"], &[&["a0"], &["a1"]]);
    let mut form = ConsentForm::from_prompt(&prompt(vec![spec], vec![]), "en").unwrap();

    form.edit("t1", vec![vec!["first".into()]]).unwrap();
    form.edit("t1", vec![vec!["second".into()], vec!["third".into()]])
        .unwrap();

    let bundle: Vec<serde_json::Value> = serde_json::from_str(&form.serialize().unwrap()).unwrap();
    let rows = bundle[0]["t1"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["A"], "second");
    assert_eq!(rows[1]["A"], "third");

    // Net deletion across both edits: 2 - 1 = 1, then 1 - 2 = -1, total 0.
    assert_eq!(form.tables()[0].deleted_row_count(), 0);
    let omissions: Vec<String> =
        serde_json::from_str(bundle.last().unwrap()["user_omissions"].as_str().unwrap()).unwrap();
    assert!(omissions.is_empty());
}

#[test]
fn meta_tables_are_serialized_in_full_after_edits() {
    let editable = table("posts", &["Title"], &[&["one"], &["two"]]);
    let meta = table("log", &["Event"], &[&["opened"], &["scanned"]]);
    let mut form = ConsentForm::from_prompt(&prompt(vec![editable], vec![meta]), "en").unwrap();

    form.edit("posts", vec![]).unwrap();

    let bundle: Vec<serde_json::Value> = serde_json::from_str(&form.serialize().unwrap()).unwrap();
    assert_eq!(bundle.len(), 3);
    assert!(bundle[0]["posts"].as_array().unwrap().is_empty());
    assert_eq!(bundle[1]["log"].as_array().unwrap().len(), 2);

    let omissions: Vec<String> =
        serde_json::from_str(bundle[2]["user_omissions"].as_str().unwrap()).unwrap();
    assert_eq!(omissions, ["User deleted 2 rows from table: posts"]);
}

#[test]
fn notices_cover_every_table_with_positive_count() {
    let t1 = table("t1", &["A"], &[&["a"], &["b"]]);
    let t2 = table("t2", &["A"], &[&["c"]]);
    let t3 = table("t3", &["A"], &[&["d"]]);
    let mut form = ConsentForm::from_prompt(&prompt(vec![t1, t2, t3], vec![]), "en").unwrap();

    form.edit("t1", vec![]).unwrap(); // deleted 2
    form.edit("t3", vec![vec!["d".into()], vec!["e".into()]]).unwrap(); // added, -1

    let bundle: Vec<serde_json::Value> = serde_json::from_str(&form.serialize().unwrap()).unwrap();
    let omissions: Vec<String> =
        serde_json::from_str(bundle.last().unwrap()["user_omissions"].as_str().unwrap()).unwrap();
    assert_eq!(omissions, ["User deleted 2 rows from table: t1"]);
}
