mod common;

use common::fixtures::*;
use common::{GeneratedPdf, TestResult};
use std::fs;
use std::process::Command;

#[test]
fn test_cli_writes_one_pdf_per_recipient_and_a_summary() -> TestResult {
    let dir = tempfile::tempdir()?;
    let batch = dir.path().join("batch.json");
    let config = dir.path().join("config.json");
    let out = dir.path().join("out");
    fs::write(
        &batch,
        serde_json::to_string(&vec![full_request("alpha"), fatal_request("../beta")])?,
    )?;
    fs::write(&config, r#"{"concurrency_limit": 2, "compress_streams": false}"#)?;

    let status = Command::new(env!("CARGO_BIN_EXE_offerdoc"))
        .arg(&batch)
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .status()?;
    assert!(status.success());

    let alpha = GeneratedPdf::from_bytes(fs::read(out.join("alpha.pdf"))?)?;
    assert_pdf_contains_text!(alpha, "Your solar offer");
    // The unsafe id is flattened into the output directory.
    assert_valid_pdf!(&fs::read(out.join("___beta.pdf"))?);

    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("summary.json"))?)?;
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["succeeded"], 1);
    assert_eq!(summary["stubs"], 1);
    Ok(())
}

#[test]
fn test_cli_fails_on_unreadable_batch() -> TestResult {
    let dir = tempfile::tempdir()?;
    let status = Command::new(env!("CARGO_BIN_EXE_offerdoc"))
        .arg(dir.path().join("missing.json"))
        .arg(dir.path().join("out"))
        .status()?;
    assert!(!status.success());
    Ok(())
}

#[test]
fn test_cli_keeps_every_document_when_ids_flatten_to_the_same_name() -> TestResult {
    let dir = tempfile::tempdir()?;
    let batch = dir.path().join("batch.json");
    let config = dir.path().join("config.json");
    let out = dir.path().join("out");
    fs::write(
        &batch,
        serde_json::to_string(&vec![full_request("a.b"), fatal_request("a_b")])?,
    )?;
    fs::write(&config, r#"{"compress_streams": false}"#)?;

    let status = Command::new(env!("CARGO_BIN_EXE_offerdoc"))
        .arg(&batch)
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .status()?;
    assert!(status.success());

    let mut pdfs: Vec<String> = fs::read_dir(&out)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".pdf"))
        .collect();
    pdfs.sort();
    assert_eq!(pdfs, vec!["a_b-2.pdf", "a_b.pdf"]);

    let first = GeneratedPdf::from_bytes(fs::read(out.join("a_b.pdf"))?)?;
    assert_pdf_contains_text!(first, "Your solar offer");
    assert_valid_pdf!(&fs::read(out.join("a_b-2.pdf"))?);
    Ok(())
}
