mod common;

use common::fixtures::*;
use common::{GeneratedPdf, TestResult, init_logging};
use offerdoc::{
    Block, BlockFailure, Composer, DocumentContext, DraftOutcome, InclusionOptions, RenderElement,
    RunLimits, TextRole, standard_blocks,
};
use std::sync::Arc;

const OPTIONAL_BLOCKS: [&str; 5] = ["key_metrics", "components", "financing", "charts", "terms"];

fn draft(composer: &Composer, ctx: &DocumentContext) -> DraftOutcome {
    composer
        .compose_draft(ctx, &RunLimits::unlimited())
        .expect("context is valid")
}

/// Elements of `outcome` with the named block's contribution cut out
fn without_block(outcome: &DraftOutcome, block: &str) -> Vec<RenderElement> {
    let mut offset = 0;
    for contribution in &outcome.contributions {
        if contribution.block == block {
            let mut elements = outcome.elements().to_vec();
            elements.drain(offset..offset + contribution.element_count);
            return elements;
        }
        offset += contribution.element_count;
    }
    panic!("block '{}' contributed nothing", block);
}

struct AlwaysFails;

impl Block for AlwaysFails {
    fn name(&self) -> &'static str {
        "always_fails"
    }

    fn render(&self, _ctx: &DocumentContext) -> Result<Vec<RenderElement>, BlockFailure> {
        Err(BlockFailure::MissingData("nothing to show".into()))
    }
}

#[test]
fn test_repeated_composition_is_identical() -> TestResult {
    init_logging();
    let composer = composer();
    let ctx = context(full_request("r-1"));
    let first = draft(&composer, &ctx);
    let second = draft(&composer, &ctx);
    assert_eq!(first.elements(), second.elements());

    let a = composer.generate(&ctx, &RunLimits::unlimited());
    let b = composer.generate(&ctx, &RunLimits::unlimited());
    assert_eq!(a.document(), b.document());
    Ok(())
}

#[test]
fn test_every_standard_block_contributes_for_full_data() -> TestResult {
    let outcome = draft(&composer(), &context(full_request("r-1")));
    let names: Vec<&str> = outcome.contributions.iter().map(|c| c.block).collect();
    let expected: Vec<&str> = standard_blocks().iter().map(|b| b.name()).collect();
    assert_eq!(names, expected);
    assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
    assert_eq!(outcome.error_marker_count(), 0);
    Ok(())
}

#[test]
fn test_required_block_survives_any_inclusion_options() -> TestResult {
    let composer = composer();
    let mut flags = vec![InclusionOptions::new().with("cover", false)];
    let mut all_off = InclusionOptions::new();
    for block in OPTIONAL_BLOCKS {
        all_off.set(block, false);
        flags.push(InclusionOptions::new().with(block, false));
    }
    flags.push(all_off);

    for options in flags {
        let mut request = full_request("r-1");
        request.inclusion_options = options;
        let outcome = draft(&composer, &context(request));
        let cover = outcome.contribution("cover").expect("cover always renders");
        assert!(cover.element_count >= 1);
        assert!(!cover.failed);
    }
    Ok(())
}

#[test]
fn test_required_block_survives_sparse_project_data() -> TestResult {
    let mut request = full_request("r-1");
    if let Some(project) = request.project_data.as_mut() {
        *project = Default::default();
    }
    request.analysis_results = None;
    let outcome = draft(&composer(), &context(request));
    assert!(outcome.contribution("cover").is_some_and(|c| c.element_count >= 1));
    assert_eq!(outcome.warnings.len(), 3, "{:?}", outcome.warnings);
    Ok(())
}

#[test]
fn test_excluding_a_block_removes_exactly_its_elements() -> TestResult {
    let composer = composer();
    let baseline = draft(&composer, &context(full_request("r-1")));

    for block in OPTIONAL_BLOCKS {
        let mut request = full_request("r-1");
        request.inclusion_options = InclusionOptions::new().with(block, false);
        let excluded = draft(&composer, &context(request));
        assert_eq!(
            excluded.elements(),
            without_block(&baseline, block).as_slice(),
            "excluding '{}' changed other blocks",
            block
        );
        assert!(excluded.skipped.contains(&block));
    }
    Ok(())
}

#[test]
fn test_explicitly_included_blocks_match_the_default() -> TestResult {
    let composer = composer();
    let baseline = draft(&composer, &context(full_request("r-1")));
    let mut request = full_request("r-1");
    let mut options = InclusionOptions::new();
    for block in OPTIONAL_BLOCKS {
        options.set(block, true);
    }
    request.inclusion_options = options;
    assert_eq!(draft(&composer, &context(request)).elements(), baseline.elements());
    Ok(())
}

#[test]
fn test_financing_exclusion_removes_four_elements() -> TestResult {
    let composer = composer();
    let baseline = draft(&composer, &context(full_request("r-1")));
    let mut request = full_request("r-1");
    request.inclusion_options = InclusionOptions::new().with("financing", false);
    let excluded = draft(&composer, &context(request));

    assert_eq!(baseline.contribution("financing").map(|c| c.element_count), Some(4));
    assert_eq!(excluded.elements().len(), baseline.elements().len() - 4);
    Ok(())
}

#[test]
fn test_failing_block_is_isolated_in_the_pdf() -> TestResult {
    init_logging();
    let mut blocks = standard_blocks();
    blocks.insert(2, Arc::new(AlwaysFails));
    let composer = Composer::builder()
        .with_blocks(blocks)
        .with_backend(offerdoc::BackendAdapter::detect(false))
        .build()?;
    let ctx = context(full_request("r-1"));

    let outcome = draft(&composer, &ctx);
    assert_eq!(outcome.error_marker_count(), 1);
    let healthy = draft(&self::composer(), &ctx);
    let kept: Vec<&RenderElement> = outcome
        .elements()
        .iter()
        .filter(|e| !e.is_error_marker())
        .collect();
    assert_eq!(kept, healthy.elements().iter().collect::<Vec<_>>());

    let result = composer.generate(&ctx, &RunLimits::unlimited());
    assert!(result.is_success());
    assert!(result.diagnostics.iter().any(|d| d.contains("always_fails")));
    let pdf = GeneratedPdf::from_bytes(result.document().unwrap().to_vec())?;
    assert_valid_pdf!(&pdf.bytes);
    assert_pdf_contains_text!(pdf, "always_fails");
    assert_pdf_contains_text!(pdf, "Anna Schmidt");
    assert_pdf_contains_text!(pdf, "Loan 10y");
    Ok(())
}

#[test]
fn test_error_marker_text_comes_from_the_catalogue() -> TestResult {
    let composer = Composer::builder()
        .with_standard_blocks()
        .with_block(Arc::new(AlwaysFails))
        .without_backend()
        .build()?;
    let mut request = full_request("r-1");
    if let Some(texts) = request.texts.as_mut() {
        texts.insert("error.block_failed", "Abschnitt {block} fehlt");
    }
    let outcome = draft(&composer, &context(request));
    let marker = outcome.elements().last().unwrap();
    assert_eq!(
        marker,
        &RenderElement::text("Abschnitt always_fails fehlt", TextRole::Error)
    );
    Ok(())
}

#[test]
fn test_full_document_renders_all_sections() -> TestResult {
    init_logging();
    let result = composer().generate(&context(full_request("r-1")), &RunLimits::unlimited());
    assert!(result.is_success(), "{:?}", result.diagnostics);
    let pdf = GeneratedPdf::from_bytes(result.document().unwrap().to_vec())?;
    assert_valid_pdf!(&pdf.bytes);
    assert_pdf_contains_text!(pdf, "Your solar offer");
    assert_pdf_contains_text!(pdf, "Financing options");
    assert_pdf_contains_text!(pdf, "Sunworks GmbH");
    assert_pdf_contains_text!(pdf, "Page 1 of");
    assert!(common::pdf_assertions::image_xobject_count(&pdf.doc) >= 2);
    Ok(())
}
