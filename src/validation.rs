use crate::context::DocumentContext;
use crate::error::FatalContextError;

/// Non-fatal findings of the validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

/// Checks a context before composition. Fatal problems abort the document;
/// everything else only degrades the blocks that depend on it.
pub fn validate_context(ctx: &DocumentContext) -> Result<ValidationReport, FatalContextError> {
    let texts = ctx.texts.as_ref().ok_or(FatalContextError::MissingTexts)?;
    if texts.is_empty() {
        return Err(FatalContextError::InvalidTexts(
            "the catalogue contains no entries".to_string(),
        ));
    }
    let project = ctx
        .project
        .as_ref()
        .ok_or(FatalContextError::MissingProjectData)?;

    let mut warnings = Vec::new();
    if project.customer.display_name().is_none() {
        warnings.push("Customer name is missing".to_string());
    }
    if !project.has_module() {
        warnings.push("No module component is selected".to_string());
    }
    if ctx.analysis.is_none() {
        warnings.push("Analysis results are missing".to_string());
    }
    if let Some(requested) = &ctx.theme_fallback_from {
        warnings.push(format!(
            "Theme '{}' is unknown; the default theme '{}' was used",
            requested, ctx.theme.name
        ));
    }
    Ok(ValidationReport { warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DocumentRequest, ProjectData, TextCatalog};
    use offerdoc_style::ThemeRegistry;
    use offerdoc_types::PageMetrics;
    use std::collections::HashMap;

    fn context(request: DocumentRequest) -> std::sync::Arc<DocumentContext> {
        DocumentContext::from_request(request, &ThemeRegistry::built_in(), PageMetrics::a4())
    }

    fn texts() -> Option<TextCatalog> {
        Some(TextCatalog::from_iter([("cover.title".to_string(), "Offer".to_string())]))
    }

    #[test]
    fn missing_texts_are_fatal() {
        let ctx = context(DocumentRequest {
            project_data: Some(ProjectData::default()),
            ..DocumentRequest::default()
        });
        assert_eq!(validate_context(&ctx), Err(FatalContextError::MissingTexts));
    }

    #[test]
    fn empty_texts_are_invalid() {
        let ctx = context(DocumentRequest {
            project_data: Some(ProjectData::default()),
            texts: Some(TextCatalog::new(HashMap::new())),
            ..DocumentRequest::default()
        });
        assert!(matches!(
            validate_context(&ctx),
            Err(FatalContextError::InvalidTexts(_))
        ));
    }

    #[test]
    fn missing_project_is_fatal() {
        let ctx = context(DocumentRequest {
            texts: texts(),
            ..DocumentRequest::default()
        });
        assert_eq!(
            validate_context(&ctx),
            Err(FatalContextError::MissingProjectData)
        );
    }

    #[test]
    fn sparse_projects_only_warn() {
        let ctx = context(DocumentRequest {
            texts: texts(),
            project_data: Some(ProjectData::default()),
            ..DocumentRequest::default()
        });
        let report = validate_context(&ctx).unwrap();
        assert_eq!(report.warnings.len(), 3);
    }
}
