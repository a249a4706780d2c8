use chrono::{DateTime, Utc};
use offerdoc_idf::RenderElement;
use offerdoc_style::Theme;
use offerdoc_types::{PageMetrics, SharedData};
use std::collections::HashMap;
use std::sync::Arc;

/// Values written to the document information dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub subject: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// Company identity shown by page decorations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageBranding {
    pub company_name: String,
    /// Key into [`DocumentDraft::resources`].
    pub logo: Option<String>,
    /// Footer contact line, already formatted.
    pub contact_line: Option<String>,
}

/// The ordered element list of one document plus what the backend needs to
/// build it. Grown append-only by the composer, then consumed by a backend.
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    elements: Vec<RenderElement>,
    pub resources: HashMap<String, SharedData>,
    pub metadata: DocumentMetadata,
    pub branding: PageBranding,
    pub theme: Arc<Theme>,
    pub page_metrics: PageMetrics,
}

impl DocumentDraft {
    pub fn new(theme: Arc<Theme>, page_metrics: PageMetrics) -> Self {
        Self {
            elements: Vec::new(),
            resources: HashMap::new(),
            metadata: DocumentMetadata::default(),
            branding: PageBranding::default(),
            theme,
            page_metrics,
        }
    }

    pub fn push(&mut self, element: RenderElement) {
        self.elements.push(element);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = RenderElement>) {
        self.elements.extend(elements);
    }

    pub fn add_resource(&mut self, key: impl Into<String>, data: SharedData) {
        self.resources.insert(key.into(), data);
    }

    pub fn elements(&self) -> &[RenderElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<RenderElement> {
        self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
