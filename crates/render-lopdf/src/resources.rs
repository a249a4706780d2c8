use offerdoc_idf::{ImageSource, RenderElement};
use offerdoc_render_core::{Diagnostic, DiagnosticKind};
use offerdoc_style::TextRole;
use offerdoc_types::SharedData;
use std::collections::{BTreeMap, HashMap};

/// An image decoded to 8-bit RGB, ready to become an XObject.
pub(crate) struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Result of checking every image a document references before layout.
pub(crate) struct ResolvedResources {
    pub elements: Vec<RenderElement>,
    /// Decoded images by resource key, ordered so object numbering is stable.
    pub images: BTreeMap<String, DecodedImage>,
    pub diagnostics: Vec<Diagnostic>,
}

pub(crate) fn decode_image(data: &[u8]) -> Result<DecodedImage, String> {
    let decoded = image::load_from_memory(data).map_err(|e| e.to_string())?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err("image has no pixels".to_string());
    }
    Ok(DecodedImage {
        width,
        height,
        rgb: rgb.into_raw(),
    })
}

/// Decodes every referenced image. Images that are missing or cannot be
/// decoded are replaced by a placeholder text and reported; inline images are
/// turned into references so the page content only ever names resources.
pub(crate) fn resolve_resources(
    elements: Vec<RenderElement>,
    resources: &HashMap<String, SharedData>,
    extra_keys: &[String],
) -> ResolvedResources {
    let mut resolver = Resolver {
        resources,
        images: BTreeMap::new(),
        failed: HashMap::new(),
        diagnostics: Vec::new(),
        inline_count: 0,
    };
    for key in extra_keys {
        resolver.load_key(key);
    }
    let elements = elements.into_iter().map(|el| resolver.resolve(el)).collect();
    ResolvedResources {
        elements,
        images: resolver.images,
        diagnostics: resolver.diagnostics,
    }
}

struct Resolver<'a> {
    resources: &'a HashMap<String, SharedData>,
    images: BTreeMap<String, DecodedImage>,
    failed: HashMap<String, String>,
    diagnostics: Vec<Diagnostic>,
    inline_count: usize,
}

impl Resolver<'_> {
    fn resolve(&mut self, element: RenderElement) -> RenderElement {
        match element {
            RenderElement::Image {
                source,
                width,
                height,
                caption,
            } => {
                let outcome = match source {
                    ImageSource::Bytes(data) => {
                        self.inline_count += 1;
                        let key = format!("inline-{}", self.inline_count);
                        self.decode_into(&key, &data).map(|_| key)
                    }
                    ImageSource::Reference(key) => self.load_key(&key).map(|_| key),
                };
                match outcome {
                    Ok(key) => RenderElement::Image {
                        source: ImageSource::Reference(key),
                        width,
                        height,
                        caption,
                    },
                    Err(reason) => {
                        let label = caption.as_deref().unwrap_or("image");
                        log::warn!("[BACKEND] Image '{}' unusable, using placeholder: {}", label, reason);
                        self.diagnostics.push(Diagnostic::new(
                            DiagnosticKind::ElementResource,
                            format!("Image '{}' replaced by placeholder: {}", label, reason),
                        ));
                        RenderElement::text(format!("[Image unavailable: {}]", label), TextRole::Small)
                    }
                }
            }
            RenderElement::Group(children) => {
                RenderElement::Group(children.into_iter().map(|c| self.resolve(c)).collect())
            }
            other => other,
        }
    }

    fn load_key(&mut self, key: &str) -> Result<(), String> {
        if self.images.contains_key(key) {
            return Ok(());
        }
        if let Some(reason) = self.failed.get(key) {
            return Err(reason.clone());
        }
        let result = match self.resources.get(key) {
            Some(data) => {
                let data = data.clone();
                self.decode_into(key, &data)
            }
            None => Err(format!("no resource named '{}'", key)),
        };
        if let Err(reason) = &result {
            self.failed.insert(key.to_string(), reason.clone());
        }
        result
    }

    fn decode_into(&mut self, key: &str, data: &[u8]) -> Result<(), String> {
        let image = decode_image(data)?;
        self.images.insert(key.to_string(), image);
        Ok(())
    }
}
