use crate::page::{ImageXObject, PageContext, ResourceNames, font_resource_name};
use crate::resources::{DecodedImage, resolve_resources};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use offerdoc_layout::{LayoutEngine, PositionedElement};
use offerdoc_render_core::utils::encode_win_ansi;
use offerdoc_render_core::{
    BuiltDocument, Diagnostic, DiagnosticKind, DocumentBackend, DocumentDraft, DocumentMetadata,
    PageCanvas, PageDecorator, PageInfo, RenderError,
};
use offerdoc_style::StandardFont;
use std::collections::BTreeMap;
use std::io::Write;

const PRODUCER: &str = "offerdoc";

#[derive(Debug, Clone, PartialEq)]
pub struct LopdfOptions {
    /// Flate-compress page content streams. Image data is always compressed.
    pub compress_streams: bool,
    pub pdf_version: String,
}

impl Default for LopdfOptions {
    fn default() -> Self {
        Self {
            compress_streams: true,
            pdf_version: "1.5".to_string(),
        }
    }
}

/// Builds PDF documents in memory with `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfBackend {
    options: LopdfOptions,
}

impl LopdfBackend {
    pub fn new(options: LopdfOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LopdfOptions {
        &self.options
    }
}

impl DocumentBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn build(
        &self,
        mut draft: DocumentDraft,
        decorator: &dyn PageDecorator,
    ) -> Result<BuiltDocument, RenderError> {
        let theme = draft.theme.clone();
        let metrics = draft.page_metrics;
        let branding = draft.branding.clone();
        let metadata = draft.metadata.clone();
        let resources = std::mem::take(&mut draft.resources);
        let elements = draft.into_elements();

        let logo_keys: Vec<String> = branding.logo.iter().cloned().collect();
        let resolved = resolve_resources(elements, &resources, &logo_keys);
        let mut diagnostics = resolved.diagnostics;
        let logo = branding
            .logo
            .clone()
            .filter(|key| resolved.images.contains_key(key));
        if let (Some(key), None) = (&branding.logo, &logo) {
            log::warn!("[BACKEND] Company logo '{}' unusable; rendering without it", key);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::ElementResource,
                format!("Company logo '{}' could not be loaded; pages use no logo", key),
            ));
        }

        let engine = LayoutEngine::new(metrics, theme.clone())?;
        let pages = engine.paginate(&resolved.elements);
        let total_pages = pages.len();

        let mut writer = PdfWriter::new(&self.options);
        writer.add_images(&resolved.images)?;
        for (index, page) in pages.into_iter().enumerate() {
            let info = PageInfo {
                index,
                total_pages,
                company_name: branding.company_name.clone(),
                logo: logo.clone(),
                contact_line: branding.contact_line.clone(),
                theme: theme.clone(),
                metrics,
            };
            let mut canvas = PageCanvas::new();
            decorator.decorate(&info, &mut canvas);
            let decorations = canvas.into_elements();
            writer.add_page(
                decorations.iter().chain(page.elements.iter()),
                metrics.width,
                metrics.height,
            )?;
        }

        let bytes = writer.finish(&metadata)?;
        log::debug!(
            "[BACKEND] Built {} page(s), {} bytes, {} diagnostic(s)",
            total_pages,
            bytes.len(),
            diagnostics.len()
        );
        Ok(BuiltDocument {
            bytes,
            page_count: total_pages,
            diagnostics,
        })
    }
}

/// The document's object graph while pages are being added.
struct PdfWriter {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    fonts: Dictionary,
    xobjects: Dictionary,
    image_names: BTreeMap<String, ImageXObject>,
    compress: bool,
}

impl PdfWriter {
    fn new(options: &LopdfOptions) -> Self {
        let mut document = Document::with_version(options.pdf_version.as_str());
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();

        let mut fonts = Dictionary::new();
        for font in StandardFont::all() {
            let font_id = document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font_resource_name(font), font_id);
        }

        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            fonts,
            xobjects: Dictionary::new(),
            image_names: BTreeMap::new(),
            compress: options.compress_streams,
        }
    }

    fn add_images(&mut self, images: &BTreeMap<String, DecodedImage>) -> Result<(), RenderError> {
        for (i, (key, image)) in images.iter().enumerate() {
            let name = format!("Im{}", i + 1);
            let stream = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width as i64,
                    "Height" => image.height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                deflate(&image.rgb)?,
            );
            let id = self.document.add_object(stream);
            self.xobjects.set(name.as_str(), id);
            self.image_names.insert(
                key.clone(),
                ImageXObject {
                    name,
                    pixel_width: image.width,
                    pixel_height: image.height,
                },
            );
        }
        Ok(())
    }

    fn add_page<'e>(
        &mut self,
        elements: impl Iterator<Item = &'e PositionedElement>,
        page_width: f32,
        page_height: f32,
    ) -> Result<(), RenderError> {
        let names = ResourceNames {
            images: &self.image_names,
        };
        let mut page_ctx = PageContext::new(names, page_height);
        for element in elements {
            page_ctx.draw_element(element);
        }
        let encoded = page_ctx
            .finish()
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        let content_stream = if self.compress {
            Stream::new(dictionary! { "Filter" => "FlateDecode" }, deflate(&encoded)?)
        } else {
            Stream::new(dictionary! {}, encoded)
        };
        let content_id = self.document.add_object(content_stream);

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish(mut self, metadata: &DocumentMetadata) -> Result<Vec<u8>, RenderError> {
        let mut resources = dictionary! { "Font" => self.fonts };
        if !self.xobjects.is_empty() {
            resources.set("XObject", self.xobjects);
        }
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let info_id = self.document.add_object(info_dictionary(metadata));
        self.document.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(bytes)
    }
}

fn info_dictionary(metadata: &DocumentMetadata) -> Dictionary {
    let text = |value: &str| Object::String(encode_win_ansi(value), StringFormat::Literal);
    let mut info = dictionary! { "Producer" => Object::string_literal(PRODUCER) };
    if !metadata.title.is_empty() {
        info.set("Title", text(&metadata.title));
    }
    if !metadata.author.is_empty() {
        info.set("Author", text(&metadata.author));
    }
    if let Some(subject) = metadata.subject.as_deref() {
        info.set("Subject", text(subject));
    }
    if let Some(created) = metadata.created {
        let stamp = created.format("D:%Y%m%d%H%M%SZ").to_string();
        info.set("CreationDate", Object::string_literal(stamp));
    }
    info
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
