//! Built-in frx rendering engine.
//!
//! Interprets a parsed [`ReportTemplate`](frx::ReportTemplate) against a
//! dataset and emits PDF bytes with the PDF base-14 fonts. Bands flow top to
//! bottom; a data band bound to a table repeats once per row and overflow
//! starts a new page. Layout is deliberately simple (estimated character
//! widths, greedy wrapping); the service consumes this engine strictly
//! through the [`ReportRenderer`] trait.

use super::frx::{self, Band, BandKind, FontSpec, HorzAlign, TextObject, UNITS_PER_MM};
use super::{RenderError, ReportRenderer, TemplateSource};
use crate::dataset::Dataset;
use async_trait::async_trait;
use printpdf::text::TextItem;
use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, TextMatrix};

// Average glyph width estimate for the base-14 fonts; adequate for banded
// reports.
const CHAR_WIDTH_FACTOR: f32 = 0.6;
const LINE_HEIGHT_FACTOR: f32 = 1.2;

pub struct FrxEngine;

impl FrxEngine {
    pub fn new() -> Self {
        FrxEngine
    }
}

impl Default for FrxEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportRenderer for FrxEngine {
    async fn render(
        &self,
        dataset: &Dataset,
        template: &TemplateSource,
    ) -> Result<Vec<u8>, RenderError> {
        let markup = match template {
            TemplateSource::File(path) => tokio::fs::read_to_string(path).await?,
            TemplateSource::Inline(markup) => markup.clone(),
        };

        // Template interpretation and PDF emission are CPU-bound; keep them
        // off the async executor.
        let dataset = dataset.clone();
        tokio::task::spawn_blocking(move || {
            let template = frx::parse(&markup)?;
            render_document(&template, &dataset)
        })
        .await
        .map_err(|e| RenderError::Render {
            message: "render task failed".to_string(),
            cause: Some(Box::new(e)),
        })?
    }
}

fn render_document(
    template: &frx::ReportTemplate,
    dataset: &Dataset,
) -> Result<Vec<u8>, RenderError> {
    let page = &template.page;
    let (page_width, page_height) = if page.landscape {
        (page.paper_height, page.paper_width)
    } else {
        (page.paper_width, page.paper_height)
    };
    let content_bottom = page_height - page.bottom_margin;

    let mut page_ops: Vec<Vec<Op>> = vec![Vec::new()];
    let mut cursor_mm = page.top_margin;

    for band in &template.bands {
        for scope in band_passes(band, dataset) {
            let band_height_mm = band.height / UNITS_PER_MM;
            if cursor_mm + band_height_mm > content_bottom && cursor_mm > page.top_margin {
                page_ops.push(Vec::new());
                cursor_mm = page.top_margin;
            }
            let ops = page_ops
                .last_mut()
                .ok_or_else(|| RenderError::Render {
                    message: "no current page".to_string(),
                    cause: None,
                })?;
            for object in &band.objects {
                ops.extend(text_object_ops(
                    object,
                    dataset,
                    scope.as_ref().map(|(table, row)| (table.as_str(), *row)),
                    page.left_margin,
                    cursor_mm,
                    page_height,
                ));
            }
            cursor_mm += band_height_mm;
        }
    }

    let mut doc = PdfDocument::new("Report");
    for ops in page_ops {
        doc.pages
            .push(PdfPage::new(Mm(page_width), Mm(page_height), ops));
    }
    let mut warnings = Vec::new();
    Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
}

/// One pass per emitted band instance: a data band bound to a table repeats
/// per row (an empty table emits nothing), everything else emits once
/// unscoped.
fn band_passes(band: &Band, dataset: &Dataset) -> Vec<Option<(String, usize)>> {
    if band.kind == BandKind::Data {
        if let Some(source) = &band.data_source {
            return match dataset.get(source) {
                Some(table) => (0..table.row_count())
                    .map(|row| Some((source.clone(), row)))
                    .collect(),
                // Source names no table in this dataset; print once, unresolved
                None => vec![None],
            };
        }
    }
    vec![None]
}

fn text_object_ops(
    object: &TextObject,
    dataset: &Dataset,
    scope: Option<(&str, usize)>,
    band_left_mm: f32,
    band_top_mm: f32,
    page_height_mm: f32,
) -> Vec<Op> {
    let text = frx::resolve_text(&object.text, dataset, scope);
    if text.is_empty() {
        return Vec::new();
    }

    let font = builtin_font(&object.font);
    let size_pt = object.font.size_pt;
    let char_width_pt = size_pt * CHAR_WIDTH_FACTOR;

    let left_pt = Mm(band_left_mm + object.left / UNITS_PER_MM).into_pt().0;
    let top_pt = Mm(band_top_mm + object.top / UNITS_PER_MM).into_pt().0;
    let width_pt = Mm(object.width / UNITS_PER_MM).into_pt().0;

    let lines = if object.word_wrap {
        let max_chars = ((width_pt / char_width_pt).floor() as usize).max(1);
        wrap_text(&text, max_chars)
    } else {
        vec![text]
    };

    let mut ops = vec![
        Op::StartTextSection,
        Op::SetFontSizeBuiltinFont {
            size: Pt(size_pt),
            font: font.clone(),
        },
    ];

    let page_height_pt = Mm(page_height_mm).into_pt().0;
    for (index, line) in lines.iter().enumerate() {
        let line_width_pt = line.chars().count() as f32 * char_width_pt;
        let x_pt = match object.align {
            HorzAlign::Left => left_pt,
            HorzAlign::Center => left_pt + (width_pt - line_width_pt) / 2.0,
            HorzAlign::Right => left_pt + width_pt - line_width_pt,
        };
        // PDF origin is bottom-left; the first baseline sits one font size
        // below the object's top edge.
        let y_pt =
            page_height_pt - top_pt - size_pt - index as f32 * size_pt * LINE_HEIGHT_FACTOR;
        ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(x_pt), Pt(y_pt)),
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line.clone())],
            font: font.clone(),
        });
    }

    ops.push(Op::EndTextSection);
    ops
}

fn builtin_font(spec: &FontSpec) -> BuiltinFont {
    let family = spec.family.to_ascii_lowercase();
    if family.contains("times") {
        match (spec.bold, spec.italic) {
            (true, true) => BuiltinFont::TimesBoldItalic,
            (true, false) => BuiltinFont::TimesBold,
            (false, true) => BuiltinFont::TimesItalic,
            (false, false) => BuiltinFont::TimesRoman,
        }
    } else if family.contains("courier") {
        match (spec.bold, spec.italic) {
            (true, true) => BuiltinFont::CourierBoldOblique,
            (true, false) => BuiltinFont::CourierBold,
            (false, true) => BuiltinFont::CourierOblique,
            (false, false) => BuiltinFont::Courier,
        }
    } else {
        // Arial and everything else map onto Helvetica
        match (spec.bold, spec.italic) {
            (true, true) => BuiltinFont::HelveticaBoldOblique,
            (true, false) => BuiltinFont::HelveticaBold,
            (false, true) => BuiltinFont::HelveticaOblique,
            (false, false) => BuiltinFont::Helvetica,
        }
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
