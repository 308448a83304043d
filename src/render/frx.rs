//! frx report template model.
//!
//! Parses the FastReport-dialect XML the service inherited its templates
//! from: a `Report` root, one `ReportPage` with paper size and margins in
//! millimeters, and a sequence of bands (`ReportTitleBand`, `DataBand`,
//! `PageFooterBand`) holding `TextObject` nodes. Object coordinates are in
//! device units (37.8 per centimeter); text may contain `[Table.Column]`
//! expressions resolved against the request dataset.

use super::RenderError;
use crate::dataset::Dataset;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Device units per millimeter (FastReport uses 96 dpi screen pixels).
pub const UNITS_PER_MM: f32 = 3.78;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTemplate {
    pub page: PageSetup,
    pub bands: Vec<Band>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    pub landscape: bool,
    /// Paper size in millimeters, portrait orientation
    pub paper_width: f32,
    pub paper_height: f32,
    /// Margins in millimeters
    pub left_margin: f32,
    pub top_margin: f32,
    pub right_margin: f32,
    pub bottom_margin: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        // A4 with 10mm margins, the dialect's stock page
        PageSetup {
            landscape: false,
            paper_width: 210.0,
            paper_height: 297.0,
            left_margin: 10.0,
            top_margin: 10.0,
            right_margin: 10.0,
            bottom_margin: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    ReportTitle,
    Data,
    PageFooter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub kind: BandKind,
    pub name: String,
    /// Band height in device units
    pub height: f32,
    /// Table the band repeats over; only meaningful for data bands
    pub data_source: Option<String>,
    pub objects: Vec<TextObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    pub name: String,
    /// Position and extent within the band, device units
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub align: HorzAlign,
    pub font: FontSpec,
    pub word_wrap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorzAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec {
            family: "Arial".to_string(),
            size_pt: 10.0,
            bold: false,
            italic: false,
        }
    }
}

/// Parse template markup into the report model.
pub fn parse(markup: &str) -> Result<ReportTemplate, RenderError> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(true);

    let mut page = PageSetup::default();
    let mut bands: Vec<Band> = Vec::new();
    let mut current_band: Option<Band> = None;
    let mut saw_report = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"Report" => saw_report = true,
                b"ReportPage" => page = parse_page(&e),
                b"ReportTitleBand" | b"DataBand" | b"PageFooterBand" => {
                    current_band = Some(parse_band(&e));
                }
                b"TextObject" => {
                    if let Some(band) = current_band.as_mut() {
                        band.objects.push(parse_text_object(&e));
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"Report" => saw_report = true,
                b"ReportPage" => page = parse_page(&e),
                // A self-closing band has no objects but still occupies height
                b"ReportTitleBand" | b"DataBand" | b"PageFooterBand" => bands.push(parse_band(&e)),
                b"TextObject" => {
                    if let Some(band) = current_band.as_mut() {
                        band.objects.push(parse_text_object(&e));
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if matches!(
                    e.name().as_ref(),
                    b"ReportTitleBand" | b"DataBand" | b"PageFooterBand"
                ) {
                    if let Some(band) = current_band.take() {
                        bands.push(band);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RenderError::Template(format!(
                    "invalid XML at offset {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            Ok(_) => {}
        }
    }

    if !saw_report {
        return Err(RenderError::Template(
            "markup has no Report root element".to_string(),
        ));
    }

    Ok(ReportTemplate { page, bands })
}

fn attr(e: &BytesStart, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

fn attr_f32(e: &BytesStart, name: &str) -> Option<f32> {
    attr(e, name)?.trim().parse().ok()
}

fn parse_page(e: &BytesStart) -> PageSetup {
    let defaults = PageSetup::default();
    PageSetup {
        landscape: attr(e, "Landscape").as_deref() == Some("true"),
        paper_width: attr_f32(e, "PaperWidth").unwrap_or(defaults.paper_width),
        paper_height: attr_f32(e, "PaperHeight").unwrap_or(defaults.paper_height),
        left_margin: attr_f32(e, "LeftMargin").unwrap_or(defaults.left_margin),
        top_margin: attr_f32(e, "TopMargin").unwrap_or(defaults.top_margin),
        right_margin: attr_f32(e, "RightMargin").unwrap_or(defaults.right_margin),
        bottom_margin: attr_f32(e, "BottomMargin").unwrap_or(defaults.bottom_margin),
    }
}

fn parse_band(e: &BytesStart) -> Band {
    let kind = match e.name().as_ref() {
        b"ReportTitleBand" => BandKind::ReportTitle,
        b"PageFooterBand" => BandKind::PageFooter,
        _ => BandKind::Data,
    };
    Band {
        kind,
        name: attr(e, "Name").unwrap_or_default(),
        height: attr_f32(e, "Height").unwrap_or(0.0),
        data_source: attr(e, "DataSource").filter(|s| !s.is_empty()),
        objects: Vec::new(),
    }
}

fn parse_text_object(e: &BytesStart) -> TextObject {
    TextObject {
        name: attr(e, "Name").unwrap_or_default(),
        left: attr_f32(e, "Left").unwrap_or(0.0),
        top: attr_f32(e, "Top").unwrap_or(0.0),
        width: attr_f32(e, "Width").unwrap_or(0.0),
        height: attr_f32(e, "Height").unwrap_or(0.0),
        text: attr(e, "Text").unwrap_or_default(),
        align: match attr(e, "HorzAlign").as_deref() {
            Some("Center") => HorzAlign::Center,
            Some("Right") => HorzAlign::Right,
            _ => HorzAlign::Left,
        },
        font: attr(e, "Font")
            .map(|spec| parse_font(&spec))
            .unwrap_or_default(),
        word_wrap: attr(e, "WordWrap").as_deref() != Some("false"),
    }
}

/// Parse a font attribute of the form `"Arial, 16pt, style=Bold"`.
fn parse_font(spec: &str) -> FontSpec {
    let mut font = FontSpec::default();
    for (index, part) in spec.split(',').enumerate() {
        let part = part.trim();
        if index == 0 {
            if !part.is_empty() {
                font.family = part.to_string();
            }
        } else if let Some(style) = part.strip_prefix("style=") {
            font.bold = style.contains("Bold");
            font.italic = style.contains("Italic");
        } else if part == "Bold" {
            // Style lists spill across the comma separator
            font.bold = true;
        } else if part == "Italic" {
            font.italic = true;
        } else if let Some(size) = part.strip_suffix("pt") {
            if let Ok(value) = size.trim().parse() {
                font.size_pt = value;
            }
        }
    }
    font
}

/// Substitute `[Table.Column]` expressions in a text object against the
/// dataset. `scope` is the data band's bound table and current row; title
/// and footer bands resolve every table at row zero. Unknown references stay
/// literal so template typos are visible in the output.
pub fn resolve_text(text: &str, dataset: &Dataset, scope: Option<(&str, usize)>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                let expr = &after[..close];
                match lookup(expr, dataset, scope) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('[');
                        out.push_str(expr);
                        out.push(']');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

fn lookup(expr: &str, dataset: &Dataset, scope: Option<(&str, usize)>) -> Option<String> {
    let (table_name, column) = expr.split_once('.')?;
    let table = dataset.get(table_name)?;
    let row = match scope {
        Some((scoped_table, row)) if scoped_table == table_name => row,
        _ => 0,
    };
    table.cell(row, column).map(|cell| cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, Table};

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Report ScriptLanguage="CSharp">
  <Dictionary/>
  <ReportPage Name="Page1" Landscape="false" PaperWidth="210" PaperHeight="297" LeftMargin="10" TopMargin="10" RightMargin="10" BottomMargin="10">
    <ReportTitleBand Name="ReportTitle1" Width="718.2" Height="75.6">
      <TextObject Name="Text1" Left="0" Top="0" Width="718.2" Height="37.8" Text="[ReportData.Title]" HorzAlign="Center" Font="Arial, 16pt, style=Bold"/>
    </ReportTitleBand>
    <DataBand Name="Data1" Top="79.6" Width="718.2" Height="151.2" DataSource="ReportData">
      <TextObject Name="Text3" Left="0" Top="0" Width="718.2" Height="151.2" Text="[ReportData.Content]" Font="Arial, 12pt" WordWrap="true"/>
    </DataBand>
  </ReportPage>
</Report>"#;

    #[test]
    fn parses_page_bands_and_objects() {
        let template = parse(MINIMAL).unwrap();
        assert_eq!(template.page.paper_width, 210.0);
        assert!(!template.page.landscape);
        assert_eq!(template.bands.len(), 2);

        let title = &template.bands[0];
        assert_eq!(title.kind, BandKind::ReportTitle);
        assert_eq!(title.objects.len(), 1);
        assert_eq!(title.objects[0].align, HorzAlign::Center);
        assert_eq!(title.objects[0].font.size_pt, 16.0);
        assert!(title.objects[0].font.bold);

        let data = &template.bands[1];
        assert_eq!(data.kind, BandKind::Data);
        assert_eq!(data.data_source.as_deref(), Some("ReportData"));
        assert!(!data.objects[0].font.bold);
    }

    #[test]
    fn rejects_markup_without_a_report_root() {
        assert!(matches!(
            parse("<NotAReport/>"),
            Err(RenderError::Template(_))
        ));
    }

    #[test]
    fn rejects_broken_xml() {
        assert!(matches!(
            parse("<Report><ReportPage"),
            Err(RenderError::Template(_))
        ));
    }

    #[test]
    fn font_spec_parsing_covers_the_dialect() {
        let font = parse_font("Times New Roman, 11pt, style=Bold, Italic");
        assert_eq!(font.family, "Times New Roman");
        assert_eq!(font.size_pt, 11.0);
        assert!(font.bold);
        assert!(font.italic);

        let plain = parse_font("Arial, 12pt");
        assert!(!plain.bold && !plain.italic);
        assert_eq!(plain.size_pt, 12.0);
    }

    fn sample_dataset() -> Dataset {
        let mut dataset = Dataset::new("Data");
        dataset.push(Table::from_row(
            "ReportData",
            vec![
                (
                    "Title".to_string(),
                    CellValue::String("Quarterly".to_string()),
                ),
                ("Count".to_string(), CellValue::Integer(3)),
            ],
        ));
        dataset
    }

    #[test]
    fn expressions_resolve_against_the_dataset() {
        let dataset = sample_dataset();
        assert_eq!(
            resolve_text("Report: [ReportData.Title] ([ReportData.Count])", &dataset, None),
            "Report: Quarterly (3)"
        );
    }

    #[test]
    fn unknown_references_stay_literal() {
        let dataset = sample_dataset();
        assert_eq!(
            resolve_text("[Nope.Field] and [ReportData.Missing]", &dataset, None),
            "[Nope.Field] and [ReportData.Missing]"
        );
        assert_eq!(resolve_text("no brackets", &dataset, None), "no brackets");
        assert_eq!(resolve_text("dangling [open", &dataset, None), "dangling [open");
    }

    #[test]
    fn scope_selects_the_data_band_row() {
        let mut dataset = Dataset::new("Data");
        let items = match serde_json::json!([{"v": "first"}, {"v": "second"}]) {
            serde_json::Value::Array(items) => items,
            _ => unreachable!(),
        };
        dataset.push(Table::from_array("rows", &items).unwrap());

        assert_eq!(
            resolve_text("[rows.v]", &dataset, Some(("rows", 1))),
            "second"
        );
        // Out-of-scope tables always resolve at row zero
        assert_eq!(resolve_text("[rows.v]", &dataset, Some(("other", 1))), "first");
    }
}
