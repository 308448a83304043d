//! Inline fallback template.
//!
//! Used by the generate-fallback endpoint so PDF generation keeps working
//! without any template files on disk. The markup mirrors the stock
//! `simple-template.frx`: a centered title band with a generated-on line,
//! and one data band carrying the report content.

use quick_xml::escape::escape;

pub const DEFAULT_TITLE: &str = "Sample Report";
pub const DEFAULT_CONTENT: &str = "This is sample content for the PDF report.";

/// Assemble the fallback template markup. Interpolated text is XML-escaped;
/// the generated-on line binds `ReportData.GeneratedDate`, which the
/// generate endpoints always register.
pub fn inline_template(title: Option<&str>, content: Option<&str>) -> String {
    let title = escape(title.unwrap_or(DEFAULT_TITLE));
    let content = escape(content.unwrap_or(DEFAULT_CONTENT));

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Report ScriptLanguage="CSharp">
  <Dictionary/>
  <ReportPage Name="Page1" Landscape="false" PaperWidth="210" PaperHeight="297" LeftMargin="10" TopMargin="10" RightMargin="10" BottomMargin="10">
    <ReportTitleBand Name="ReportTitle1" Width="718.2" Height="75.6">
      <TextObject Name="Text1" Left="0" Top="0" Width="718.2" Height="37.8" Text="{title}" HorzAlign="Center" Font="Arial, 16pt, style=Bold"/>
      <TextObject Name="Text2" Left="0" Top="37.8" Width="718.2" Height="18.9" Text="Generated on: [ReportData.GeneratedDate]" HorzAlign="Center" Font="Arial, 10pt"/>
    </ReportTitleBand>
    <DataBand Name="Data1" Top="79.6" Width="718.2" Height="151.2">
      <TextObject Name="Text3" Left="0" Top="0" Width="718.2" Height="151.2" Text="{content}" Font="Arial, 12pt" WordWrap="true"/>
    </DataBand>
  </ReportPage>
</Report>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::frx::{self, BandKind};

    #[test]
    fn defaults_match_the_stock_report() {
        let markup = inline_template(None, None);
        assert!(markup.contains("Sample Report"));
        assert!(markup.contains("This is sample content for the PDF report."));
    }

    #[test]
    fn parses_into_one_title_and_one_data_band() {
        let markup = inline_template(Some("Monthly Summary"), Some("All systems nominal."));
        let template = frx::parse(&markup).unwrap();
        assert_eq!(template.bands.len(), 2);
        assert_eq!(template.bands[0].kind, BandKind::ReportTitle);
        assert_eq!(template.bands[1].kind, BandKind::Data);
        assert_eq!(template.bands[0].objects[0].text, "Monthly Summary");
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let markup = inline_template(Some(r#"A "<quoted>" & title"#), None);
        let template = frx::parse(&markup).unwrap();
        assert_eq!(
            template.bands[0].objects[0].text,
            r#"A "<quoted>" & title"#
        );
    }
}
