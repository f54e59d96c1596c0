//! XML Spreadsheet 2003 export
//!
//! Writes a single-worksheet workbook that spreadsheet tools open directly.
//! Rows are colored by pin category.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use eklim_core::{FaultRecord, PinCategory};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::row::{ExportRow, HEADERS};
use crate::{ExportError, BOM};

const NS_SPREADSHEET: &str = "urn:schemas-microsoft-com:office:spreadsheet";
const NS_OFFICE: &str = "urn:schemas-microsoft-com:office:office";
const NS_EXCEL: &str = "urn:schemas-microsoft-com:office:excel";
const NS_HTML: &str = "https://www.w3.org/TR/REC-html40";

/// Column widths in points, in [`HEADERS`] order
const COLUMN_WIDTHS: [u32; 9] = [50, 60, 60, 70, 100, 160, 100, 80, 150];

const STYLE_HEADER: &str = "Header";
const STYLE_OUTPUT: &str = "Output";
const STYLE_INPUT: &str = "Input";

/// Workbook metadata written to `DocumentProperties`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetOptions {
    pub title: String,
    pub author: String,
    pub company: String,
    /// Creation time; omitted when `None` so output stays reproducible
    pub created: Option<DateTime<Utc>>,
    pub sheet_name: String,
}

impl Default for SpreadsheetOptions {
    fn default() -> Self {
        Self {
            title: "TEİAŞ EKLİM Arıza Kayıtları".to_string(),
            author: "TEİAŞ EKLİM Sistemi".to_string(),
            company: "TEİAŞ".to_string(),
            created: None,
            sheet_name: "Arıza Kayıtları".to_string(),
        }
    }
}

enum CellValue<'a> {
    Number(String),
    Text(&'a str),
}

/// Serialize records as an XML Spreadsheet 2003 workbook
///
/// Output rows use the `Output` style; every other category uses `Input`.
/// Text cells are escaped for `& < > ' "`.
pub fn to_spreadsheet_markup(
    records: &[FaultRecord],
    options: &SpreadsheetOptions,
) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("Workbook");
    root.push_attribute(("xmlns", NS_SPREADSHEET));
    root.push_attribute(("xmlns:o", NS_OFFICE));
    root.push_attribute(("xmlns:x", NS_EXCEL));
    root.push_attribute(("xmlns:ss", NS_SPREADSHEET));
    root.push_attribute(("xmlns:html", NS_HTML));
    writer.write_event(Event::Start(root))?;

    write_document_properties(&mut writer, options)?;
    write_styles(&mut writer)?;

    let mut sheet = BytesStart::new("Worksheet");
    sheet.push_attribute(("ss:Name", options.sheet_name.as_str()));
    writer.write_event(Event::Start(sheet))?;

    let column_count = HEADERS.len().to_string();
    let row_count = (records.len() + 1).to_string();
    let mut table = BytesStart::new("Table");
    table.push_attribute(("ss:ExpandedColumnCount", column_count.as_str()));
    table.push_attribute(("ss:ExpandedRowCount", row_count.as_str()));
    table.push_attribute(("x:FullColumns", "1"));
    table.push_attribute(("x:FullRows", "1"));
    writer.write_event(Event::Start(table))?;

    for width in COLUMN_WIDTHS {
        let width = width.to_string();
        let mut column = BytesStart::new("Column");
        column.push_attribute(("ss:AutoFitWidth", "0"));
        column.push_attribute(("ss:Width", width.as_str()));
        writer.write_event(Event::Empty(column))?;
    }

    let header: Vec<CellValue> = HEADERS.iter().map(|h| CellValue::Text(h)).collect();
    write_row(&mut writer, STYLE_HEADER, &header)?;

    for (record, row) in records.iter().zip(ExportRow::all(records)) {
        let style = match record.pin_category() {
            PinCategory::Output => STYLE_OUTPUT,
            PinCategory::Input | PinCategory::Unknown => STYLE_INPUT,
        };
        let cells = [
            CellValue::Number(row.position.to_string()),
            CellValue::Number(row.fault_no.to_string()),
            CellValue::Number(row.pin_no.to_string()),
            CellValue::Text(row.pin_type),
            CellValue::Text(row.pin_name),
            CellValue::Text(&row.date_time),
            CellValue::Text(row.duration),
            CellValue::Number(row.duration_seconds.to_string()),
            CellValue::Text(row.raw_data),
        ];
        write_row(&mut writer, style, &cells)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Table")))?;
    writer.write_event(Event::End(BytesEnd::new("Worksheet")))?;
    writer.write_event(Event::End(BytesEnd::new("Workbook")))?;

    let result = writer.into_inner();
    let mut out = String::from(BOM);
    out.push_str(&String::from_utf8_lossy(&result));
    Ok(out)
}

fn write_document_properties<W: Write>(
    writer: &mut Writer<W>,
    options: &SpreadsheetOptions,
) -> Result<(), ExportError> {
    let mut props = BytesStart::new("DocumentProperties");
    props.push_attribute(("xmlns", NS_OFFICE));
    writer.write_event(Event::Start(props))?;

    write_text_element(writer, "Title", &options.title)?;
    write_text_element(writer, "Author", &options.author)?;
    if let Some(created) = options.created {
        let created = created.to_rfc3339_opts(SecondsFormat::Millis, true);
        write_text_element(writer, "Created", &created)?;
    }
    write_text_element(writer, "Company", &options.company)?;

    writer.write_event(Event::End(BytesEnd::new("DocumentProperties")))?;
    Ok(())
}

fn write_styles<W: Write>(writer: &mut Writer<W>) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new("Styles")))?;

    start_style(writer, STYLE_HEADER)?;
    write_font(writer, "#FFFFFF", true)?;
    write_interior(writer, "#4F81BD")?;
    writer.write_event(Event::Start(BytesStart::new("Borders")))?;
    for position in ["Bottom", "Left", "Right", "Top"] {
        let mut border = BytesStart::new("Border");
        border.push_attribute(("ss:Position", position));
        border.push_attribute(("ss:LineStyle", "Continuous"));
        border.push_attribute(("ss:Weight", "1"));
        writer.write_event(Event::Empty(border))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Borders")))?;
    writer.write_event(Event::End(BytesEnd::new("Style")))?;

    start_style(writer, STYLE_OUTPUT)?;
    write_font(writer, "#006100", false)?;
    write_interior(writer, "#C6EFCE")?;
    writer.write_event(Event::End(BytesEnd::new("Style")))?;

    start_style(writer, STYLE_INPUT)?;
    write_font(writer, "#0F1494", false)?;
    write_interior(writer, "#B7DEE8")?;
    writer.write_event(Event::End(BytesEnd::new("Style")))?;

    writer.write_event(Event::End(BytesEnd::new("Styles")))?;
    Ok(())
}

fn start_style<W: Write>(writer: &mut Writer<W>, id: &str) -> Result<(), ExportError> {
    let mut style = BytesStart::new("Style");
    style.push_attribute(("ss:ID", id));
    writer.write_event(Event::Start(style))?;
    Ok(())
}

fn write_font<W: Write>(writer: &mut Writer<W>, color: &str, bold: bool) -> Result<(), ExportError> {
    let mut font = BytesStart::new("Font");
    font.push_attribute(("ss:FontName", "Calibri"));
    font.push_attribute(("ss:Size", "11"));
    font.push_attribute(("ss:Color", color));
    if bold {
        font.push_attribute(("ss:Bold", "1"));
    }
    writer.write_event(Event::Empty(font))?;
    Ok(())
}

fn write_interior<W: Write>(writer: &mut Writer<W>, color: &str) -> Result<(), ExportError> {
    let mut interior = BytesStart::new("Interior");
    interior.push_attribute(("ss:Color", color));
    interior.push_attribute(("ss:Pattern", "Solid"));
    writer.write_event(Event::Empty(interior))?;
    Ok(())
}

fn write_row<W: Write>(
    writer: &mut Writer<W>,
    style: &str,
    cells: &[CellValue],
) -> Result<(), ExportError> {
    let mut row = BytesStart::new("Row");
    row.push_attribute(("ss:StyleID", style));
    writer.write_event(Event::Start(row))?;

    for cell in cells {
        let (kind, value) = match cell {
            CellValue::Number(n) => ("Number", n.as_str()),
            CellValue::Text(s) => ("String", *s),
        };
        writer.write_event(Event::Start(BytesStart::new("Cell")))?;
        let mut data = BytesStart::new("Data");
        data.push_attribute(("ss:Type", kind));
        writer.write_event(Event::Start(data))?;
        writer.write_event(Event::Text(BytesText::from_escaped(escape(value))))?;
        writer.write_event(Event::End(BytesEnd::new("Data")))?;
        writer.write_event(Event::End(BytesEnd::new("Cell")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Row")))?;
    Ok(())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape(value))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
