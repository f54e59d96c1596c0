//! Semicolon-delimited text export

use eklim_core::FaultRecord;

use crate::row::{ExportRow, HEADERS};
use crate::BOM;

const SEPARATOR: &str = ";";

/// Serialize records as `;`-delimited text
///
/// Layout: byte-order mark, a `sep=;` directive line, the quoted header
/// row, then one row per record. Every field is quoted with embedded quotes
/// doubled, and every line ends with `\n`.
pub fn to_delimited_text(records: &[FaultRecord]) -> String {
    let mut out = String::from(BOM);
    out.push_str("sep=;\n");
    push_line(&mut out, HEADERS.iter().map(|h| h.to_string()));

    for row in ExportRow::all(records) {
        push_line(
            &mut out,
            [
                row.position.to_string(),
                format!("{:05}", row.fault_no),
                row.pin_no.to_string(),
                row.pin_type.to_string(),
                row.pin_name.to_string(),
                row.date_time,
                row.duration.to_string(),
                row.duration_seconds.to_string(),
                row.raw_data.to_string(),
            ],
        );
    }
    out
}

fn push_line(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let quoted: Vec<String> = fields.into_iter().map(|f| quote(&f)).collect();
    out.push_str(&quoted.join(SEPARATOR));
    out.push('\n');
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
