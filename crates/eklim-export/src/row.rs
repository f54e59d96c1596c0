//! Column set shared by both export formats

use eklim_core::FaultRecord;

/// Column headers, in export order
pub const HEADERS: [&str; 9] = [
    "Sıra",
    "Arıza No",
    "Pin No",
    "Pin Tipi",
    "Pin Adı",
    "Tarih-Saat",
    "Arıza Süresi",
    "Süre (sn)",
    "Ham Veri",
];

/// One record flattened into export columns
pub(crate) struct ExportRow<'a> {
    /// 1-based position in the exported slice
    pub position: usize,
    /// Device slot, falling back to the position for untagged records
    pub fault_no: u64,
    pub pin_no: u8,
    pub pin_type: &'static str,
    pub pin_name: &'a str,
    pub date_time: String,
    pub duration: &'a str,
    pub duration_seconds: f64,
    pub raw_data: &'a str,
}

impl<'a> ExportRow<'a> {
    pub fn new(position: usize, record: &'a FaultRecord) -> Self {
        Self {
            position,
            fault_no: record
                .record_index()
                .map(u64::from)
                .unwrap_or(position as u64),
            pin_no: record.display_pin_number(),
            pin_type: record.pin_category().name(),
            pin_name: record.pin_label(),
            date_time: record.date_time_with_millis(),
            duration: record.duration_display(),
            duration_seconds: record.duration_seconds(),
            raw_data: record.raw_data(),
        }
    }

    /// Rows for a slice, numbered from 1
    pub fn all(records: &'a [FaultRecord]) -> impl Iterator<Item = ExportRow<'a>> + 'a {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| ExportRow::new(i + 1, record))
    }
}
