//! End-to-end fault-log retrieval tests
//!
//! Run with: cargo test --test fault_log_e2e_test

use std::io::Write;
use std::sync::Arc;

use eklim_core::{PinCategory, PinFilter};
use eklim_export::{to_delimited_text, to_spreadsheet_markup, SpreadsheetOptions};
use eklim_uart::channel::mock::MockChannel;
use eklim_uart::{
    decode_fault_record, parse_count_response, FaultRetriever, MockConfig, RetrievalConfig,
    RetrievalOutcome, SessionState,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Split one quoted, `;`-delimited line back into its fields
fn split_delimited(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

// =============================================================================
// Decoding and count parsing
// =============================================================================

#[test]
fn test_scenario_a_output_record() {
    let record = decode_fault_record("0125061510300050002250").unwrap();

    assert_eq!(record.pin_category(), PinCategory::Output);
    assert_eq!(record.pin_label(), "Çıkış 1");
    assert_eq!(record.timestamp().date_string(), "15/06/2025");
    assert_eq!(record.timestamp().time_string(), "10:30:00");
    assert_eq!(record.millisecond(), 500);
    assert_eq!(record.duration_seconds(), 2.25);
    assert_eq!(record.duration_display(), "2.250 sn");
}

#[test]
fn test_scenario_b_count_offset() {
    assert_eq!(parse_count_response("A00050", 1), Some(49));
}

#[rstest]
#[case(1)]
#[case(21)]
#[case(22)]
#[case(30)]
fn test_body_length_boundary(#[case] len: usize) {
    let body: String = "0125061510300050002250XXXXXXXX".chars().take(len).collect();
    assert_eq!(decode_fault_record(&body).is_ok(), len >= 22);
}

// =============================================================================
// Bulk retrieval
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_scenario_c_partial_success() {
    init_tracing();
    let channel = Arc::new(MockChannel::with_fault_log(
        &MockConfig::default(),
        [
            "0125061510300050002250",
            "0925061510300050002250",
            "1025061510300050002250",
        ],
    ));
    channel.timeout_command("00002v");
    let retriever = FaultRetriever::new(channel.clone(), RetrievalConfig::default());

    let outcome = retriever.start().await.unwrap();

    let summary = outcome.summary().unwrap();
    assert_eq!(
        (summary.success_count, summary.fail_count, summary.total),
        (2, 1, 3)
    );
    let indices: Vec<u32> = retriever
        .records()
        .iter()
        .filter_map(|r| r.record_index())
        .collect();
    assert_eq!(indices, vec![3, 1]);
    assert_eq!(channel.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scenario_d_no_records() {
    init_tracing();
    let channel = Arc::new(MockChannel::new(&MockConfig::default()));
    channel.set_response("AN", "A00001");
    let retriever = FaultRetriever::new(channel.clone(), RetrievalConfig::default());

    assert_eq!(retriever.start().await.unwrap(), RetrievalOutcome::NoRecords);
    assert!(retriever.records().is_empty());
    assert!(channel
        .sent_commands()
        .iter()
        .all(|command| !command.ends_with('v')));
}

#[tokio::test(start_paused = true)]
async fn test_counts_always_add_up() {
    init_tracing();
    let channel = Arc::new(MockChannel::with_fault_log(
        &MockConfig { latency_ms: 5 },
        ["0125061510300050002250"; 8],
    ));
    channel.set_response("00007v", "E");
    channel.fail_command("00005v", "UART busy");
    channel.set_response("00003v", "3:01250615103000500022");
    channel.set_response("00002v", "2:0125061599300050002250");
    let retriever = FaultRetriever::new(channel, RetrievalConfig::default());

    let outcome = retriever.start().await.unwrap();

    assert_eq!(retriever.state(), SessionState::Completed);
    let summary = outcome.summary().unwrap();
    assert_eq!(summary.success_count + summary.fail_count, summary.total);
    assert_eq!(summary.failed_indices, vec![7, 5, 3, 2]);
    assert_eq!(summary.success_count, 4);
}

#[tokio::test(start_paused = true)]
async fn test_configured_pacing_and_offset() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "pacing_interval_ms = 500").unwrap();
    writeln!(file, "count_offset = 0").unwrap();
    let config = RetrievalConfig::load(file.path()).unwrap();

    let channel = Arc::new(MockChannel::with_fault_log(
        &MockConfig::default(),
        ["0125061510300050002250", "0225061510300050002250"],
    ));
    // The mock reports n + 1; with no offset the extra slot is requested too
    let retriever = FaultRetriever::new(channel.clone(), config);

    let started = tokio::time::Instant::now();
    let outcome = retriever.start().await.unwrap();

    assert!(started.elapsed() >= std::time::Duration::from_millis(1500));
    let summary = outcome.summary().unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.failed_indices, vec![3]);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_scenario_e_delimited_round_trip() {
    let record = decode_fault_record("7:0A25061510300050065250")
        .unwrap()
        .with_record_index(7);

    let text = to_delimited_text(std::slice::from_ref(&record));
    let line = text.lines().nth(2).unwrap();
    let fields = split_delimited(line);

    assert_eq!(
        fields,
        vec![
            "1".to_string(),
            "00007".to_string(),
            record.display_pin_number().to_string(),
            record.pin_category().to_string(),
            record.pin_label().to_string(),
            format!(
                "{}.{}",
                record.timestamp().date_time_string(),
                record.millisecond()
            ),
            record.duration_display().to_string(),
            record.duration_seconds().to_string(),
            record.raw_data().to_string(),
        ]
    );
    assert_eq!(fields[3], "Giriş");
    assert_eq!(fields[6], "1dk 5.3sn");
    assert_eq!(fields[7], "65.25");
}

#[test]
fn test_delimited_raw_data_with_quotes_and_separators() {
    let raw = "0125061510300050001118 \"a;b\"\";\"";
    let record = decode_fault_record(raw).unwrap().with_record_index(1);
    assert_eq!(record.raw_data(), raw);

    let text = to_delimited_text(std::slice::from_ref(&record));
    let fields = split_delimited(text.lines().nth(2).unwrap());

    assert_eq!(fields.len(), 9);
    assert_eq!(fields[7], "1.1179999999999999");
    assert_eq!(fields[8], raw);
}

#[tokio::test(start_paused = true)]
async fn test_retrieve_filter_and_export() {
    init_tracing();
    let channel = Arc::new(MockChannel::with_fault_log(
        &MockConfig::default(),
        [
            "0125061510300050002250",
            "0925061510300050002250",
            "0325061510300050002250",
        ],
    ));
    let retriever = FaultRetriever::new(channel, RetrievalConfig::default());
    retriever.start().await.unwrap();
    let records = retriever.records();

    let outputs: Vec<_> = PinFilter::Category(PinCategory::Output)
        .apply(&records)
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(outputs.len(), 2);

    let text = to_delimited_text(&outputs);
    let rows: Vec<Vec<String>> = text.lines().skip(2).map(split_delimited).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], "00003");
    assert_eq!(rows[1][1], "00001");

    let markup = to_spreadsheet_markup(&records, &SpreadsheetOptions::default()).unwrap();
    assert_eq!(markup.matches("<Row ss:StyleID=\"Output\">").count(), 2);
    assert_eq!(markup.matches("<Row ss:StyleID=\"Input\">").count(), 1);
}

#[test]
fn test_record_json_shape() {
    let record = decode_fault_record("2825061510300050002250")
        .unwrap()
        .with_record_index(12);
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["recordIndex"], 12);
    assert_eq!(json["rawPinCode"], 40);
    assert_eq!(json["pinCategory"], "Bilinmeyen");
    assert_eq!(json["displayPinNumber"], 40);
    assert_eq!(json["pinLabel"], "Pin 40");
    assert_eq!(json["dateTime"], "15/06/2025 10:30:00");
    assert_eq!(json["millisecond"], 500);
}
