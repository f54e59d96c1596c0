//! Fault count query (`AN`)

use tracing::{debug, warn};

use super::DeviceCommand;
use crate::channel::{send_with_timeout, CommandChannel};
use crate::config::RetrievalConfig;

/// Shortest valid count answer: `A` plus four digits
const MIN_COUNT_RESPONSE_LEN: usize = 5;

/// Parse a count answer such as `"A00050"`
///
/// The answer is trimmed, must start with `A`, be at least five characters
/// long and continue with decimal digits only. `offset` is subtracted from
/// the parsed value, saturating at zero.
pub fn parse_count_response(response: &str, offset: u32) -> Option<u32> {
    let response = response.trim();
    if response.len() < MIN_COUNT_RESPONSE_LEN {
        return None;
    }
    let digits = response.strip_prefix('A')?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let reported: u32 = digits.parse().ok()?;
    Some(reported.saturating_sub(offset))
}

/// Ask the device how many fault records it holds
///
/// Never fails: a channel error, timeout or unparseable answer all read as
/// zero records.
pub async fn query_total_fault_count(
    channel: &dyn CommandChannel,
    config: &RetrievalConfig,
) -> u32 {
    let command = DeviceCommand::FaultCount.to_wire();
    match send_with_timeout(channel, &command, config.count_timeout()).await {
        Ok(reply) => match parse_count_response(&reply.response, config.count_offset) {
            Some(total) => {
                debug!(response = %reply.response, total, "Fault count received");
                total
            }
            None => {
                warn!(response = %reply.response, "Unrecognised fault count response");
                0
            }
        },
        Err(e) => {
            warn!(error = %e, "Fault count query failed");
            0
        }
    }
}
