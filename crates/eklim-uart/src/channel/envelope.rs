//! JSON reply envelope returned by the gateway's UART endpoint

use serde::{Deserialize, Serialize};

use super::{ChannelError, ChannelReply};

/// Loosely-typed reply as the gateway serializes it
///
/// `{"success": true, "command": "AN", "response": "A00050",
///   "responseLength": 6, "timestamp": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub response_length: usize,
    /// Gateway-formatted timestamp, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelEnvelope {
    /// Parse an envelope from the gateway's JSON body
    pub fn from_json(body: &str) -> Result<Self, ChannelError> {
        serde_json::from_str(body).map_err(|e| ChannelError::InvalidEnvelope(e.to_string()))
    }

    /// Convert into the explicit reply/error form
    ///
    /// An unsuccessful envelope becomes [`ChannelError::Failed`] carrying the
    /// gateway's error text, or the partial response when there is none.
    pub fn into_result(self) -> Result<ChannelReply, ChannelError> {
        if self.success {
            Ok(ChannelReply::new(self.response))
        } else {
            let reason = self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| format!("device answered {:?}", self.response));
            Err(ChannelError::Failed(reason))
        }
    }
}
