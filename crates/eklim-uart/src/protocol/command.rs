//! Device command vocabulary

/// Commands the retrieval layer sends to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Ask for the number of stored fault records
    FaultCount,
    /// Ask for the record in the given 1-based slot
    FaultRecord(u32),
}

impl DeviceCommand {
    /// Text sent over the channel
    pub fn to_wire(&self) -> String {
        match self {
            DeviceCommand::FaultCount => "AN".to_string(),
            DeviceCommand::FaultRecord(index) => format!("{:05}v", index),
        }
    }
}

impl std::fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wire())
    }
}
