//! Monitored pin classification

use serde::{Deserialize, Serialize};

/// Highest raw code wired to an output pin
const LAST_OUTPUT_CODE: u8 = 8;
/// Highest raw code wired to an input pin
const LAST_INPUT_CODE: u8 = 16;

/// Pin category derived from the raw pin code of a fault record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinCategory {
    /// Raw codes 1-8
    #[serde(rename = "Çıkış")]
    Output,
    /// Raw codes 9-16, displayed as 1-8
    #[serde(rename = "Giriş")]
    Input,
    /// Any other raw code
    #[serde(rename = "Bilinmeyen")]
    Unknown,
}

impl PinCategory {
    /// Classify a raw pin code
    pub fn from_code(code: u8) -> Self {
        match code {
            1..=LAST_OUTPUT_CODE => PinCategory::Output,
            9..=LAST_INPUT_CODE => PinCategory::Input,
            _ => PinCategory::Unknown,
        }
    }

    /// Operator-facing name, as shown in tables and exports
    pub fn name(&self) -> &'static str {
        match self {
            PinCategory::Output => "Çıkış",
            PinCategory::Input => "Giriş",
            PinCategory::Unknown => "Bilinmeyen",
        }
    }
}

impl std::fmt::Display for PinCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified pin: raw code, category and the number shown to operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    /// Code as sent by the device
    pub raw_code: u8,
    /// Category derived from the code
    pub category: PinCategory,
    /// Number shown to operators (inputs are renumbered from 1)
    pub display_number: u8,
}

impl Pin {
    /// Classify a raw pin code
    pub fn from_code(raw_code: u8) -> Self {
        let category = PinCategory::from_code(raw_code);
        let display_number = match category {
            PinCategory::Input => raw_code - LAST_OUTPUT_CODE,
            PinCategory::Output | PinCategory::Unknown => raw_code,
        };
        Self {
            raw_code,
            category,
            display_number,
        }
    }

    /// Label such as "Çıkış 3", "Giriş 2" or "Pin 40"
    pub fn label(&self) -> String {
        match self.category {
            PinCategory::Output | PinCategory::Input => {
                format!("{} {}", self.category.name(), self.display_number)
            }
            PinCategory::Unknown => format!("Pin {}", self.raw_code),
        }
    }
}
