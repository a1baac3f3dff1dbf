use std::fmt;
use std::str::FromStr;

use super::error::CaptureError;

/// Which lo-fi transform, if any, applies to a voice buffer.
///
/// Discriminants match the numeric values hosts expose through console
/// variables (`0` = none, `1` = bitcrush, `2` = desample).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Effect {
    #[default]
    None = 0,
    BitCrush = 1,
    Desample = 2,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BitCrush => "bitcrush",
            Self::Desample => "desample",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl TryFrom<i32> for Effect {
    type Error = CaptureError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::BitCrush),
            2 => Ok(Self::Desample),
            other => Err(CaptureError::InvalidParameter(format!("unknown effect code: {}", other))),
        }
    }
}

impl FromStr for Effect {
    type Err = CaptureError;

    /// Accepts either the numeric console value or the effect name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i32>() {
            return Self::try_from(code);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "bitcrush" | "crush" => Ok(Self::BitCrush),
            "desample" => Ok(Self::Desample),
            other => Err(CaptureError::InvalidParameter(format!("unknown effect: {}", other))),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
