//! Rolling window size validation
//!
//! Accepted forms: `1m`..`59m`, `1h`..`23h`, `1d`..`7d`.

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowUnit {
    Minutes,
    Hours,
    Days,
}

impl WindowUnit {
    fn suffix(self) -> char {
        match self {
            WindowUnit::Minutes => 'm',
            WindowUnit::Hours => 'h',
            WindowUnit::Days => 'd',
        }
    }

    fn max(self) -> u32 {
        match self {
            WindowUnit::Minutes => 59,
            WindowUnit::Hours => 23,
            WindowUnit::Days => 7,
        }
    }
}

/// A validated `windowSize` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    amount: u32,
    unit: WindowUnit,
}

impl WindowSize {
    pub fn amount(&self) -> u32 {
        self.amount
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            amount: 1,
            unit: WindowUnit::Days,
        }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for WindowSize {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ProviderError::InvalidArgument(format!(
                "Invalid window '{}': expected 1m-59m, 1h-23h or 1d-7d",
                s
            ))
        };

        let unit = match s.chars().last() {
            Some('m') => WindowUnit::Minutes,
            Some('h') => WindowUnit::Hours,
            Some('d') => WindowUnit::Days,
            _ => return Err(invalid()),
        };

        let digits = &s[..s.len() - 1];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let amount: u32 = digits.parse().map_err(|_| invalid())?;
        if amount == 0 || amount > unit.max() {
            return Err(invalid());
        }

        Ok(Self { amount, unit })
    }
}
