//! Severity definitions

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity, ordered from most to least severe.
///
/// The discriminant doubles as the index into the per-severity sink table,
/// so `ERROR.log` is sink 0 and `TRACE.log` is sink 5.
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error = 0,
    Warn = 1,
    Fault = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl Severity {
    /// Number of severities, and therefore of sink files.
    pub const COUNT: usize = 6;

    /// All severities in sink-table order.
    pub const ALL: [Severity; Severity::COUNT] = [
        Severity::Error,
        Severity::Warn,
        Severity::Fault,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Fault => "FAULT",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
        }
    }

    /// Index into the sink table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Severity::Error),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Fault),
            3 => Some(Severity::Info),
            4 => Some(Severity::Debug),
            5 => Some(Severity::Trace),
            _ => None,
        }
    }

    /// Color an emission line for the stdout stream.
    ///
    /// `colored` has no named orange/aqua/hot-pink, so those use truecolor
    /// escapes.
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Severity::Error => text.red().on_yellow(),
            Severity::Warn => text.yellow(),
            Severity::Fault => text.truecolor(255, 165, 0),
            Severity::Info => text.truecolor(0, 255, 255),
            Severity::Debug => text.green(),
            Severity::Trace => text.truecolor(255, 105, 180),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ERROR" => Ok(Severity::Error),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "FAULT" => Ok(Severity::Fault),
            "INFO" => Ok(Severity::Info),
            "DEBUG" => Ok(Severity::Debug),
            "TRACE" => Ok(Severity::Trace),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_table_order() {
        for (i, severity) in Severity::ALL.iter().enumerate() {
            assert_eq!(severity.index(), i);
            assert_eq!(Severity::from_index(i), Some(*severity));
        }
        assert_eq!(Severity::from_index(Severity::COUNT), None);
    }

    #[test]
    fn test_ordering_most_severe_first() {
        assert!(Severity::Error < Severity::Warn);
        assert!(Severity::Warn < Severity::Fault);
        assert!(Severity::Fault < Severity::Info);
        assert!(Severity::Info < Severity::Debug);
        assert!(Severity::Debug < Severity::Trace);
    }

    #[test]
    fn test_str_roundtrip() {
        for severity in Severity::ALL {
            let parsed: Severity = severity.as_str().parse().unwrap();
            assert_eq!(parsed, severity);
        }
        assert!("WARNING".parse::<Severity>().is_ok());
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        for severity in Severity::ALL {
            assert_eq!(format!("{}", severity), severity.as_str());
        }
    }
}
