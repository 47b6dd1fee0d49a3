//! The activity label set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five recorded postures/movements.
///
/// Class indices are stable (`0..5` in declaration order) and are what
/// [`Dataset`](super::Dataset) stores per sample. The string forms match the
/// raw recording's label column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityClass {
    Sitting,
    SittingDown,
    Standing,
    StandingUp,
    Walking,
}

impl ActivityClass {
    /// Number of classes.
    pub const COUNT: usize = 5;

    /// All classes in index order.
    pub const ALL: [ActivityClass; Self::COUNT] = [
        ActivityClass::Sitting,
        ActivityClass::SittingDown,
        ActivityClass::Standing,
        ActivityClass::StandingUp,
        ActivityClass::Walking,
    ];

    /// Stable class index in `0..COUNT`.
    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Class for an index, if in range.
    #[inline]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// The label string as it appears in the raw recording.
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityClass::Sitting => "sitting",
            ActivityClass::SittingDown => "sittingdown",
            ActivityClass::Standing => "standing",
            ActivityClass::StandingUp => "standingup",
            ActivityClass::Walking => "walking",
        }
    }

    /// Label strings in index order, for report rendering.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl fmt::Display for ActivityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityClass {
    type Err = ();

    /// Parse a raw label. Tolerates the hyphenated spellings some exports use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sitting" => Ok(ActivityClass::Sitting),
            "sittingdown" | "sitting-down" => Ok(ActivityClass::SittingDown),
            "standing" => Ok(ActivityClass::Standing),
            "standingup" | "standing-up" => Ok(ActivityClass::StandingUp),
            "walking" => Ok(ActivityClass::Walking),
            _ => Err(()),
        }
    }
}
