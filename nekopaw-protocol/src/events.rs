//! Input event kinds reported by input adapters

use serde::{Deserialize, Serialize};

/// Kind of a normalized input event
///
/// "No event" is expressed as `Option::None` by the polling side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Short press and release
    Click,
    /// Two clicks within the double-click window
    DoubleClick,
    /// Held past the long-press threshold
    LongPress,
    /// Released after a long press
    Release,
}

impl EventKind {
    /// Name used in JSON payloads
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DoubleClick => "double_click",
            EventKind::LongPress => "long_press",
            EventKind::Release => "release",
        }
    }
}
