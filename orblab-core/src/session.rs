//! SessionClock — the trading day's fixed time windows.
//!
//! Defaults match the NSE cash session: 09:15–15:30 regular hours,
//! 09:15–09:30 opening range, 09:45–14:30 entry window. All bounds are
//! inclusive.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Clock-time boundaries of one trading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    /// First minute of regular trading.
    #[serde(default = "default_open")]
    pub open: NaiveTime,
    /// Last minute of regular trading.
    #[serde(default = "default_close")]
    pub close: NaiveTime,
    /// End of the opening-range window (its start is `open`).
    #[serde(default = "default_opening_range_end")]
    pub opening_range_end: NaiveTime,
    /// Earliest bar that may trigger an entry.
    #[serde(default = "default_entry_start")]
    pub entry_start: NaiveTime,
    /// Latest bar that may trigger an entry.
    #[serde(default = "default_entry_end")]
    pub entry_end: NaiveTime,
}

fn default_open() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 15, 0).unwrap()
}

fn default_close() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 30, 0).unwrap()
}

fn default_opening_range_end() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 30, 0).unwrap()
}

fn default_entry_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 45, 0).unwrap()
}

fn default_entry_end() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 30, 0).unwrap()
}

impl Default for SessionClock {
    fn default() -> Self {
        Self {
            open: default_open(),
            close: default_close(),
            opening_range_end: default_opening_range_end(),
            entry_start: default_entry_start(),
            entry_end: default_entry_end(),
        }
    }
}

impl SessionClock {
    /// True if `t` falls inside regular session hours.
    pub fn in_session(&self, t: NaiveTime) -> bool {
        self.open <= t && t <= self.close
    }

    /// True if `t` falls inside the opening-range window.
    pub fn in_opening_range(&self, t: NaiveTime) -> bool {
        self.open <= t && t <= self.opening_range_end
    }

    /// True if `t` falls inside the configured entry window.
    pub fn in_entry_window(&self, t: NaiveTime) -> bool {
        self.entry_start <= t && t <= self.entry_end
    }
}
