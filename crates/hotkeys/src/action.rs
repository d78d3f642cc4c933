use std::{fmt, str::FromStr};

use crate::Error;

/// Every action the profile screen exposes a hotkey for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    /// Start the scheduler when idle, stop it when running.
    ToggleRun,
    /// Write the profile's log buffer to a file.
    ExportLog,
    /// Toggle auto-scrolling of the log view.
    ToggleScroll,
    /// Open the hotkey settings surface.
    OpenHotkeys,
}

impl Action {
    /// All actions in display order.
    pub const ALL: [Self; 4] = [
        Self::ToggleRun,
        Self::ExportLog,
        Self::ToggleScroll,
        Self::OpenHotkeys,
    ];

    /// Stable id used in binding records and handler sets.
    pub const fn id(self) -> &'static str {
        match self {
            Self::ToggleRun => "toggle-run",
            Self::ExportLog => "export-log",
            Self::ToggleScroll => "toggle-scroll",
            Self::OpenHotkeys => "open-hotkeys",
        }
    }

    /// Translation key for the action's display label.
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::ToggleRun => "hotkey.toggleRun",
            Self::ExportLog => "hotkey.exportLog",
            Self::ToggleScroll => "hotkey.toggleScroll",
            Self::OpenHotkeys => "hotkey.openHotkeys",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}
