//! Target screen resolutions and their archive size budgets.

use std::fmt;
use std::str::FromStr;

/// A supported target screen resolution.
///
/// Declaration order is the packaging order when no single resolution is
/// requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 960x540 (qHD)
    Qhd,
    /// 1920x1080 (Full HD)
    FullHd,
}

impl Resolution {
    /// Every supported resolution, in declared order.
    pub const ALL: [Resolution; 2] = [Resolution::Qhd, Resolution::FullHd];

    /// String identifier used on the command line and in project file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Qhd => "960x540",
            Resolution::FullHd => "1920x1080",
        }
    }

    /// Maximum archive size in bytes for this resolution.
    ///
    /// 2.5 MiB for 960x540, 5 MiB for 1920x1080.
    pub fn max_archive_size(self) -> u64 {
        match self {
            Resolution::Qhd => 2_621_440,
            Resolution::FullHd => 5_242_880,
        }
    }

    /// All resolutions except `self`, in declared order.
    pub fn others(self) -> impl Iterator<Item = Resolution> {
        Self::ALL.into_iter().filter(move |r| *r != self)
    }

    /// Comma-separated list of identifiers, for help and error text.
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "Invalid size given {}. Supported resolutions: {}",
                    s,
                    Self::supported_list()
                )
            })
    }
}
