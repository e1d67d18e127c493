use std::fmt;

use crate::folder::FolderStats;

/// Represents the available output formats.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFmt {
    /// One sentence per folder.
    #[default]
    Plain,
    /// One comma-separated record per folder.
    Csv,
}

impl fmt::Display for OutputFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt = match *self {
            OutputFmt::Plain => "Plain",
            OutputFmt::Csv => "CSV",
        };
        write!(f, "{}", fmt)
    }
}

/// Formats a byte count as a short human readable size.
///
/// Divides by 1024 through B, K, M and G, keeping one decimal. Anything
/// still at 1024 or more after G renders with a T suffix, however large.
pub fn to_size(bytes: u64) -> String {
    let mut num = bytes as f64;
    for unit in ["B", "K", "M", "G"] {
        if num < 1024.0 {
            return format!("{num:3.1}{unit}");
        }
        num /= 1024.0;
    }
    format!("{num:3.1}T")
}

/// Renders one report line per measured folder.
#[derive(Clone, Copy, Debug)]
pub struct Report {
    fmt: OutputFmt,
    human_readable: bool,
}

impl Report {
    pub fn new(fmt: OutputFmt, human_readable: bool) -> Self {
        Self {
            fmt,
            human_readable,
        }
    }

    pub fn render(&self, folder: &str, stats: &FolderStats) -> String {
        let (size, biggest) = if self.human_readable {
            (to_size(stats.total_size), to_size(stats.max_size))
        } else {
            (stats.total_size.to_string(), stats.max_size.to_string())
        };

        match self.fmt {
            OutputFmt::Plain => format!(
                "{} Messages in {} taking up {} biggest message {}",
                stats.messages, folder, size, biggest
            ),
            OutputFmt::Csv => format!("{},{},{},{}", stats.messages, folder, size, biggest),
        }
    }
}
