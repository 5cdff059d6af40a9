use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::{self, Display};

/// Page state of a rendered streamlinks embed.
///
/// Nothing about a listing is stored, the marker is written into the embed
/// footer on render and parsed back from it when somebody reacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMarker {
    pub subject: String,
    pub current: usize,
    pub total: usize,
}

impl PageMarker {
    pub fn new(subject: &str, current: usize, total: usize) -> PageMarker {
        PageMarker {
            subject: subject.to_lowercase(),
            current,
            total,
        }
    }

    /// Parses the part of a footer after the author, e.g.
    /// `[IZP] Page: 2 / 5`.
    pub fn parse(text: &str) -> Option<PageMarker> {
        lazy_static! {
            static ref RE: Regex =
                Regex::new(r"^\[([^\]]*)\]\s*Page:\s*(\d+)\s*/\s*(\d+)").unwrap();
        }
        let caps = RE.captures(text.trim())?;
        Some(PageMarker {
            subject: caps[1].to_lowercase(),
            current: caps[2].parse().ok()?,
            total: caps[3].parse().ok()?,
        })
    }

    /// Finds the marker in a whole footer, `<author> | <marker>`.
    ///
    /// Every `|` is tried in turn so a display name containing one doesn't
    /// hide the marker.
    pub fn from_footer(footer: &str) -> Option<PageMarker> {
        footer
            .match_indices('|')
            .find_map(|(idx, _)| PageMarker::parse(&footer[idx + 1..]))
    }

    pub fn footer(&self, author: &str) -> String {
        format!("{author} | {self}")
    }
}

impl Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Page: {} / {}",
            self.subject.to_uppercase(),
            self.current,
            self.total
        )
    }
}
