//! Decides whether a directory entry is a displayable image.

/// Suffix an entry must carry to be shown.
pub const IMAGE_SUFFIX: &str = ".png";
/// Entries starting with this prefix are hidden files and never shown.
pub const HIDDEN_PREFIX: &str = ".";

/// Suffix/prefix predicate over entry names. Comparisons ignore ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFilter {
    suffix: String,
    hidden_prefix: String,
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self::new(IMAGE_SUFFIX, HIDDEN_PREFIX)
    }
}

impl EntryFilter {
    pub fn new(suffix: impl Into<String>, hidden_prefix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            hidden_prefix: hidden_prefix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn hidden_prefix(&self) -> &str {
        &self.hidden_prefix
    }

    pub fn qualifies(&self, name: &str) -> bool {
        has_suffix(name, &self.suffix) && !has_prefix(name, &self.hidden_prefix)
    }
}

/// `qualifies` with the stock `.png` / `.` pair.
pub fn qualifies(name: &str) -> bool {
    has_suffix(name, IMAGE_SUFFIX) && !has_prefix(name, HIDDEN_PREFIX)
}

pub fn has_suffix(name: &str, suffix: &str) -> bool {
    let (name, suffix) = (name.as_bytes(), suffix.as_bytes());
    if name.is_empty() || suffix.len() > name.len() {
        return false;
    }
    name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

pub fn has_prefix(name: &str, prefix: &str) -> bool {
    let (name, prefix) = (name.as_bytes(), prefix.as_bytes());
    if name.is_empty() || prefix.len() > name.len() {
        return false;
    }
    name[..prefix.len()].eq_ignore_ascii_case(prefix)
}
