use crate::filter::EntryFilter;

/// Cyclic cursor over a directory snapshot captured once at startup.
///
/// The sequence never ends: the cursor wraps back to the first entry after the
/// last one. An empty snapshot has no valid cursor and every lookup yields
/// `None`.
#[derive(Debug, Clone, Default)]
pub struct FileSelector {
    entries: Vec<String>,
    cursor: usize,
}

impl FileSelector {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// Entry at `index`, wrapped modulo the snapshot size so a stale cursor
    /// still resolves.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries
            .get(index % self.entries.len())
            .map(String::as_str)
    }

    pub fn advance(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.entries.len();
    }

    /// Walks forward from the cursor to the next entry accepted by `filter`,
    /// leaving the cursor just past it.
    ///
    /// At most `len()` entries are examined, so a snapshot without a single
    /// qualifying entry reports `None` after one full lap instead of spinning.
    pub fn next_qualifying(&mut self, filter: &EntryFilter) -> Option<String> {
        for _ in 0..self.entries.len() {
            let candidate = self
                .name_at(self.current_index())
                .filter(|name| !name.is_empty() && filter.qualifies(name))
                .map(str::to_owned);
            self.advance();
            if candidate.is_some() {
                return candidate;
            }
        }
        None
    }
}

impl FromIterator<String> for FileSelector {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
