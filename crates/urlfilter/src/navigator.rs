//! Navigation abstractions.
//!
//! The core never touches a browser or a router directly. It talks to a
//! [`Navigator`], which exposes the query component of the current location
//! and two ways of writing it. Hosts that support back/forward traversal
//! also implement [`History`].
//!
//! [`MemoryHistory`] is the in-process implementation used by the CLI and by
//! tests.

/// Access to the query component of the current location.
///
/// Queries are exchanged without a leading `?`.
pub trait Navigator {
    /// Returns the current query string.
    fn current_query(&self) -> String;

    /// Replaces the current entry's query without adding a history entry.
    fn replace_query(&mut self, query: &str);

    /// Adds a new history entry with the given query and makes it current.
    fn push_query(&mut self, query: &str);
}

/// A navigator with back/forward traversal.
pub trait History: Navigator {
    /// Moves one entry back. Returns `false` at the oldest entry.
    fn back(&mut self) -> bool;

    /// Moves one entry forward. Returns `false` at the newest entry.
    fn forward(&mut self) -> bool;
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
    fn current_query(&self) -> String {
        (**self).current_query()
    }

    fn replace_query(&mut self, query: &str) {
        (**self).replace_query(query)
    }

    fn push_query(&mut self, query: &str) {
        (**self).push_query(query)
    }
}

impl<N: History + ?Sized> History for &mut N {
    fn back(&mut self) -> bool {
        (**self).back()
    }

    fn forward(&mut self) -> bool {
        (**self).forward()
    }
}

/// In-memory session history.
///
/// Behaves like a browser tab: pushing while in the middle of the stack
/// discards the forward entries.
///
/// ```
/// use urlfilter::{History, MemoryHistory, Navigator};
///
/// let mut history = MemoryHistory::new("?region=Tokyo");
/// history.push_query("region=Osaka");
/// history.replace_query("region=Osaka&minSales=5");
/// assert_eq!(history.entries(), ["region=Tokyo", "region=Osaka&minSales=5"]);
///
/// assert!(history.back());
/// assert_eq!(history.current_query(), "region=Tokyo");
/// assert!(!history.back());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    /// Creates a history with a single entry.
    pub fn new(initial_query: &str) -> Self {
        MemoryHistory {
            entries: vec![strip_question_mark(initial_query).to_string()],
            cursor: 0,
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Index of the current entry.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns `true` if [`History::back`] would move.
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// Returns `true` if [`History::forward`] would move.
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        MemoryHistory::new("")
    }
}

impl Navigator for MemoryHistory {
    fn current_query(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn replace_query(&mut self, query: &str) {
        self.entries[self.cursor] = strip_question_mark(query).to_string();
    }

    fn push_query(&mut self, query: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(strip_question_mark(query).to_string());
        self.cursor += 1;
    }
}

impl History for MemoryHistory {
    fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        true
    }
}

fn strip_question_mark(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}
