use time::OffsetDateTime;

/// Reply to `history` when nothing was received before it.
pub const NO_HISTORY: &str = "No commands yet.";

#[derive(Clone, Debug, PartialEq)]
pub struct CommandRecord {
    /// Trimmed message exactly as received, case preserved
    pub raw: String,
    pub received_at: OffsetDateTime,
}

/// Append-only log of every raw command received in a session.
#[derive(Clone, Debug, Default)]
pub struct CommandHistory {
    records: Vec<CommandRecord>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, raw: &str) {
        self.records.push(CommandRecord {
            raw: raw.to_string(),
            received_at: OffsetDateTime::now_utc(),
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    /// Newline-joined raw commands among the first `count` entries, oldest first.
    pub fn render_first(&self, count: usize) -> String {
        let entries = &self.records[..count.min(self.records.len())];
        if entries.is_empty() {
            return NO_HISTORY.to_string();
        }
        entries
            .iter()
            .map(|r| r.raw.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_has_placeholder() {
        let h = CommandHistory::new();
        assert!(h.is_empty());
        assert_eq!(h.render_first(h.len()), NO_HISTORY);
    }

    #[test]
    fn renders_oldest_first_with_case_preserved() {
        let mut h = CommandHistory::new();
        for raw in ["forward", "LEFT", "color"] {
            h.append(raw);
        }
        assert_eq!(h.render_first(h.len()), "forward\nLEFT\ncolor");
        assert_eq!(h.render_first(2), "forward\nLEFT");
        assert_eq!(h.render_first(0), NO_HISTORY);
        assert_eq!(h.render_first(10), "forward\nLEFT\ncolor");
    }

    #[test]
    fn timestamps_are_monotonic() {
        let mut h = CommandHistory::new();
        h.append("a");
        h.append("b");
        let r = h.records();
        assert!(r[0].received_at <= r[1].received_at);
    }
}
