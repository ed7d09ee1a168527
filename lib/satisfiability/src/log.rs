use std::fmt::Display;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum LogSeverity {
    Error,
    Warning,
}

/// Stable identifiers of the problems the validator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEntryCode {
    /// A field can not be reached from some path, with everything that was tried nested inside.
    Unsatisfiable,
    NodeTypeWithoutLookup,
    LookupArgumentUnmapped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub code: LogEntryCode,
    pub severity: LogSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<serde_json::Value>,
}

impl LogEntry {
    pub fn error(code: LogEntryCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: LogSeverity::Error,
            message: message.into(),
            extension: None,
        }
    }

    pub fn warning(code: LogEntryCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: LogSeverity::Warning,
            message: message.into(),
            extension: None,
        }
    }

    pub fn with_extension(mut self, extension: serde_json::Value) -> Self {
        self.extension = Some(extension);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == LogSeverity::Error
    }
}

/// Append-only list of the entries produced by one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompositionLog {
    entries: Vec<LogEntry>,
}

impl CompositionLog {
    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(LogEntry::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| !e.is_error())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a> IntoIterator for &'a CompositionLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for CompositionLog {
    type Item = LogEntry;
    type IntoIter = std::vec::IntoIter<LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Entries are separated by a blank line.
impl Display for CompositionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "\n\n")?;
            }
            write!(f, "{}", entry.message)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CompositionLog, LogEntry, LogEntryCode};

    #[test]
    fn renders_entries_separated_by_blank_line() {
        let mut log = CompositionLog::default();
        log.push(LogEntry::error(LogEntryCode::Unsatisfiable, "first.\n  nested."));
        log.push(LogEntry::warning(
            LogEntryCode::LookupArgumentUnmapped,
            "second.",
        ));

        assert_eq!(log.to_string(), "first.\n  nested.\n\nsecond.");
        assert_eq!(log.len(), 2);
        assert!(log.has_errors());
        assert_eq!(log.errors().count(), 1);
        assert_eq!(log.warnings().count(), 1);
    }

    #[test]
    fn warnings_alone_are_not_errors() {
        let mut log = CompositionLog::default();
        log.push(LogEntry::warning(
            LogEntryCode::LookupArgumentUnmapped,
            "warning.",
        ));

        assert!(!log.has_errors());
        assert!(!log.is_empty());
    }

    #[test]
    fn serializes_codes_and_extension() {
        let mut log = CompositionLog::default();
        log.push(
            LogEntry::error(LogEntryCode::NodeTypeWithoutLookup, "message.")
                .with_extension(serde_json::json!({ "type": "Cat" })),
        );

        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(
            json,
            r#"[{"code":"NODE_TYPE_WITHOUT_LOOKUP","severity":"Error","message":"message.","extension":{"type":"Cat"}}]"#
        );
        assert_eq!(LogEntryCode::Unsatisfiable.to_string(), "UNSATISFIABLE");
    }
}
