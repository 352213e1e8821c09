use std::fmt;
use crate::error::ConfigMissing;
use crate::models::{GradeRecord, RecordId};

pub const NO_RECORDS_MESSAGE: &str = "No hay notas registradas.";
pub const LOAD_ERROR_MESSAGE: &str = "Error al cargar las notas. Revisa la consola.";
pub const MISSING_URL_MESSAGE: &str = "Introduce la URL de la API para ver las notas.";
pub const MISSING_KEY_MESSAGE: &str = "Introduce la API key para ver las notas.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Synced,
    Empty,
    StaleError,
    Unconfigured,
}

/// One line of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// A record, tagged with its id so it can be targeted by a delete.
    Grade { id: RecordId, text: String },
    Placeholder(String),
}

impl ListEntry {
    pub fn id(&self) -> Option<&RecordId> {
        match self {
            ListEntry::Grade { id, .. } => Some(id),
            ListEntry::Placeholder(_) => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ListEntry::Grade { text, .. } => text,
            ListEntry::Placeholder(text) => text,
        }
    }
}

/// The list as last rendered. Every render replaces it whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeList {
    entries: Vec<ListEntry>,
    state: ViewState,
}

impl GradeList {
    pub fn new() -> Self {
        GradeList {
            entries: Vec::new(),
            state: ViewState::Empty,
        }
    }

    pub fn render_records(&mut self, records: &[GradeRecord]) {
        if records.is_empty() {
            self.entries = vec![ListEntry::Placeholder(NO_RECORDS_MESSAGE.to_string())];
            self.state = ViewState::Empty;
            return;
        }

        self.entries = records
            .iter()
            .map(|record| ListEntry::Grade {
                id: record.id.clone(),
                text: record.to_string(),
            })
            .collect();
        self.state = ViewState::Synced;
    }

    pub fn render_error(&mut self) {
        self.entries = vec![ListEntry::Placeholder(LOAD_ERROR_MESSAGE.to_string())];
        self.state = ViewState::StaleError;
    }

    pub fn render_unconfigured(&mut self, missing: ConfigMissing) {
        let message = match missing {
            ConfigMissing::EndpointUrl => MISSING_URL_MESSAGE,
            ConfigMissing::ApiKey => MISSING_KEY_MESSAGE,
        };
        self.entries = vec![ListEntry::Placeholder(message.to_string())];
        self.state = ViewState::Unconfigured;
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Ids of the records currently shown, in display order.
    pub fn ids(&self) -> Vec<&RecordId> {
        self.entries.iter().filter_map(ListEntry::id).collect()
    }
}

impl Default for GradeList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GradeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry {
                ListEntry::Grade { id, text } => writeln!(f, "[{}] {}", id, text)?,
                ListEntry::Placeholder(text) => writeln!(f, "{}", text)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemoteGrade;

    fn record(id: &str, class: &str, student: &str, grade: i64) -> GradeRecord {
        GradeRecord {
            id: RecordId::new(id),
            class: class.to_string(),
            student: student.to_string(),
            grade: RemoteGrade::from(grade),
            date: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn empty_collection_renders_one_placeholder() {
        let mut list = GradeList::new();
        list.render_records(&[]);
        assert_eq!(list.entries(), [ListEntry::Placeholder(NO_RECORDS_MESSAGE.to_string())]);
        assert_eq!(list.state(), ViewState::Empty);
        assert!(list.ids().is_empty());
    }

    #[test]
    fn records_replace_previous_contents() {
        let mut list = GradeList::new();
        list.render_error();
        list.render_records(&[record("1", "Math", "Ana", 9), record("2", "Sci", "Leo", 4)]);

        assert_eq!(list.state(), ViewState::Synced);
        assert_eq!(list.entries().len(), 2);
        assert_eq!(list.entries()[0].text(), "Math (Ana) - Nota: 9");
        assert_eq!(list.ids(), [&RecordId::new("1"), &RecordId::new("2")]);
        assert_eq!(list.to_string(), "[1] Math (Ana) - Nota: 9\n[2] Sci (Leo) - Nota: 4\n");
    }

    #[test]
    fn unconfigured_names_the_missing_field() {
        let mut list = GradeList::new();
        list.render_unconfigured(ConfigMissing::ApiKey);
        assert_eq!(list.state(), ViewState::Unconfigured);
        assert_eq!(list.entries()[0].text(), MISSING_KEY_MESSAGE);
    }
}
