//! The user's category selection and where it is persisted.

use std::collections::BTreeMap;

use mtextstrip_markup::{CodeSet, FormatCode};
use mtextstrip_shared::AppConfig;

/// Key-value persistence for per-category selection flags.
pub trait SelectionStore {
    /// Stored flag for `code`, if any was ever saved.
    fn load(&self, code: FormatCode) -> Option<bool>;

    fn save(&mut self, code: FormatCode, selected: bool);
}

/// Selection flags live in the `[strip_formats]` table of the config file.
impl SelectionStore for AppConfig {
    fn load(&self, code: FormatCode) -> Option<bool> {
        self.selection_flag(code.as_char())
    }

    fn save(&mut self, code: FormatCode, selected: bool) {
        self.set_selection_flag(code.as_char(), selected);
    }
}

/// One selected/unselected flag per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSelection {
    flags: BTreeMap<FormatCode, bool>,
}

impl FormatSelection {
    /// Read every category from `store`. Categories never saved are unselected.
    pub fn load(store: &impl SelectionStore) -> Self {
        let flags = FormatCode::ALL
            .into_iter()
            .map(|code| (code, store.load(code).unwrap_or(false)))
            .collect();
        Self { flags }
    }

    /// Exactly `codes` selected.
    pub fn from_codes(codes: &CodeSet) -> Self {
        let flags = FormatCode::ALL
            .into_iter()
            .map(|code| (code, codes.contains(code)))
            .collect();
        Self { flags }
    }

    /// Write every category to `store`.
    pub fn save(&self, store: &mut impl SelectionStore) {
        for (&code, &selected) in &self.flags {
            store.save(code, selected);
        }
    }

    pub fn is_selected(&self, code: FormatCode) -> bool {
        self.flags.get(&code).copied().unwrap_or(false)
    }

    pub fn set(&mut self, code: FormatCode, selected: bool) {
        self.flags.insert(code, selected);
    }

    /// The selected categories.
    pub fn codes(&self) -> CodeSet {
        self.flags
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(code, _)| *code)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct MemoryStore(HashMap<FormatCode, bool>);

    impl SelectionStore for MemoryStore {
        fn load(&self, code: FormatCode) -> Option<bool> {
            self.0.get(&code).copied()
        }

        fn save(&mut self, code: FormatCode, selected: bool) {
            self.0.insert(code, selected);
        }
    }

    #[test]
    fn absent_values_default_to_unselected() {
        let mut store = MemoryStore::default();
        store.save(FormatCode::Color, true);

        let selection = FormatSelection::load(&store);
        assert!(selection.is_selected(FormatCode::Color));
        assert!(!selection.is_selected(FormatCode::Font));
        assert_eq!(selection.codes().to_string(), "C");
    }

    #[test]
    fn save_writes_every_category() {
        let (codes, _) = CodeSet::parse("SK");
        let mut store = MemoryStore::default();
        FormatSelection::from_codes(&codes).save(&mut store);

        assert_eq!(store.0.len(), 19);
        assert_eq!(store.load(FormatCode::Stacking), Some(true));
        assert_eq!(store.load(FormatCode::Height), Some(false));
    }

    #[test]
    fn config_file_is_a_store() {
        let mut config = AppConfig::default();
        let mut selection = FormatSelection::load(&config);
        selection.set(FormatCode::ParagraphAlignment, true);
        selection.save(&mut config);

        assert_eq!(config.strip_formats.get("X"), Some(&true));
        assert_eq!(config.strip_formats.get("A"), Some(&false));
        assert_eq!(FormatSelection::load(&config), selection);
    }
}
