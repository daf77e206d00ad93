//! Content adapters: one per kind of text-bearing container.
//!
//! The strip pipeline only ever talks to [`ContentAdapter`]. Each adapter wraps
//! a mutable borrow of a drawing entity and exposes its text as one or more
//! [`TextSlot`]s, plus the structural operations (field link, mask, columns)
//! that act on the entity rather than on its text.

mod attribute;
mod dimension;
mod leader;
mod plain;
mod table;

use std::fmt;

use mtextstrip_markup::CodeSet;
use mtextstrip_shared::{ExtensionDictionary, Result, StripError};

pub use attribute::AttributeText;
pub use dimension::DimensionText;
pub use leader::LeaderText;
pub use plain::PlainText;
pub use table::TableCellGrid;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// The container variants the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    PlainText,
    LeaderText,
    DimensionText,
    AttributeText,
    TableCellGrid,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlainText => "plain text",
            Self::LeaderText => "leader",
            Self::DimensionText => "dimension",
            Self::AttributeText => "attribute",
            Self::TableCellGrid => "table",
        };
        f.write_str(name)
    }
}

/// A single text value, optionally bound to a computed field.
pub trait TextSlot {
    /// Current text. Empty when the slot carries no text content.
    fn text(&self) -> Result<String>;

    /// Replace the text, keeping every other property of the owner.
    fn set_text(&mut self, text: String) -> Result<()>;

    /// Detach the computed-field binding.
    ///
    /// Returns `true` when the slot is now free of a binding (including when it
    /// never had one) and `false` when the binding is locked and was kept.
    fn remove_field_link(&mut self) -> Result<bool>;
}

/// Capability set of a text-bearing container.
pub trait ContentAdapter {
    fn kind(&self) -> ContainerKind;

    /// Entity handle, for logging and error reports.
    fn handle(&self) -> &str;

    /// Text slots in order. Single-text containers return themselves; a table
    /// returns its populated cells in row-major order.
    fn slots(&mut self) -> Result<Vec<&mut dyn TextSlot>>;

    /// Turn the background mask on or off. Returns `false` when the container
    /// has no mask to toggle.
    fn set_mask(&mut self, enabled: bool) -> Result<bool>;

    /// Drop multi-column layout. Returns whether anything changed.
    fn remove_column_layout(&mut self) -> Result<bool> {
        Ok(false)
    }

    /// Reset entity properties that duplicate the stripped text codes.
    fn reset_properties(&mut self, _codes: &CodeSet) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Fail when the entity behind an adapter has been erased.
pub(crate) fn ensure_live(handle: &str, erased: bool) -> Result<()> {
    if erased {
        return Err(StripError::host(handle, "entity is erased"));
    }
    Ok(())
}

/// Remove the field entry from an extension dictionary.
///
/// No dictionary, or an erased one, means there is nothing to detach. A
/// locked dictionary cannot be opened for write and keeps its field.
pub(crate) fn detach_field(extension: &mut Option<ExtensionDictionary>) -> bool {
    match extension {
        Some(dict) if !dict.erased => {
            if dict.locked {
                return false;
            }
            dict.field = None;
            true
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use mtextstrip_shared::FieldLink;

    use super::*;

    fn linked(locked: bool, erased: bool) -> Option<ExtensionDictionary> {
        Some(ExtensionDictionary {
            field: Some(FieldLink {
                expression: "%<\\AcVar Filename>%".into(),
            }),
            locked,
            erased,
        })
    }

    #[test]
    fn detach_field_without_dictionary_is_noop() {
        let mut extension = None;
        assert!(detach_field(&mut extension));
        assert!(extension.is_none());
    }

    #[test]
    fn detach_field_clears_binding() {
        let mut extension = linked(false, false);
        assert!(detach_field(&mut extension));
        assert!(extension.as_ref().is_some_and(|d| d.field.is_none()));
    }

    #[test]
    fn detach_field_reports_locked_dictionary() {
        let mut extension = linked(true, false);
        assert!(!detach_field(&mut extension));
        assert!(extension.as_ref().is_some_and(|d| d.field.is_some()));
    }

    #[test]
    fn detach_field_ignores_erased_dictionary() {
        let mut extension = linked(true, true);
        assert!(detach_field(&mut extension));
    }

    #[test]
    fn erased_entity_is_host_error() {
        let err = ensure_live("3A", true).unwrap_err();
        assert!(matches!(err, StripError::Host { ref handle, .. } if handle == "3A"));
        assert!(ensure_live("3A", false).is_ok());
    }
}
