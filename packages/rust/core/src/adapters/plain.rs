//! Paragraph text entities.

use mtextstrip_shared::{ColumnType, MText, Result};

use super::{ContainerKind, ContentAdapter, TextSlot, detach_field, ensure_live};

/// Adapter over a paragraph text entity. The only kind with column layout.
pub struct PlainText<'a> {
    mtext: &'a mut MText,
}

impl<'a> PlainText<'a> {
    pub fn new(mtext: &'a mut MText) -> Self {
        Self { mtext }
    }
}

impl TextSlot for PlainText<'_> {
    fn text(&self) -> Result<String> {
        Ok(self.mtext.contents.clone())
    }

    fn set_text(&mut self, text: String) -> Result<()> {
        self.mtext.contents = text;
        Ok(())
    }

    fn remove_field_link(&mut self) -> Result<bool> {
        Ok(detach_field(&mut self.mtext.extension))
    }
}

impl ContentAdapter for PlainText<'_> {
    fn kind(&self) -> ContainerKind {
        ContainerKind::PlainText
    }

    fn handle(&self) -> &str {
        &self.mtext.handle
    }

    fn slots(&mut self) -> Result<Vec<&mut dyn TextSlot>> {
        ensure_live(&self.mtext.handle, self.mtext.erased)?;
        Ok(vec![self as &mut dyn TextSlot])
    }

    fn set_mask(&mut self, enabled: bool) -> Result<bool> {
        ensure_live(&self.mtext.handle, self.mtext.erased)?;
        self.mtext.background_fill = enabled;
        Ok(true)
    }

    fn remove_column_layout(&mut self) -> Result<bool> {
        ensure_live(&self.mtext.handle, self.mtext.erased)?;
        // Column type only applies to text with a declared width.
        if self.mtext.width > 0.0 && self.mtext.columns != ColumnType::None {
            self.mtext.columns = ColumnType::None;
            return Ok(true);
        }
        Ok(false)
    }
}
