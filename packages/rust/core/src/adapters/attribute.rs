//! Multiline block attributes.

use mtextstrip_markup::{CodeSet, FormatCode};
use mtextstrip_shared::{AttributeReference, Result, STANDARD_TEXT_STYLE};

use super::{ContainerKind, ContentAdapter, TextSlot, detach_field, ensure_live};

pub struct AttributeText<'a> {
    attribute: &'a mut AttributeReference,
    /// Whether the drawing defines the `Standard` text style.
    standard_style: bool,
}

impl<'a> AttributeText<'a> {
    pub fn new(attribute: &'a mut AttributeReference, standard_style: bool) -> Self {
        Self {
            attribute,
            standard_style,
        }
    }
}

impl TextSlot for AttributeText<'_> {
    fn text(&self) -> Result<String> {
        Ok(self
            .attribute
            .mtext_attribute()
            .map(|mtext| mtext.contents)
            .unwrap_or_default())
    }

    fn set_text(&mut self, text: String) -> Result<()> {
        self.attribute.set_text_string(text);
        Ok(())
    }

    fn remove_field_link(&mut self) -> Result<bool> {
        Ok(detach_field(&mut self.attribute.extension))
    }
}

impl ContentAdapter for AttributeText<'_> {
    fn kind(&self) -> ContainerKind {
        ContainerKind::AttributeText
    }

    fn handle(&self) -> &str {
        &self.attribute.handle
    }

    fn slots(&mut self) -> Result<Vec<&mut dyn TextSlot>> {
        ensure_live(&self.attribute.handle, self.attribute.erased)?;
        Ok(vec![self as &mut dyn TextSlot])
    }

    fn set_mask(&mut self, enabled: bool) -> Result<bool> {
        ensure_live(&self.attribute.handle, self.attribute.erased)?;
        let Some(mut mtext) = self.attribute.mtext_attribute() else {
            return Ok(false);
        };
        mtext.background_fill = enabled;
        self.attribute.set_mtext_attribute(mtext);
        Ok(true)
    }

    fn reset_properties(&mut self, codes: &CodeSet) -> Result<()> {
        ensure_live(&self.attribute.handle, self.attribute.erased)?;

        if codes.contains(FormatCode::Width) {
            self.attribute.width_factor = 1.0;
        }
        if codes.contains(FormatCode::Oblique) {
            self.attribute.oblique = 0.0;
        }
        if codes.contains(FormatCode::Font) && self.standard_style {
            self.attribute.text_style = STANDARD_TEXT_STYLE.to_string();
        }
        Ok(())
    }
}
