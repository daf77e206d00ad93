//! Dimension labels.

use mtextstrip_shared::{Dimension, Result};

use super::{ContainerKind, ContentAdapter, TextSlot, detach_field, ensure_live};

/// Text fill mode that draws the drawing background behind the label.
const DIMTFILL_BACKGROUND: u8 = 1;

pub struct DimensionText<'a> {
    dimension: &'a mut Dimension,
}

impl<'a> DimensionText<'a> {
    pub fn new(dimension: &'a mut Dimension) -> Self {
        Self { dimension }
    }
}

impl TextSlot for DimensionText<'_> {
    fn text(&self) -> Result<String> {
        Ok(self.dimension.dimension_text.clone())
    }

    fn set_text(&mut self, text: String) -> Result<()> {
        self.dimension.dimension_text = text;
        Ok(())
    }

    fn remove_field_link(&mut self) -> Result<bool> {
        Ok(detach_field(&mut self.dimension.extension))
    }
}

impl ContentAdapter for DimensionText<'_> {
    fn kind(&self) -> ContainerKind {
        ContainerKind::DimensionText
    }

    fn handle(&self) -> &str {
        &self.dimension.handle
    }

    fn slots(&mut self) -> Result<Vec<&mut dyn TextSlot>> {
        ensure_live(&self.dimension.handle, self.dimension.erased)?;
        Ok(vec![self as &mut dyn TextSlot])
    }

    fn set_mask(&mut self, enabled: bool) -> Result<bool> {
        ensure_live(&self.dimension.handle, self.dimension.erased)?;
        self.dimension.dimtfill = if enabled { DIMTFILL_BACKGROUND } else { 0 };
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_maps_to_fill_mode() {
        let mut entity = Dimension {
            handle: "3C".into(),
            dimension_text: r"<>\P{\H0.7x;TYP}".into(),
            dimtfill: 2,
            ..Dimension::default()
        };

        let mut adapter = DimensionText::new(&mut entity);
        adapter.set_mask(false).expect("clear");
        adapter.set_text("<>".into()).expect("set");

        assert_eq!(entity.dimtfill, 0);
        assert_eq!(entity.dimension_text, "<>");

        DimensionText::new(&mut entity).set_mask(true).expect("set");
        assert_eq!(entity.dimtfill, DIMTFILL_BACKGROUND);
    }
}
