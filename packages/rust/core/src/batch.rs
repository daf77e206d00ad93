//! Grouping of selected entities into adapters, by container kind.

use std::collections::HashSet;

use mtextstrip_shared::{Drawing, Entity, LeaderContent, STANDARD_TEXT_STYLE, is_layer_locked};
use tracing::{debug, warn};

use crate::adapters::{
    AttributeText, ContentAdapter, DimensionText, LeaderText, PlainText, TableCellGrid,
};

/// The containers touched by one strip run.
///
/// A batch borrows the drawing mutably and lives only as long as the run.
#[derive(Default)]
pub struct Batch<'a> {
    plain: Vec<PlainText<'a>>,
    leaders: Vec<LeaderText<'a>>,
    dimensions: Vec<DimensionText<'a>>,
    attributes: Vec<AttributeText<'a>>,
    tables: Vec<TableCellGrid<'a>>,
    missing: Vec<String>,
}

/// Number of containers per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCounts {
    pub plain: usize,
    pub leaders: usize,
    pub dimensions: usize,
    pub attributes: usize,
    pub tables: usize,
}

impl<'a> Batch<'a> {
    /// Collect the text-bearing entities of `drawing`.
    ///
    /// With `handles`, only those entities are taken; without, every entity is.
    /// Nothing on a locked layer is taken. Leaders are taken only when they
    /// carry text. Attributes are taken from block references when they are
    /// multiline.
    pub fn from_drawing(drawing: &'a mut Drawing, handles: Option<&[String]>) -> Self {
        let standard_style = drawing.has_text_style(STANDARD_TEXT_STYLE);
        let Drawing {
            layers, entities, ..
        } = drawing;
        let wanted: Option<HashSet<&str>> =
            handles.map(|hs| hs.iter().map(String::as_str).collect());
        let mut found: HashSet<String> = HashSet::new();
        let mut batch = Self::default();

        for entity in entities.iter_mut() {
            if let Some(wanted) = &wanted {
                if !wanted.contains(entity.handle()) {
                    continue;
                }
                found.insert(entity.handle().to_string());
            }

            // Entities on a locked layer cannot be opened for write.
            if is_layer_locked(layers.as_slice(), entity.layer()) {
                debug!(handle = %entity.handle(), layer = %entity.layer(), "skipping entity on locked layer");
                continue;
            }

            match entity {
                Entity::Mtext(mtext) => batch.plain.push(PlainText::new(mtext)),
                Entity::Mleader(leader) => {
                    if leader.content_type == LeaderContent::Mtext {
                        batch.leaders.push(LeaderText::new(leader));
                    } else {
                        debug!(handle = %leader.handle, "skipping leader without text content");
                    }
                }
                Entity::Dimension(dimension) => {
                    batch.dimensions.push(DimensionText::new(dimension));
                }
                Entity::Table(table) => batch.tables.push(TableCellGrid::new(table)),
                Entity::BlockReference(block) => {
                    for attribute in block.attributes.iter_mut() {
                        if !attribute.is_mtext_attribute() {
                            continue;
                        }
                        if is_layer_locked(layers.as_slice(), &attribute.layer) {
                            debug!(handle = %attribute.handle, layer = %attribute.layer, "skipping attribute on locked layer");
                            continue;
                        }
                        batch
                            .attributes
                            .push(AttributeText::new(attribute, standard_style));
                    }
                }
                Entity::Other(_) => {}
            }
        }

        if let Some(handles) = handles {
            for handle in handles {
                if !found.contains(handle) && !batch.missing.contains(handle) {
                    warn!(%handle, "selected handle not found in drawing");
                    batch.missing.push(handle.clone());
                }
            }
        }

        let counts = batch.counts();
        debug!(?counts, "batch built");
        batch
    }

    /// Whether there is nothing to strip.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of containers.
    pub fn len(&self) -> usize {
        let counts = self.counts();
        counts.plain + counts.leaders + counts.dimensions + counts.attributes + counts.tables
    }

    pub fn counts(&self) -> BatchCounts {
        BatchCounts {
            plain: self.plain.len(),
            leaders: self.leaders.len(),
            dimensions: self.dimensions.len(),
            attributes: self.attributes.len(),
            tables: self.tables.len(),
        }
    }

    /// Selected handles that matched no entity.
    pub fn missing_handles(&self) -> &[String] {
        &self.missing
    }

    /// Every container: plain text, leaders, dimensions, attributes, tables.
    pub fn containers_mut(&mut self) -> impl Iterator<Item = &mut dyn ContentAdapter> {
        let plain = self.plain.iter_mut().map(|c| c as &mut dyn ContentAdapter);
        let leaders = self.leaders.iter_mut().map(|c| c as &mut dyn ContentAdapter);
        let dimensions = self
            .dimensions
            .iter_mut()
            .map(|c| c as &mut dyn ContentAdapter);
        let attributes = self
            .attributes
            .iter_mut()
            .map(|c| c as &mut dyn ContentAdapter);
        let tables = self.tables.iter_mut().map(|c| c as &mut dyn ContentAdapter);

        plain
            .chain(leaders)
            .chain(dimensions)
            .chain(attributes)
            .chain(tables)
    }
}

#[cfg(test)]
mod tests {
    use mtextstrip_shared::{AttributeReference, BlockReference, Layer, MLeader, MText, MTextValue};

    use super::*;
    use crate::adapters::ContainerKind;

    fn drawing() -> Drawing {
        let mut locked = AttributeReference::multiline("31", "B", MTextValue::default());
        locked.layer = "locked".into();

        let mut block_leader = MLeader::new("21", MTextValue::default());
        block_leader.content_type = LeaderContent::Block;

        Drawing {
            text_styles: vec![STANDARD_TEXT_STYLE.into()],
            layers: vec![Layer {
                name: "locked".into(),
                locked: true,
            }],
            entities: vec![
                Entity::Mtext(MText {
                    handle: "10".into(),
                    ..MText::default()
                }),
                Entity::Mleader(MLeader::new("20", MTextValue::default())),
                Entity::Mleader(block_leader),
                Entity::BlockReference(BlockReference {
                    handle: "30".into(),
                    layer: String::new(),
                    attributes: vec![
                        AttributeReference::multiline("32", "A", MTextValue::default()),
                        locked,
                        AttributeReference::new("33", "C", "single line"),
                    ],
                }),
                Entity::Other(mtextstrip_shared::OtherEntity {
                    handle: "40".into(),
                    layer: String::new(),
                }),
            ],
        }
    }

    #[test]
    fn groups_text_bearing_entities() {
        let mut drawing = drawing();
        let batch = Batch::from_drawing(&mut drawing, None);

        assert_eq!(
            batch.counts(),
            BatchCounts {
                plain: 1,
                leaders: 1,
                dimensions: 0,
                attributes: 1,
                tables: 0,
            }
        );
        assert_eq!(batch.len(), 3);
        assert!(batch.missing_handles().is_empty());
    }

    #[test]
    fn handle_filter_and_missing_handles() {
        let mut drawing = drawing();
        let handles = vec!["20".to_string(), "99".to_string(), "99".to_string()];
        let mut batch = Batch::from_drawing(&mut drawing, Some(&handles));

        let kinds: Vec<ContainerKind> = batch.containers_mut().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec![ContainerKind::LeaderText]);
        assert_eq!(batch.missing_handles(), ["99".to_string()]);
    }

    #[test]
    fn non_text_selection_is_empty() {
        let mut drawing = drawing();
        let handles = vec!["21".to_string(), "40".to_string()];
        let batch = Batch::from_drawing(&mut drawing, Some(&handles));
        assert!(batch.is_empty());
    }

    #[test]
    fn locked_layer_entities_are_skipped() {
        let mut drawing = Drawing {
            layers: vec![Layer {
                name: "locked".into(),
                locked: true,
            }],
            entities: vec![
                Entity::Mtext(MText {
                    handle: "10".into(),
                    layer: "locked".into(),
                    contents: "x".into(),
                    ..MText::default()
                }),
                Entity::Dimension(mtextstrip_shared::Dimension {
                    handle: "11".into(),
                    layer: "locked".into(),
                    ..mtextstrip_shared::Dimension::default()
                }),
                Entity::BlockReference(BlockReference {
                    handle: "12".into(),
                    layer: "locked".into(),
                    attributes: vec![AttributeReference::multiline(
                        "13",
                        "A",
                        MTextValue::default(),
                    )],
                }),
                Entity::Mtext(MText {
                    handle: "14".into(),
                    layer: "open".into(),
                    ..MText::default()
                }),
            ],
            ..Drawing::default()
        };

        let mut batch = Batch::from_drawing(&mut drawing, None);
        let handles: Vec<String> = batch
            .containers_mut()
            .map(|c| c.handle().to_string())
            .collect();
        assert_eq!(handles, vec!["14"]);
    }

    #[test]
    fn containers_come_in_kind_order() {
        let mut drawing = drawing();
        let mut batch = Batch::from_drawing(&mut drawing, None);
        let handles: Vec<String> = batch
            .containers_mut()
            .map(|c| c.handle().to_string())
            .collect();
        assert_eq!(handles, vec!["10", "20", "32"]);
    }
}
