//! In-memory drawing model: the host objects that carry formatted text.
//!
//! A drawing is persisted as JSON. Entities are tagged by `type`; only the
//! text-bearing kinds carry more than a handle and a layer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StripError};

/// Name of the text style attributes fall back to when fonts are stripped.
pub const STANDARD_TEXT_STYLE: &str = "Standard";

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// A whole drawing document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Drawing {
    /// Names of the text styles defined in the drawing.
    #[serde(default)]
    pub text_styles: Vec<String>,
    /// Layer table.
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Model-space entities in drawing order.
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Drawing {
    /// Read a drawing from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StripError::io(path, e))?;
        Self::from_json(&content)
            .map_err(|e| StripError::parse(format!("{}: {e}", path.display())))
    }

    /// Parse a drawing from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StripError::parse(e.to_string()))
    }

    /// Write the drawing as JSON.
    pub fn save(&self, path: &Path, pretty: bool) -> Result<()> {
        let content = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
        .map_err(|e| StripError::parse(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| StripError::io(path, e))
    }

    /// Whether a text style with this exact name exists.
    pub fn has_text_style(&self, name: &str) -> bool {
        self.text_styles.iter().any(|s| s == name)
    }
}

/// Layer table record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub locked: bool,
}

/// Whether `layer` is locked according to `layers`. Unknown layers are unlocked.
pub fn is_layer_locked(layers: &[Layer], layer: &str) -> bool {
    layers.iter().any(|l| l.name == layer && l.locked)
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Any entity in the drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Mtext(MText),
    Mleader(MLeader),
    Dimension(Dimension),
    BlockReference(BlockReference),
    Table(Table),
    Other(OtherEntity),
}

impl Entity {
    pub fn handle(&self) -> &str {
        match self {
            Self::Mtext(e) => &e.handle,
            Self::Mleader(e) => &e.handle,
            Self::Dimension(e) => &e.handle,
            Self::BlockReference(e) => &e.handle,
            Self::Table(e) => &e.handle,
            Self::Other(e) => &e.handle,
        }
    }

    pub fn layer(&self) -> &str {
        match self {
            Self::Mtext(e) => &e.layer,
            Self::Mleader(e) => &e.layer,
            Self::Dimension(e) => &e.layer,
            Self::BlockReference(e) => &e.layer,
            Self::Table(e) => &e.layer,
            Self::Other(e) => &e.layer,
        }
    }
}

/// Extension dictionary attached to an object. A field link lives here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtensionDictionary {
    /// Computed-field binding (`ACAD_FIELD` entry), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldLink>,
    /// A locked dictionary cannot be opened for write.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub erased: bool,
}

/// A computed field bound to an object's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLink {
    pub expression: String,
}

/// Multi-column layout of a paragraph text entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    #[default]
    None,
    Static,
    Dynamic,
}

/// Multiline paragraph text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MText {
    pub handle: String,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub background_fill: bool,
    /// Declared column width; zero means unbounded.
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub columns: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionDictionary>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub erased: bool,
}

/// Text sub-object embedded by value inside leaders and attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MTextValue {
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub background_fill: bool,
}

/// What a multileader carries at its landing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderContent {
    None,
    Block,
    #[default]
    Mtext,
}

/// Multileader annotation.
///
/// The embedded text is only reachable by value: [`MLeader::mtext`] returns a
/// copy and changes become visible only through [`MLeader::set_mtext`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MLeader {
    pub handle: String,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub content_type: LeaderContent,
    #[serde(default)]
    mtext: MTextValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionDictionary>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub erased: bool,
}

impl MLeader {
    pub fn new(handle: impl Into<String>, mtext: MTextValue) -> Self {
        Self {
            handle: handle.into(),
            mtext,
            ..Self::default()
        }
    }

    /// A copy of the embedded text object.
    pub fn mtext(&self) -> MTextValue {
        self.mtext.clone()
    }

    /// Replace the embedded text object as a whole.
    pub fn set_mtext(&mut self, mtext: MTextValue) {
        self.mtext = mtext;
    }
}

/// Dimension with an overridable label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub handle: String,
    #[serde(default)]
    pub layer: String,
    /// Label override; `<>` stands for the measured value.
    #[serde(default)]
    pub dimension_text: String,
    /// Text fill mode: 0 none, 1 background color, 2 explicit color.
    #[serde(default)]
    pub dimtfill: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionDictionary>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub erased: bool,
}

/// Block insert carrying attribute references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockReference {
    pub handle: String,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub attributes: Vec<AttributeReference>,
}

/// Attribute value attached to a block insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeReference {
    pub handle: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub text_string: String,
    /// Present only for multiline attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mtext_attribute: Option<MTextValue>,
    #[serde(default = "default_width_factor")]
    pub width_factor: f64,
    #[serde(default)]
    pub oblique: f64,
    #[serde(default = "default_text_style")]
    pub text_style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionDictionary>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub erased: bool,
}

fn default_width_factor() -> f64 {
    1.0
}
fn default_text_style() -> String {
    STANDARD_TEXT_STYLE.into()
}

impl AttributeReference {
    /// A single-line attribute.
    pub fn new(handle: impl Into<String>, tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            tag: tag.into(),
            layer: String::new(),
            text_string: text.into(),
            mtext_attribute: None,
            width_factor: default_width_factor(),
            oblique: 0.0,
            text_style: default_text_style(),
            extension: None,
            erased: false,
        }
    }

    /// A multiline attribute whose text lives in an embedded text object.
    pub fn multiline(handle: impl Into<String>, tag: impl Into<String>, mtext: MTextValue) -> Self {
        let mut attribute = Self::new(handle, tag, mtext.contents.clone());
        attribute.mtext_attribute = Some(mtext);
        attribute
    }

    pub fn is_mtext_attribute(&self) -> bool {
        self.mtext_attribute.is_some()
    }

    /// A copy of the embedded text object, for multiline attributes.
    pub fn mtext_attribute(&self) -> Option<MTextValue> {
        self.mtext_attribute.clone()
    }

    /// Replace the embedded text object as a whole.
    pub fn set_mtext_attribute(&mut self, mtext: MTextValue) {
        self.text_string = mtext.contents.clone();
        self.mtext_attribute = Some(mtext);
    }

    /// Set the attribute value. A multiline attribute keeps its embedded
    /// object's other properties.
    pub fn set_text_string(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(mut mtext) = self.mtext_attribute() {
            mtext.contents = text.clone();
            self.mtext_attribute = Some(mtext);
        }
        self.text_string = text;
    }
}

/// A grid of text cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub handle: String,
    #[serde(default)]
    pub layer: String,
    /// Row-major cell grid.
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub erased: bool,
}

/// One table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionDictionary>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extension: None,
        }
    }
}

/// Any entity that does not carry text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherEntity {
    pub handle: String,
    #[serde(default)]
    pub layer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "text_styles": ["Standard", "Annotative"],
        "layers": [{"name": "0"}, {"name": "frozen-notes", "locked": true}],
        "entities": [
            {"type": "mtext", "handle": "1A", "contents": "{\\C1;Red}", "width": 40.0, "columns": "static"},
            {"type": "mleader", "handle": "1B", "mtext": {"contents": "Note", "background_fill": true}},
            {"type": "dimension", "handle": "1C", "dimension_text": "<> mm", "dimtfill": 1,
             "extension": {"field": {"expression": "%<\\AcVar Date>%"}}},
            {"type": "block_reference", "handle": "1D", "attributes": [
                {"handle": "1E", "tag": "TITLE", "text_string": "T", "mtext_attribute": {"contents": "T"}}
            ]},
            {"type": "table", "handle": "1F", "rows": [[{"text": "a"}, {}]]},
            {"type": "other", "handle": "20"}
        ]
    }"#;

    #[test]
    fn parses_every_entity_kind() {
        let drawing = Drawing::from_json(SAMPLE).expect("parse");
        assert_eq!(drawing.entities.len(), 6);
        assert!(drawing.has_text_style(STANDARD_TEXT_STYLE));
        assert!(is_layer_locked(&drawing.layers, "frozen-notes"));
        assert!(!is_layer_locked(&drawing.layers, "missing"));

        let Entity::Mtext(mtext) = &drawing.entities[0] else {
            panic!("expected mtext");
        };
        assert_eq!(mtext.contents, "{\\C1;Red}");
        assert_eq!(mtext.columns, ColumnType::Static);

        let Entity::Mleader(leader) = &drawing.entities[1] else {
            panic!("expected mleader");
        };
        assert_eq!(leader.content_type, LeaderContent::Mtext);
        assert!(leader.mtext().background_fill);

        let Entity::BlockReference(block) = &drawing.entities[3] else {
            panic!("expected block reference");
        };
        assert!(block.attributes[0].is_mtext_attribute());
        assert_eq!(block.attributes[0].width_factor, 1.0);
        assert_eq!(drawing.entities[5].handle(), "20");
        assert_eq!(drawing.entities[5].layer(), "");
    }

    #[test]
    fn leader_text_is_by_value() {
        let mut leader = MLeader::new("A1", MTextValue {
            contents: "x".into(),
            background_fill: true,
        });

        let mut copy = leader.mtext();
        copy.background_fill = false;
        assert!(leader.mtext().background_fill);

        leader.set_mtext(copy);
        assert!(!leader.mtext().background_fill);
    }

    #[test]
    fn attribute_text_string_keeps_mask() {
        let mut attribute = AttributeReference::multiline("A2", "TAG", MTextValue {
            contents: "{\\C1;x}".into(),
            background_fill: true,
        });
        attribute.set_text_string("x");

        let mtext = attribute.mtext_attribute().expect("multiline");
        assert_eq!(mtext.contents, "x");
        assert!(mtext.background_fill);
        assert_eq!(attribute.text_string, "x");
    }

    #[test]
    fn unknown_entity_type_is_parse_error() {
        let err = Drawing::from_json(r#"{"entities": [{"type": "hatch", "handle": "1"}]}"#)
            .unwrap_err();
        assert!(matches!(err, StripError::Parse { .. }));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("drawing.json");

        let drawing = Drawing::from_json(SAMPLE).expect("parse");
        drawing.save(&path, true).expect("save");

        let reloaded = Drawing::load(&path).expect("load");
        assert_eq!(reloaded.entities.len(), drawing.entities.len());
        assert_eq!(reloaded.entities[2].handle(), "1C");
    }
}
