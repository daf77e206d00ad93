//! Multileader annotations.
//!
//! The leader's text object is embedded by value, so every change goes
//! through copy, modify, replace.

use mtextstrip_shared::{LeaderContent, MLeader, Result};
use tracing::debug;

use super::{ContainerKind, ContentAdapter, TextSlot, detach_field, ensure_live};

pub struct LeaderText<'a> {
    leader: &'a mut MLeader,
}

impl<'a> LeaderText<'a> {
    pub fn new(leader: &'a mut MLeader) -> Self {
        Self { leader }
    }

    fn has_text(&self) -> bool {
        self.leader.content_type == LeaderContent::Mtext
    }
}

impl TextSlot for LeaderText<'_> {
    fn text(&self) -> Result<String> {
        if !self.has_text() {
            return Ok(String::new());
        }
        Ok(self.leader.mtext().contents)
    }

    fn set_text(&mut self, text: String) -> Result<()> {
        if !self.has_text() {
            debug!(handle = %self.leader.handle, "leader carries no text, skipping write");
            return Ok(());
        }
        let mut mtext = self.leader.mtext();
        mtext.contents = text;
        self.leader.set_mtext(mtext);
        Ok(())
    }

    fn remove_field_link(&mut self) -> Result<bool> {
        Ok(detach_field(&mut self.leader.extension))
    }
}

impl ContentAdapter for LeaderText<'_> {
    fn kind(&self) -> ContainerKind {
        ContainerKind::LeaderText
    }

    fn handle(&self) -> &str {
        &self.leader.handle
    }

    fn slots(&mut self) -> Result<Vec<&mut dyn TextSlot>> {
        ensure_live(&self.leader.handle, self.leader.erased)?;
        Ok(vec![self as &mut dyn TextSlot])
    }

    fn set_mask(&mut self, enabled: bool) -> Result<bool> {
        ensure_live(&self.leader.handle, self.leader.erased)?;
        let mut mtext = self.leader.mtext();
        mtext.background_fill = enabled;
        self.leader.set_mtext(mtext);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use mtextstrip_shared::MTextValue;

    use super::*;

    fn leader() -> MLeader {
        MLeader::new("2B", MTextValue {
            contents: r"{\Farial;Note}".into(),
            background_fill: true,
        })
    }

    #[test]
    fn set_text_replaces_embedded_object() {
        let mut entity = leader();
        let mut adapter = LeaderText::new(&mut entity);
        adapter.set_text("Note".into()).expect("set");

        let mtext = entity.mtext();
        assert_eq!(mtext.contents, "Note");
        assert!(mtext.background_fill);
    }

    #[test]
    fn mask_cleared_through_copy() {
        let mut entity = leader();
        assert!(LeaderText::new(&mut entity).set_mask(false).expect("ok"));

        let mtext = entity.mtext();
        assert!(!mtext.background_fill);
        assert_eq!(mtext.contents, r"{\Farial;Note}");
    }

    #[test]
    fn block_content_has_no_text() {
        let mut entity = leader();
        entity.content_type = LeaderContent::Block;
        let mut adapter = LeaderText::new(&mut entity);

        assert_eq!(adapter.text().expect("text"), "");
        adapter.set_text("ignored".into()).expect("set");
        assert_eq!(entity.mtext().contents, r"{\Farial;Note}");
    }
}
