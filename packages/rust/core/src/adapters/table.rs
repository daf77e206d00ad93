//! Tables, exposed as a grid of text slots.

use mtextstrip_shared::{Cell, Result, Table};

use super::{ContainerKind, ContentAdapter, TextSlot, detach_field, ensure_live};

pub struct TableCellGrid<'a> {
    table: &'a mut Table,
}

impl<'a> TableCellGrid<'a> {
    pub fn new(table: &'a mut Table) -> Self {
        Self { table }
    }
}

impl TextSlot for Cell {
    fn text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: String) -> Result<()> {
        self.text = text;
        Ok(())
    }

    fn remove_field_link(&mut self) -> Result<bool> {
        Ok(detach_field(&mut self.extension))
    }
}

impl ContentAdapter for TableCellGrid<'_> {
    fn kind(&self) -> ContainerKind {
        ContainerKind::TableCellGrid
    }

    fn handle(&self) -> &str {
        &self.table.handle
    }

    /// Populated cells, row by row. Empty cells are skipped.
    fn slots(&mut self) -> Result<Vec<&mut dyn TextSlot>> {
        ensure_live(&self.table.handle, self.table.erased)?;
        Ok(self
            .table
            .rows
            .iter_mut()
            .flatten()
            .filter(|cell| !cell.text.is_empty())
            .map(|cell| cell as &mut dyn TextSlot)
            .collect())
    }

    fn set_mask(&mut self, _enabled: bool) -> Result<bool> {
        ensure_live(&self.table.handle, self.table.erased)?;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Table {
        Table {
            handle: "5A".into(),
            rows: vec![
                vec![Cell::new("a"), Cell::new("")],
                vec![Cell::new("c"), Cell::new("d")],
            ],
            ..Table::default()
        }
    }

    #[test]
    fn slots_are_populated_cells_in_row_order() {
        let mut table = grid();
        let mut adapter = TableCellGrid::new(&mut table);

        let texts: Vec<String> = adapter
            .slots()
            .expect("live")
            .into_iter()
            .map(|slot| slot.text().expect("text"))
            .collect();
        assert_eq!(texts, vec!["a", "c", "d"]);
    }

    #[test]
    fn writes_land_in_cells() {
        let mut table = grid();
        let mut adapter = TableCellGrid::new(&mut table);
        for slot in adapter.slots().expect("live") {
            let upper = slot.text().expect("text").to_uppercase();
            slot.set_text(upper).expect("set");
        }

        assert_eq!(table.rows[0][0].text, "A");
        assert_eq!(table.rows[0][1].text, "");
        assert_eq!(table.rows[1][1].text, "D");
    }
}
