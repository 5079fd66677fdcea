use crate::model::{RowKind, StatementRow};
use std::collections::BTreeSet;

/// View-layer collapse state: the set of collapsed section ids. Never
/// persisted; the visible projection is recomputed from it on every render.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: BTreeSet<u32>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            collapsed: ids.into_iter().collect(),
        }
    }

    pub fn is_collapsed(&self, section_id: u32) -> bool {
        self.collapsed.contains(&section_id)
    }

    pub fn toggle(&mut self, section_id: u32) {
        if !self.collapsed.remove(&section_id) {
            self.collapsed.insert(section_id);
        }
    }

    /// Rebuilds the collapsed set from scratch over every section in `rows`.
    pub fn collapse_all(&mut self, rows: &[StatementRow]) {
        self.collapsed = rows.iter().filter_map(|r| r.section_id).collect();
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    pub fn collapsed_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.collapsed.iter().copied()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub row: &'a StatementRow,
    pub is_hidden: bool,
}

/// Project collapse state onto rows in document order. A section row stays
/// visible and starts hiding when its id is collapsed; a subtotal reached
/// while hiding is revealed and stops the hiding run; every other row
/// inherits the current hiding flag. Rows are flagged, never removed.
pub fn project<'a>(rows: &'a [StatementRow], state: &CollapseState) -> Vec<VisibleRow<'a>> {
    let mut hiding = false;
    rows.iter()
        .map(|row| {
            let is_hidden = match row.kind {
                RowKind::Section => {
                    hiding = row
                        .section_id
                        .map(|id| state.is_collapsed(id))
                        .unwrap_or(false);
                    false
                }
                RowKind::Subtotal if hiding => {
                    hiding = false;
                    false
                }
                _ => hiding,
            };
            VisibleRow { row, is_hidden }
        })
        .collect()
}
