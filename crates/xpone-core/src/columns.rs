// ── Table column customization ──
//
// Per-table view state: which columns are shown, their order, widths and
// pinning. Persisted through `crate::settings` under `table.<tableId>`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MIN_COLUMN_WIDTH: u32 = 40;
pub const MAX_COLUMN_WIDTH: u32 = 800;

/// Static description of a column a table can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: &'static str,
    pub label: &'static str,
    pub default_visible: bool,
    pub pinnable: bool,
}

impl ColumnDef {
    pub const fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            default_visible: true,
            pinnable: true,
        }
    }

    /// Available but hidden until the user turns it on.
    pub const fn hidden(mut self) -> Self {
        self.default_visible = false;
        self
    }

    pub const fn unpinnable(mut self) -> Self {
        self.pinnable = false;
        self
    }
}

/// User-customized view state of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableState {
    pub visible_columns: Vec<String>,
    pub column_order: Vec<String>,
    pub column_widths: BTreeMap<String, u32>,
    pub pinned_columns: Vec<String>,
    pub current_view: Option<String>,
}

impl TableState {
    /// The out-of-the-box layout for `columns`.
    pub fn defaults(columns: &[ColumnDef]) -> Self {
        Self {
            visible_columns: columns
                .iter()
                .filter(|c| c.default_visible)
                .map(|c| c.id.to_owned())
                .collect(),
            column_order: columns.iter().map(|c| c.id.to_owned()).collect(),
            ..Self::default()
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible_columns.iter().any(|c| c == id)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned_columns.iter().any(|c| c == id)
    }

    fn knows(&self, id: &str) -> bool {
        self.column_order.iter().any(|c| c == id)
    }

    /// Show or hide `id`. Refuses to hide the last visible column.
    /// Returns whether anything changed.
    pub fn toggle_column(&mut self, id: &str) -> bool {
        if !self.knows(id) {
            return false;
        }
        if self.is_visible(id) {
            if self.visible_columns.len() <= 1 {
                return false;
            }
            self.visible_columns.retain(|c| c != id);
        } else {
            self.visible_columns.push(id.to_owned());
        }
        true
    }

    /// Move `id` to position `to` in the column order (clamped to the end).
    pub fn move_column(&mut self, id: &str, to: usize) -> bool {
        let Some(from) = self.column_order.iter().position(|c| c == id) else {
            return false;
        };
        let column = self.column_order.remove(from);
        let to = to.min(self.column_order.len());
        self.column_order.insert(to, column);
        from != to
    }

    /// Set a column width in pixels, clamped to the allowed range.
    /// Returns the width actually stored.
    pub fn set_width(&mut self, id: &str, width: u32) -> u32 {
        let width = width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        self.column_widths.insert(id.to_owned(), width);
        width
    }

    pub fn width(&self, id: &str) -> Option<u32> {
        self.column_widths.get(id).copied()
    }

    /// Pin `id` to the leading edge. Only pinnable columns can be pinned.
    pub fn pin(&mut self, columns: &[ColumnDef], id: &str) -> bool {
        let pinnable = columns.iter().any(|c| c.id == id && c.pinnable);
        if !pinnable || self.is_pinned(id) {
            return false;
        }
        self.pinned_columns.push(id.to_owned());
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let before = self.pinned_columns.len();
        self.pinned_columns.retain(|c| c != id);
        before != self.pinned_columns.len()
    }

    /// Back to the default layout. The current view name is kept.
    pub fn reset(&mut self, columns: &[ColumnDef]) {
        let view = self.current_view.take();
        *self = Self::defaults(columns);
        self.current_view = view;
    }

    /// Align stored state with the current column set: unknown ids are
    /// dropped, new columns are appended with their default visibility.
    pub fn reconcile(&mut self, columns: &[ColumnDef]) {
        let known = |id: &String| columns.iter().any(|c| c.id == id);
        self.column_order.retain(known);
        self.visible_columns.retain(known);
        self.pinned_columns.retain(known);
        self.column_widths.retain(|id, _| known(id));

        for column in columns {
            if !self.knows(column.id) {
                self.column_order.push(column.id.to_owned());
                if column.default_visible {
                    self.visible_columns.push(column.id.to_owned());
                }
            }
        }

        if self.visible_columns.is_empty() {
            if let Some(first) = self.column_order.first() {
                self.visible_columns.push(first.clone());
            }
        }
    }

    /// Visible column ids for rendering: pinned first, then the rest, each
    /// group in column order.
    pub fn visible_in_order(&self) -> Vec<&str> {
        let visible = self
            .column_order
            .iter()
            .filter(|id| self.is_visible(id))
            .map(String::as_str);
        let (mut pinned, rest): (Vec<&str>, Vec<&str>) =
            visible.partition(|id| self.is_pinned(id));
        pinned.extend(rest);
        pinned
    }
}
