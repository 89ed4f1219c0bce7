use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::store::{load_or_default, save, LayoutStore};

/// User layout preferences for one table, persisted per table identity.
///
/// `hidden_columns` only ever changes through an explicit toggle; a column
/// definition's own `visible` flag never lands here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutState {
    pub column_widths: BTreeMap<String, u16>,
    pub hidden_columns: BTreeSet<String>,
}

impl LayoutState {
    pub fn load(store: &dyn LayoutStore, table_id: &str) -> Self {
        Self {
            column_widths: load_or_default(store, &Self::widths_key(table_id)),
            hidden_columns: load_or_default(store, &Self::hidden_key(table_id)),
        }
    }

    pub fn save_widths(&self, store: &dyn LayoutStore, table_id: &str) {
        save(store, &Self::widths_key(table_id), &self.column_widths);
    }

    pub fn save_hidden(&self, store: &dyn LayoutStore, table_id: &str) {
        save(store, &Self::hidden_key(table_id), &self.hidden_columns);
    }

    pub fn width_override(&self, key: &str) -> Option<u16> {
        self.column_widths.get(key).copied()
    }

    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden_columns.contains(key)
    }

    /// Flip `key` in the hidden set. Returns true if it is now hidden.
    pub fn toggle_hidden(&mut self, key: &str) -> bool {
        if self.hidden_columns.remove(key) {
            false
        } else {
            self.hidden_columns.insert(key.to_string());
            true
        }
    }

    pub fn widths_key(table_id: &str) -> String {
        format!("{}.columnWidths", table_id)
    }

    pub fn hidden_key(table_id: &str) -> String {
        format!("{}.hiddenColumns", table_id)
    }
}
