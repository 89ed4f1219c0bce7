use std::collections::{BTreeSet, HashSet};

use super::column::ColumnDef;

/// Session ordering of the columns the table shows.
///
/// Hidden-set filtering happens on top of this order, so hiding a column
/// and showing it again puts it back where it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleOrder {
    keys: Vec<String>,
    /// Keys of every definition seen so far, to tell new columns apart
    known: HashSet<String>,
}

impl VisibleOrder {
    /// Seed from the definitions whose `visible` flag is not false
    pub fn from_columns<T>(columns: &[ColumnDef<T>]) -> Self {
        let mut order = Self::default();
        for column in columns {
            order.known.insert(column.key.clone());
            if column.visible && !order.contains(&column.key) {
                order.keys.push(column.key.clone());
            }
        }
        order
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// React to a new set of definitions.
    ///
    /// Keys still defined keep their current order; definitions not seen
    /// before are appended in definition order when they start visible.
    pub fn reconcile<T>(&mut self, columns: &[ColumnDef<T>]) {
        let defined: HashSet<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        self.keys.retain(|k| defined.contains(k.as_str()));

        for column in columns {
            let is_new = self.known.insert(column.key.clone());
            if is_new && column.visible && !self.contains(&column.key) {
                self.keys.push(column.key.clone());
            }
        }
        self.known.retain(|k| defined.contains(k.as_str()));
    }

    /// Add a key at the end if it is not already ordered
    pub fn append(&mut self, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key.to_string());
        true
    }

    /// Keys that render, in order
    pub fn rendered<'a>(&'a self, hidden: &'a BTreeSet<String>) -> impl Iterator<Item = &'a str> {
        self.keys
            .iter()
            .filter(move |k| !hidden.contains(*k))
            .map(String::as_str)
    }

    /// Move the rendered column at `from` so it lands at rendered index `to`.
    ///
    /// Hidden keys keep their slots; only the rendered keys are permuted.
    pub fn move_rendered(&mut self, hidden: &BTreeSet<String>, from: usize, to: usize) -> bool {
        let slots: Vec<usize> = self
            .keys
            .iter()
            .enumerate()
            .filter(|(_, k)| !hidden.contains(*k))
            .map(|(i, _)| i)
            .collect();

        if from == to || from >= slots.len() || to >= slots.len() {
            return false;
        }

        let mut rendered: Vec<String> = slots.iter().map(|&i| self.keys[i].clone()).collect();
        let moved = rendered.remove(from);
        rendered.insert(to, moved);

        for (slot, key) in slots.into_iter().zip(rendered) {
            self.keys[slot] = key;
        }
        true
    }
}
