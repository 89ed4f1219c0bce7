//! Column reorder gesture: `Idle -> Dragging -> Idle`.
//!
//! The gesture tracks column keys, not rendered positions. Positions are
//! resolved against the rendered order at drop time, so hiding or showing
//! other columns mid-drag cannot retarget it.

use tracing::{debug, trace};

/// Ephemeral state of an active header drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub source_key: String,
    pub target_key: Option<String>,
    pub start_x: i32,
    pub current_x: i32,
    /// Rendered width of the dragged header, for the floating proxy
    pub column_width: u16,
}

/// Floating copy of the dragged header. Purely cosmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragProxy {
    pub source_key: String,
    pub x: i32,
    pub width: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReorderGesture {
    #[default]
    Idle,
    Dragging(DragState),
}

impl ReorderGesture {
    pub fn is_active(&self) -> bool {
        matches!(self, ReorderGesture::Dragging(_))
    }

    pub fn state(&self) -> Option<&DragState> {
        match self {
            ReorderGesture::Dragging(state) => Some(state),
            ReorderGesture::Idle => None,
        }
    }

    pub fn source_key(&self) -> Option<&str> {
        self.state().map(|s| s.source_key.as_str())
    }

    pub fn proxy(&self) -> Option<DragProxy> {
        self.state().map(|s| DragProxy {
            source_key: s.source_key.clone(),
            x: s.current_x,
            width: s.column_width,
        })
    }

    pub fn begin(&mut self, key: &str, x: i32, column_width: u16) {
        debug!(target: "layout", "Drag start on column '{}' at x={}", key, x);
        *self = ReorderGesture::Dragging(DragState {
            source_key: key.to_string(),
            target_key: None,
            start_x: x,
            current_x: x,
            column_width,
        });
    }

    /// Pointer is over the header of `key`.
    ///
    /// Returns true only when the target actually changed; re-entering the
    /// current target just moves the proxy.
    pub fn drag_over(&mut self, key: &str, x: i32) -> bool {
        let ReorderGesture::Dragging(state) = self else {
            return false;
        };
        state.current_x = x;
        if state.target_key.as_deref() == Some(key) {
            return false;
        }
        trace!(target: "layout", "Drag target -> '{}'", key);
        state.target_key = Some(key.to_string());
        true
    }

    /// Pointer moved somewhere that is not a header cell
    pub fn move_proxy(&mut self, x: i32) {
        if let ReorderGesture::Dragging(state) = self {
            state.current_x = x;
        }
    }

    /// Drop. Returns `(source, target)` keys when the order should change.
    pub fn end(&mut self) -> Option<(String, String)> {
        let ReorderGesture::Dragging(state) = std::mem::take(self) else {
            return None;
        };
        match state.target_key {
            Some(target) if target != state.source_key => Some((state.source_key, target)),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        if let ReorderGesture::Dragging(state) = std::mem::take(self) {
            debug!(target: "layout", "Drag of column '{}' abandoned", state.source_key);
        }
    }
}
