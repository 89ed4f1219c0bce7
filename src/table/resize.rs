//! Column resize gesture: `Idle -> Resizing -> Idle`.

use tracing::{debug, trace};

use super::width::{floor_live_width, MIN_COLUMN_WIDTH};

/// Captured while a resize handle is held
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeState {
    pub column: String,
    pub start_x: i32,
    pub start_width: u16,
    /// Lowest width the gesture may reach, at least 100
    pub floor: u16,
    /// `None` until the pointer has moved
    pub current_width: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResizeGesture {
    #[default]
    Idle,
    Resizing(ResizeState),
}

impl ResizeGesture {
    pub fn is_active(&self) -> bool {
        matches!(self, ResizeGesture::Resizing(_))
    }

    pub fn column(&self) -> Option<&str> {
        match self {
            ResizeGesture::Resizing(state) => Some(&state.column),
            ResizeGesture::Idle => None,
        }
    }

    /// Live width for `key`, if that column is under an active gesture
    pub fn live_width(&self, key: &str) -> Option<u16> {
        match self {
            ResizeGesture::Resizing(state) if state.column == key => state.current_width,
            _ => None,
        }
    }

    /// Press on a resize handle
    pub fn begin(&mut self, column: impl Into<String>, x: i32, start_width: u16, floor: u16) {
        let column = column.into();
        debug!(target: "layout", "Resize start on '{}' at x={} width={}", column, x, start_width);
        *self = ResizeGesture::Resizing(ResizeState {
            column,
            start_x: x,
            start_width,
            floor: floor.max(MIN_COLUMN_WIDTH),
            current_width: None,
        });
    }

    /// Pointer moved while resizing. Returns the new live width.
    pub fn update(&mut self, x: i32) -> Option<u16> {
        let ResizeGesture::Resizing(state) = self else {
            return None;
        };
        let width = floor_live_width(state.start_width, x - state.start_x, state.floor);
        trace!(target: "layout", "Resizing '{}' to {}", state.column, width);
        state.current_width = Some(width);
        Some(width)
    }

    /// Pointer released. Returns `(column, width)` to commit, or `None`
    /// when nothing moved. Always returns to `Idle`.
    pub fn release(&mut self) -> Option<(String, u16)> {
        let ResizeGesture::Resizing(state) = std::mem::take(self) else {
            return None;
        };
        let width = state.current_width?;
        Some((state.column, width.max(state.floor)))
    }

    /// Abandon without committing
    pub fn cancel(&mut self) {
        if let ResizeGesture::Resizing(state) = std::mem::take(self) {
            debug!(target: "layout", "Resize of '{}' abandoned", state.column);
        }
    }
}
