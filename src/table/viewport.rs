use tracing::debug;

/// Viewports at or below this width render as cards
pub const NARROW_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

/// Live "max-width" media query.
///
/// Starts out wide until the first width is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportWatcher {
    breakpoint: u32,
    width: Option<u32>,
    narrow: bool,
}

impl ViewportWatcher {
    pub fn new(breakpoint: u32) -> Self {
        Self {
            breakpoint,
            width: None,
            narrow: false,
        }
    }

    pub fn breakpoint(&self) -> u32 {
        self.breakpoint
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow
    }

    pub fn mode(&self) -> ViewMode {
        if self.narrow {
            ViewMode::Cards
        } else {
            ViewMode::Table
        }
    }

    /// Report a new viewport width. Returns the new mode when the
    /// breakpoint was crossed.
    pub fn update(&mut self, width: u32) -> Option<ViewMode> {
        self.width = Some(width);
        let narrow = width <= self.breakpoint;
        if narrow == self.narrow {
            return None;
        }
        self.narrow = narrow;
        debug!(target: "layout", "Viewport {}px crossed breakpoint -> {:?}", width, self.mode());
        Some(self.mode())
    }
}

impl Default for ViewportWatcher {
    fn default() -> Self {
        Self::new(NARROW_BREAKPOINT_PX)
    }
}
