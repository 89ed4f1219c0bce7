//! Layout table
//!
//! A headless table component: it owns column layout state (widths, hidden
//! set, session order) and the resize/reorder gestures, and produces a
//! render model that a front end draws. Data fetching, filtering and
//! pagination belong to the host.

pub mod column;
pub mod layout_state;
pub mod layout_table;
pub mod overflow;
pub mod reorder;
pub mod resize;
pub mod row;
pub mod store;
pub mod view;
pub mod viewport;
pub mod visible_order;
pub mod width;

pub use column::{CellRenderer, ColumnDef};
pub use layout_state::LayoutState;
pub use layout_table::{LayoutTable, TableOptions};
pub use overflow::{overflows, CellContent, CellMeasure, Measure};
pub use reorder::{DragProxy, DragState, ReorderGesture};
pub use resize::{ResizeGesture, ResizeState};
pub use row::{CellValue, TableRow};
pub use store::{FileLayoutStore, LayoutStore, MemoryLayoutStore, UnavailableStore};
pub use view::{BodyCell, BodyRow, Card, CardField, CardsView, DesktopView, HeaderCell, TableBody, TableView};
pub use viewport::{ViewMode, ViewportWatcher, NARROW_BREAKPOINT_PX};
pub use visible_order::VisibleOrder;
pub use width::{DEFAULT_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
