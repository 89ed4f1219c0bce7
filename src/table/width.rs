use super::column::ColumnDef;

/// Width used when neither an override nor a column default exists
pub const DEFAULT_COLUMN_WIDTH: u16 = 150;
/// Floor for committed resizes and for columns without a `min_width`
pub const MIN_COLUMN_WIDTH: u16 = 100;

/// Clamp a width to `[min or MIN_COLUMN_WIDTH, max or unbounded]`.
///
/// When a column declares `min > max` the max bound wins.
pub fn clamp_width(width: u16, min_width: Option<u16>, max_width: Option<u16>) -> u16 {
    let floored = width.max(min_width.unwrap_or(MIN_COLUMN_WIDTH));
    match max_width {
        Some(max) => floored.min(max),
        None => floored,
    }
}

/// Resolve the width a column renders at.
///
/// Precedence: live resize width, persisted override, column default,
/// global default. The result is always clamped.
pub fn resolve_width<T>(column: &ColumnDef<T>, live: Option<u16>, persisted: Option<u16>) -> u16 {
    let base = live
        .or(persisted)
        .or(column.width)
        .unwrap_or(DEFAULT_COLUMN_WIDTH);
    clamp_width(base, column.min_width, column.max_width)
}

/// Lowest width a resize of this column may commit: its `min_width` when
/// that is above 100, capped by `max_width`, and never below 100
pub fn resize_floor<T>(column: &ColumnDef<T>) -> u16 {
    clamp_width(MIN_COLUMN_WIDTH, column.min_width, column.max_width).max(MIN_COLUMN_WIDTH)
}

/// Width the live preview and the commit share: never below `floor`
pub fn floor_live_width(start_width: u16, delta: i32, floor: u16) -> u16 {
    let floor = floor.max(MIN_COLUMN_WIDTH);
    let raw = i32::from(start_width) + delta;
    raw.clamp(i32::from(floor), i32::from(u16::MAX)) as u16
}
