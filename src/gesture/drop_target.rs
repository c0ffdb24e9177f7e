use serde::{Deserialize, Serialize};

/// Vertical extent of one row, `top` inclusive, `bottom` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowBounds {
    /// Position of the row in the rendered view
    pub index: usize,
    pub top: f64,
    pub bottom: f64,
}

impl RowBounds {
    pub fn contains(&self, y: f64) -> bool {
        self.top <= y && y < self.bottom
    }
}

/// Pick the row a drag at height `y` would drop onto.
///
/// - Over a sibling row: that row.
/// - Over the dragged row itself: no target.
/// - Above the first row or below the last: the edge row, unless it is the
///   dragged row.
/// - In a gap between rows: the previous target is kept.
pub fn find_drop_target(
    rows: &[RowBounds],
    origin_index: usize,
    y: f64,
    previous: Option<usize>,
) -> Option<usize> {
    let not_origin = |row: &RowBounds| (row.index != origin_index).then_some(row.index);

    if let Some(row) = rows.iter().find(|r| r.contains(y)) {
        return not_origin(row);
    }

    let topmost = rows.iter().min_by(|a, b| a.top.total_cmp(&b.top));
    let bottommost = rows.iter().max_by(|a, b| a.bottom.total_cmp(&b.bottom));
    match (topmost, bottommost) {
        (Some(top), _) if y < top.top => not_origin(top),
        (_, Some(bottom)) if y >= bottom.bottom => not_origin(bottom),
        _ => previous,
    }
}
