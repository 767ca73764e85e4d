//! Pure repositioning for Kanban columns.
//!
//! The UI expresses a drag as "put task X at index N of column C".
//! These routines turn that into new orderings and position values
//! without touching storage; callers persist the assignments.

/// Gap between consecutive positions, leaving room for future inserts
/// between neighbors without renumbering.
pub const POSITION_STEP: i64 = 100;

/// Reorder within one column: remove `task_id` and reinsert at `to_index`
/// (clamped to the end). Returns `None` when `task_id` is not present.
pub fn reorder_within(order: &[String], task_id: &str, to_index: usize) -> Option<Vec<String>> {
    let from = order.iter().position(|id| id == task_id)?;
    let mut next: Vec<String> = order.to_vec();
    let id = next.remove(from);
    let to = to_index.min(next.len());
    next.insert(to, id);
    Some(next)
}

/// Move `task_id` from `source` into `dest` at `to_index` (clamped).
/// Returns the new `(source, dest)` orderings, or `None` when `task_id`
/// is not in `source`.
pub fn move_between(
    source: &[String],
    dest: &[String],
    task_id: &str,
    to_index: usize,
) -> Option<(Vec<String>, Vec<String>)> {
    let from = source.iter().position(|id| id == task_id)?;
    let mut new_source: Vec<String> = source.to_vec();
    let id = new_source.remove(from);
    let mut new_dest: Vec<String> = dest.to_vec();
    let to = to_index.min(new_dest.len());
    new_dest.insert(to, id);
    Some((new_source, new_dest))
}

/// Spaced position values for a final ordering.
pub fn assign_positions(order: &[String]) -> Vec<(String, i64)> {
    order
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i as i64 * POSITION_STEP))
        .collect()
}
