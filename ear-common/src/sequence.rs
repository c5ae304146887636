//! Helpers over ordered sequences of unique items
//!
//! The pitch vocabularies are plain slices, so neighborhoods, distances and
//! wrap-around lookups are written once here and reused for both pitches
//! and pitch classes. Items are compared with `PartialEq`.

use crate::{Error, Result};
use rand::Rng;
use std::fmt::Debug;

fn index_of<T: PartialEq + Debug>(items: &[T], item: &T) -> Result<usize> {
    items
        .iter()
        .position(|candidate| candidate == item)
        .ok_or_else(|| Error::NotFound(format!("{:?} is not in the sequence", item)))
}

/// Gets `count` contiguous items around `anchor`.
///
/// The window starts `floor((count - 1) / 2)` items before the anchor, so an
/// even count includes one more item after the anchor than before it. Windows
/// that run off either edge are shifted back inside the slice. Asking for more
/// items than exist returns the whole slice.
///
/// ```
/// use ear_common::sequence::surrounding;
///
/// assert_eq!(surrounding(&[1, 2, 3, 4, 5, 6], &3, 4).unwrap(), vec![2, 3, 4, 5]);
/// assert_eq!(surrounding(&[1, 2, 3, 4, 5, 6], &5, 5).unwrap(), vec![2, 3, 4, 5, 6]);
/// ```
pub fn surrounding<T: PartialEq + Clone + Debug>(
    items: &[T],
    anchor: &T,
    count: usize,
) -> Result<Vec<T>> {
    let anchor_index = index_of(items, anchor)?;
    let start = anchor_index.saturating_sub(count.saturating_sub(1) / 2);
    let end = start + count;
    // Only the start needs adjusting; the end is clamped by the slice below.
    let start = if end <= items.len() {
        start
    } else {
        start.saturating_sub(end - items.len())
    };
    Ok(items[start..end.min(items.len())].to_vec())
}

/// Absolute index distance between two items.
pub fn distance<T: PartialEq + Debug>(items: &[T], a: &T, b: &T) -> Result<usize> {
    let index_a = index_of(items, a)?;
    let index_b = index_of(items, b)?;
    Ok(index_a.abs_diff(index_b))
}

/// Wraps an arbitrary signed index into `0..len`. Returns `None` for an empty sequence.
pub fn resolve_index(len: usize, index: i64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(index.rem_euclid(len as i64) as usize)
}

/// Gets the item `offset` positions away from `anchor`, wrapping around either end.
///
/// With `randomize_direction` the offset is negated half of the time, which keeps
/// generated questions from always moving upward.
pub fn item_at_offset<T: PartialEq + Clone + Debug>(
    items: &[T],
    anchor: &T,
    offset: i64,
    randomize_direction: bool,
) -> Result<T> {
    let anchor_index = index_of(items, anchor)?;
    let offset = if randomize_direction && rand::thread_rng().gen_bool(0.5) {
        -offset
    } else {
        offset
    };
    let index = resolve_index(items.len(), anchor_index as i64 + offset)
        .ok_or_else(|| Error::NotFound("sequence is empty".to_string()))?;
    Ok(items[index].clone())
}

/// The item before `anchor`, wrapping to the end.
pub fn item_before<T: PartialEq + Clone + Debug>(items: &[T], anchor: &T) -> Result<T> {
    item_at_offset(items, anchor, -1, false)
}

/// The item after `anchor`, wrapping to the beginning.
pub fn item_after<T: PartialEq + Clone + Debug>(items: &[T], anchor: &T) -> Result<T> {
    item_at_offset(items, anchor, 1, false)
}
