// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Windowed-view arithmetic shared by the model list and the edit form.

/// Half-open range `[start, end)` of items that are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Views this short get no scroll padding.
pub const MIN_PADDED_VISIBLE: usize = 4;

/// Scroll padding actually applied for a view of `visible` rows.
pub fn effective_padding(padding: usize, visible: usize) -> usize {
    if visible < MIN_PADDED_VISIBLE {
        return 0;
    }
    padding.min((visible - 1) / 2)
}

/// New scroll offset that keeps `cursor` at least `padding` rows away from
/// either edge of a `visible`-row view over `len` items.
pub fn padded_offset(
    cursor: usize,
    offset: usize,
    len: usize,
    visible: usize,
    padding: usize,
) -> usize {
    if visible == 0 {
        return 0;
    }
    let padding = effective_padding(padding, visible);
    let mut offset = offset;
    if cursor < offset + padding {
        offset = cursor.saturating_sub(padding);
    }
    if cursor + padding >= offset + visible {
        offset = (cursor + padding + 1).saturating_sub(visible);
    }
    offset.min(len.saturating_sub(visible))
}

/// [`padded_offset`] without padding: the smallest move that shows `cursor`.
pub fn clamp_offset(cursor: usize, offset: usize, len: usize, visible: usize) -> usize {
    padded_offset(cursor, offset, len, visible, 0)
}

/// Picks the run of whole blocks to draw so that block `focus` is visible.
///
/// Starting from the first block, the window grows greedily forward while
/// the summed heights (plus `gap` rows between neighbours) fit in
/// `available`; the start moves down one block at a time until the window
/// includes `focus`. Returns `None` when not even the focused block fits.
pub fn fit_blocks(heights: &[usize], focus: usize, available: usize, gap: usize) -> Option<Window> {
    if focus >= heights.len() {
        return None;
    }
    for start in 0..=focus {
        let mut used = 0;
        let mut end = start;
        while end < heights.len() {
            let cost = heights[end] + if end > start { gap } else { 0 };
            if used + cost > available {
                break;
            }
            used += cost;
            end += 1;
        }
        if focus < end {
            return Some(Window { start, end });
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scrollbar {
    pub thumb_start: usize,
    pub thumb_len: usize,
}

impl Scrollbar {
    pub const fn is_thumb(&self, row: usize) -> bool {
        row >= self.thumb_start && row < self.thumb_start + self.thumb_len
    }
}

/// Proportional thumb for `total` items shown `visible` at a time, or `None`
/// when everything fits.
pub fn scrollbar(total: usize, visible: usize, offset: usize) -> Option<Scrollbar> {
    if visible == 0 || total <= visible {
        return None;
    }
    let thumb_len = (visible * visible / total).clamp(1, visible);
    let max_offset = total - visible;
    let thumb_start = offset.min(max_offset) * (visible - thumb_len) / max_offset;
    Some(Scrollbar {
        thumb_start,
        thumb_len,
    })
}
