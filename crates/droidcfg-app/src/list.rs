// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ModelRecord;
use crate::window::{Scrollbar, clamp_offset, padded_offset, scrollbar};

/// Rows above the first record: action hints, select-all hint, rule, title.
pub const LIST_HEADER_LINES: usize = 4;
pub const DEFAULT_SCROLL_PADDING: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub record: ModelRecord,
    pub selected: bool,
}

/// Slice of the list currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleWindow<'a> {
    pub first_index: usize,
    pub rows: &'a [ListItem],
    pub has_above: bool,
    pub has_below: bool,
    pub scrollbar: Option<Scrollbar>,
}

/// Cursor, selection and scroll state over the ordered model records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelList {
    items: Vec<ListItem>,
    cursor: usize,
    offset: usize,
    width: usize,
    height: usize,
    padding: usize,
}

impl Default for ModelList {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_PADDING)
    }
}

impl ModelList {
    pub fn new(padding: usize) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            offset: 0,
            width: 0,
            height: 0,
            padding,
        }
    }

    /// Replaces every record. Selection resets and the cursor is clamped.
    pub fn load(&mut self, records: Vec<ModelRecord>) {
        self.items = records
            .into_iter()
            .map(|record| ListItem {
                record,
                selected: false,
            })
            .collect();
        self.clamp_cursor();
        self.offset = clamp_offset(self.cursor, self.offset, self.len(), self.visible_height());
    }

    pub fn records(&self) -> Vec<ModelRecord> {
        self.items.iter().map(|item| item.record.clone()).collect()
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `None` when the list is empty.
    pub fn cursor(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.cursor)
    }

    pub const fn scroll_offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.rescroll();
    }

    /// Header rows actually drawn; shrinks on short panes but leaves a row
    /// for records whenever the pane is taller than one line.
    pub fn header_lines(&self) -> usize {
        match self.height {
            0 => 0,
            1 => 1,
            height => LIST_HEADER_LINES.min(height - 1),
        }
    }

    pub fn visible_height(&self) -> usize {
        self.height.saturating_sub(self.header_lines())
    }

    /// Moves the cursor by `delta` rows; boundaries do not wrap.
    pub fn move_cursor(&mut self, delta: isize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let Some(target) = self.cursor.checked_add_signed(delta) else {
            return false;
        };
        if target >= self.items.len() || target == self.cursor {
            return false;
        }
        self.cursor = target;
        self.rescroll();
        true
    }

    pub fn toggle_selected(&mut self) {
        if let Some(item) = self.items.get_mut(self.cursor) {
            item.selected = !item.selected;
        }
    }

    /// Clears every flag when all records are selected, otherwise sets them.
    pub fn toggle_select_all(&mut self) {
        let select = !self.all_selected();
        for item in &mut self.items {
            item.selected = select;
        }
    }

    pub fn all_selected(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.selected)
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| item.selected.then_some(index))
            .collect()
    }

    pub fn current(&self) -> Option<&ModelRecord> {
        self.items.get(self.cursor).map(|item| &item.record)
    }

    pub fn update_current(&mut self, record: ModelRecord) -> bool {
        match self.items.get_mut(self.cursor) {
            Some(item) => {
                item.record = record;
                true
            }
            None => false,
        }
    }

    pub fn add(&mut self, record: ModelRecord) {
        self.items.push(ListItem {
            record,
            selected: false,
        });
        self.cursor = self.items.len() - 1;
        self.rescroll();
    }

    /// Removes every selected record and returns how many went away.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.selected);
        let removed = before - self.items.len();
        if removed > 0 {
            self.clamp_cursor();
            self.rescroll();
        }
        removed
    }

    pub fn delete_current(&mut self) -> bool {
        if self.cursor >= self.items.len() {
            return false;
        }
        self.items.remove(self.cursor);
        self.clamp_cursor();
        self.rescroll();
        true
    }

    pub fn move_current_up(&mut self) -> bool {
        if self.cursor == 0 || self.cursor >= self.items.len() {
            return false;
        }
        self.items.swap(self.cursor, self.cursor - 1);
        self.cursor -= 1;
        self.rescroll();
        true
    }

    pub fn move_current_down(&mut self) -> bool {
        if self.cursor + 1 >= self.items.len() {
            return false;
        }
        self.items.swap(self.cursor, self.cursor + 1);
        self.cursor += 1;
        self.rescroll();
        true
    }

    pub fn visible_window(&self) -> VisibleWindow<'_> {
        let visible = self.visible_height();
        let len = self.items.len();
        let start = self.offset.min(len);
        let end = (start + visible).min(len);
        VisibleWindow {
            first_index: start,
            rows: &self.items[start..end],
            has_above: start > 0,
            has_below: end < len,
            scrollbar: scrollbar(len, visible, self.offset),
        }
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }

    fn rescroll(&mut self) {
        self.offset = padded_offset(
            self.cursor,
            self.offset,
            self.items.len(),
            self.visible_height(),
            self.padding,
        );
    }
}
