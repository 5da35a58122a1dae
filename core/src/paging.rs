// bazaar/src/paging.rs

//! Page arithmetic shared by the local page cursors and the server-side page queries.
//! Pages are 1-based throughout.

use serde::{Deserialize, Serialize};
use std::ops::Range;

pub fn total_pages(total: usize, per_page: usize) -> usize {
  if per_page == 0 {
    return 0;
  }
  total.div_ceil(per_page)
}

/// Index range of `page` within `total` items, clipped to the data.
pub fn page_range(page: usize, per_page: usize, total: usize) -> Range<usize> {
  let start = page.saturating_sub(1).saturating_mul(per_page).min(total);
  let end = start.saturating_add(per_page).min(total);
  start..end
}

/// Query parameters for a server-side page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  #[serde(default = "first_page")]
  pub page: usize,
  #[serde(default, rename = "q")]
  pub query: String,
}

fn first_page() -> usize {
  1
}

impl Default for PageRequest {
  fn default() -> Self {
    Self {
      page: first_page(),
      query: String::new(),
    }
  }
}

impl PageRequest {
  pub fn new(page: usize, query: impl Into<String>) -> Self {
    Self {
      page: page.max(1),
      query: query.into(),
    }
  }

  pub fn offset(&self, per_page: usize) -> usize {
    self.page.max(1).saturating_sub(1).saturating_mul(per_page)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page: usize,
  pub per_page: usize,
  pub total: usize,
  pub total_pages: usize,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, page: usize, per_page: usize, total: usize) -> Self {
    Self {
      items,
      page: page.max(1),
      per_page,
      total,
      total_pages: total_pages(total, per_page),
    }
  }
}

/// A page cursor over a locally held collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
  current: usize,
  per_page: usize,
}

impl Pager {
  pub fn new(per_page: usize) -> Self {
    Self { current: 1, per_page }
  }

  pub fn current(&self) -> usize {
    self.current
  }

  pub fn per_page(&self) -> usize {
    self.per_page
  }

  pub fn total_pages(&self, total: usize) -> usize {
    total_pages(total, self.per_page)
  }

  pub fn range(&self, total: usize) -> Range<usize> {
    page_range(self.current, self.per_page, total)
  }

  pub fn has_previous(&self) -> bool {
    self.current > 1
  }

  pub fn has_next(&self, total: usize) -> bool {
    self.current.saturating_mul(self.per_page) < total
  }

  /// Moves to `page` when it lies in `1..=total_pages`. Returns whether the cursor moved.
  pub fn go_to(&mut self, page: usize, total: usize) -> bool {
    if page == 0 || page > self.total_pages(total) || page == self.current {
      return false;
    }
    self.current = page;
    true
  }

  pub fn next(&mut self, total: usize) -> bool {
    if !self.has_next(total) {
      return false;
    }
    self.current += 1;
    true
  }

  pub fn previous(&mut self) -> bool {
    if !self.has_previous() {
      return false;
    }
    self.current -= 1;
    true
  }

  pub fn reset(&mut self) {
    self.current = 1;
  }

  /// Pulls the cursor back onto the last page that still has items.
  pub fn clamp(&mut self, total: usize) {
    self.current = self.current.min(self.total_pages(total)).max(1);
  }

  pub fn label(&self, total: usize) -> String {
    format!("Page {} / {}", self.current, self.total_pages(total))
  }
}
