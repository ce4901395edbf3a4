use crate::domain::{ClassifiedRow, PlanetLabel, UnknownLabel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Invalid page {requested}: please enter a number between 1 and {total_pages}")]
    PageOutOfRange { requested: usize, total_pages: usize },
    #[error("Page size must be greater than 0")]
    InvalidPageSize,
}

/// Which labels the view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelFilter {
    #[default]
    All,
    Only(PlanetLabel),
}

impl LabelFilter {
    pub fn matches(self, label: PlanetLabel) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Only(wanted) => wanted == label,
        }
    }
}

impl FromStr for LabelFilter {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(LabelFilter::All)
        } else {
            s.parse().map(LabelFilter::Only)
        }
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFilter::All => f.write_str("all"),
            LabelFilter::Only(label) => write!(f, "{label}"),
        }
    }
}

/// `ceil(filtered / page_size)`, never less than one.
pub fn total_pages(filtered_count: usize, page_size: usize) -> usize {
    filtered_count.div_ceil(page_size.max(1)).max(1)
}

/// One page of the filtered row set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'r> {
    pub rows: Vec<&'r ClassifiedRow>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
}

/// Filter first, then slice out `page` (1-based). Pages outside
/// `[1, total_pages]` are rejected rather than clamped.
pub fn project_page<'r>(
    rows: &'r [ClassifiedRow],
    filter: LabelFilter,
    page: usize,
    page_size: usize,
) -> Result<Page<'r>, ViewError> {
    if page_size == 0 {
        return Err(ViewError::InvalidPageSize);
    }

    let filtered: Vec<&ClassifiedRow> = rows
        .iter()
        .filter(|row| filter.matches(row.label()))
        .collect();
    let filtered_count = filtered.len();
    let total_pages = total_pages(filtered_count, page_size);

    if page == 0 || page > total_pages {
        return Err(ViewError::PageOutOfRange {
            requested: page,
            total_pages,
        });
    }

    let rows = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Ok(Page {
        rows,
        page,
        total_pages,
        filtered_count,
    })
}

/// Filter, current page and fixed page size of the result view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    filter: LabelFilter,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter: LabelFilter::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Result<Self, ViewError> {
        if page_size == 0 {
            return Err(ViewError::InvalidPageSize);
        }
        Ok(Self {
            page_size,
            ..Self::default()
        })
    }

    pub fn filter(&self) -> LabelFilter {
        self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Switch filter and return to the first page.
    pub fn set_filter(&mut self, filter: LabelFilter) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    /// Move to `page`, leaving the current page untouched when it is out of range.
    pub fn go_to(&mut self, page: usize, rows: &[ClassifiedRow]) -> Result<(), ViewError> {
        let total_pages = self.total_pages(rows);
        if page == 0 || page > total_pages {
            return Err(ViewError::PageOutOfRange {
                requested: page,
                total_pages,
            });
        }
        self.page = page;
        Ok(())
    }

    pub fn total_pages(&self, rows: &[ClassifiedRow]) -> usize {
        let filtered = rows
            .iter()
            .filter(|row| self.filter.matches(row.label()))
            .count();
        total_pages(filtered, self.page_size)
    }

    /// Pull the current page back into range after the row set or labels changed.
    pub fn reconcile(&mut self, rows: &[ClassifiedRow]) {
        self.page = self.page.clamp(1, self.total_pages(rows));
    }

    pub fn project<'r>(&self, rows: &'r [ClassifiedRow]) -> Result<Page<'r>, ViewError> {
        project_page(rows, self.filter, self.page, self.page_size)
    }
}
