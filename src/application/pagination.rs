//! Page-number pagination helpers shared by listings and the admin table.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page {requested} is out of range (1..={available})")]
    OutOfRange { requested: u32, available: u32 },
}

/// A validated 1-based page over a known total, fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedPage {
    number: u32,
    size: u32,
    page_count: u32,
}

/// Limit/offset window handed to repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u64,
}

pub fn page_count(total: u64, size: u32) -> u32 {
    debug_assert!(size > 0);
    let size = u64::from(size);
    let pages = total.div_ceil(size);
    // An empty table still renders page 1.
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

impl NumberedPage {
    /// Validates `number` against the total row count. Page numbers past the
    /// end (or zero) are rejected, matching the original paginator contract.
    pub fn resolve(number: u32, size: u32, total: u64) -> Result<Self, PaginationError> {
        let page_count = page_count(total, size);
        if number == 0 || number > page_count {
            return Err(PaginationError::OutOfRange {
                requested: number,
                available: page_count,
            });
        }
        Ok(Self {
            number,
            size,
            page_count,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.page_count
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            limit: self.size,
            offset: u64::from(self.number - 1) * u64::from(self.size),
        }
    }
}
