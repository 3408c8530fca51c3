//! Pagination for company listings.

/// Largest accepted page size.
pub const MAX_LIMIT: u64 = 100;

/// Requested page; `page` is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Build from the two optional query values; both must be present.
    pub fn from_parts(page: Option<u64>, limit: Option<u64>) -> Option<Self> {
        match (page, limit) {
            (Some(page), Some(limit)) => Some(Self { page, limit }),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".into());
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(format!("limit must be in 1..={MAX_LIMIT}"));
        }
        if self.offset().is_none() {
            return Err(format!("page {} is out of range", self.page));
        }
        Ok(())
    }

    /// Rows to skip. `None` when the offset does not fit a SQL BIGINT.
    pub fn offset(&self) -> Option<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .filter(|o| *o <= i64::MAX as u64)
    }
}

/// Page actually served plus the total number of matching items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl PageInfo {
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 { 0 } else { self.total.div_ceil(self.limit) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_both_parts() {
        assert_eq!(Pagination::from_parts(Some(2), None), None);
        assert_eq!(Pagination::from_parts(None, Some(10)), None);
        assert_eq!(Pagination::from_parts(Some(2), Some(10)), Some(Pagination { page: 2, limit: 10 }));
    }

    #[test]
    fn validate_bounds() {
        assert!(Pagination { page: 0, limit: 10 }.validate().is_err());
        assert!(Pagination { page: 1, limit: 0 }.validate().is_err());
        assert!(Pagination { page: 1, limit: 101 }.validate().is_err());
        assert!(Pagination { page: 3, limit: 100 }.validate().is_ok());
    }

    #[test]
    fn huge_pages_are_rejected_not_overflowed() {
        assert_eq!(Pagination { page: u64::MAX, limit: 100 }.offset(), None);
        assert!(Pagination { page: u64::MAX, limit: 100 }.validate().is_err());
        assert_eq!(Pagination { page: 100_000_000_000_000_000, limit: 100 }.offset(), None);
        assert!(Pagination { page: 100_000_000_000_000_000, limit: 100 }.validate().is_err());

        let last = i64::MAX as u64 / 100 + 1;
        assert_eq!(Pagination { page: last, limit: 100 }.offset(), Some((last - 1) * 100));
        assert!(Pagination { page: last, limit: 100 }.validate().is_ok());
    }

    #[test]
    fn offset_and_total_pages() {
        assert_eq!(Pagination { page: 2, limit: 10 }.offset(), Some(10));
        assert_eq!(Pagination { page: 1, limit: 10 }.offset(), Some(0));
        assert_eq!(PageInfo { page: 2, limit: 10, total: 21 }.total_pages(), 3);
        assert_eq!(PageInfo { page: 1, limit: 10, total: 0 }.total_pages(), 0);
        assert_eq!(PageInfo { page: 1, limit: 10, total: 10 }.total_pages(), 1);
    }
}
