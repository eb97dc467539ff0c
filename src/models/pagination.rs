//! Page/limit pagination shared by list endpoints

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Pagination query parameters.
///
/// A missing or zero `limit` returns the whole result on one page.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams, ToSchema)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Resolved LIMIT/OFFSET for one query, plus the metadata reported back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
    pub page: i64,
    pub pages: i64,
}

impl Pagination {
    /// Resolve the window for a result set of `count` rows.
    ///
    /// A page whose offset does not fit in an `i64` is rejected.
    pub fn window(&self, count: i64) -> AppResult<PageWindow> {
        let limit = match self.limit {
            Some(l) if l > 0 => l,
            _ => count,
        };
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);

        let pages = if count == 0 || limit >= count {
            1
        } else {
            (count + limit - 1) / limit
        };

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| AppError::Validation(format!("Page {} is out of range", page)))?;

        Ok(PageWindow {
            limit,
            offset,
            page,
            pages,
        })
    }
}

/// Page metadata returned with every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    pub page: i64,
    pub pages: i64,
    pub count: i64,
}

impl PageInfo {
    pub fn new(window: &PageWindow, count: i64) -> Self {
        Self {
            page: window.page,
            pages: window.pages,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg(limit: i64, page: i64) -> Pagination {
        Pagination {
            limit: Some(limit),
            page: Some(page),
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(pg(10, 1).window(25).unwrap().pages, 3);
        assert_eq!(pg(10, 1).window(5).unwrap().pages, 1);
        assert_eq!(pg(10, 1).window(10).unwrap().pages, 1);
        assert_eq!(pg(10, 1).window(11).unwrap().pages, 2);
        assert_eq!(pg(10, 1).window(0).unwrap().pages, 1);
    }

    #[test]
    fn test_offsets() {
        assert_eq!(pg(10, 1).window(0).unwrap().offset, 0);
        assert_eq!(pg(10, 1).window(25).unwrap().offset, 0);
        assert_eq!(pg(10, 3).window(25).unwrap().offset, 20);
    }

    #[test]
    fn test_zero_limit_returns_everything() {
        let w = pg(0, 1).window(42).unwrap();
        assert_eq!(w.limit, 42);
        assert_eq!(w.pages, 1);
        assert_eq!(w.offset, 0);

        let w = Pagination::default().window(7).unwrap();
        assert_eq!((w.limit, w.page, w.pages), (7, 1, 1));
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        assert!(matches!(
            pg(10, i64::MAX).window(25),
            Err(AppError::Validation(_))
        ));
        assert!(pg(i64::MAX, 3).window(25).is_err());

        let w = pg(10, 1_000).window(25).unwrap();
        assert_eq!(w.offset, 9_990);
    }

    #[test]
    fn test_page_defaults_to_one() {
        assert_eq!(pg(10, 0).window(25).unwrap().page, 1);
        assert_eq!(pg(10, -4).window(25).unwrap().offset, 0);
    }
}
