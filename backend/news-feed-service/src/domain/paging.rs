use crate::error::{AppError, Result};

/// Page size used when the caller omits `limit`
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Validated limit/offset window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    /// Build a window from optional caller input.
    ///
    /// Omitted values fall back to `default_limit` and offset 0; a non-positive
    /// limit or a negative offset is rejected.
    pub fn new(limit: Option<i64>, offset: Option<i64>, default_limit: i64) -> Result<Self> {
        let limit = limit.unwrap_or(default_limit);
        let offset = offset.unwrap_or(0);

        if limit <= 0 {
            return Err(AppError::Validation(format!(
                "limit must be positive, got {}",
                limit
            )));
        }
        if offset < 0 {
            return Err(AppError::Validation(format!(
                "offset must not be negative, got {}",
                offset
            )));
        }

        Ok(Self { limit, offset })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let page = PageRequest::new(None, None, DEFAULT_PAGE_LIMIT).unwrap();
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn test_rejects_non_positive_limit() {
        assert!(matches!(
            PageRequest::new(Some(0), None, DEFAULT_PAGE_LIMIT),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(Some(-5), Some(0), DEFAULT_PAGE_LIMIT),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_negative_offset() {
        assert!(matches!(
            PageRequest::new(Some(10), Some(-1), DEFAULT_PAGE_LIMIT),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_explicit_values_kept() {
        let page = PageRequest::new(Some(25), Some(50), DEFAULT_PAGE_LIMIT).unwrap();
        assert_eq!(page.limit, 25);
        assert_eq!(page.offset, 50);
    }
}
