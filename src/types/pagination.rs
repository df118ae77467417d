//! Pagination types for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::config::{DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET, MAX_PAGE_LIMIT};

/// Limit/offset query parameters
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Rows to return (default 10, capped at 100)
    #[validate(range(min = 1, message = "limit must be a positive number"))]
    #[param(minimum = 1, example = 10)]
    pub limit: Option<u64>,
    /// Rows to skip (default 0)
    #[param(minimum = 0, example = 0)]
    pub offset: Option<u64>,
}

impl PaginationParams {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(DEFAULT_PAGE_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(PaginationParams::new(500, 20).limit(), 100);
        assert_eq!(PaginationParams::new(500, 20).offset(), 20);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(PaginationParams::new(0, 0).validate().is_err());
        assert!(PaginationParams::new(1, 0).validate().is_ok());
    }
}
