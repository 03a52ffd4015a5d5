use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_SIZE: i64 = 20;
pub const MAX_SIZE: i64 = 100;

/// Offset/limit window for a 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Out-of-range inputs are clamped to 1.
    pub fn new(page: i64, size: i64) -> Self {
        let page = page.max(1);
        let limit = size.max(1);
        Self {
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }

    pub fn current_page(&self) -> i64 {
        self.offset / self.limit + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub current_page: i64,
    pub total_pages: i64,
    pub size: i64,
    pub total_items: i64,
}

impl Meta {
    pub fn new(pagination: Pagination, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            (total_items + pagination.limit - 1) / pagination.limit
        };
        Self {
            current_page: pagination.current_page(),
            total_pages,
            size: pagination.limit,
            total_items: total_items.max(0),
        }
    }
}

/// Raw `?page=&size=` query. Kept as strings so bad numbers become a 400
/// with details instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-indexed page, default 1.
    pub page: Option<String>,
    /// Page size, 1 to 100, default 20.
    pub size: Option<String>,
}

impl PaginationParams {
    pub fn validate(&self) -> Result<Pagination, BTreeMap<String, String>> {
        let mut details = BTreeMap::new();

        let page = parse_field(self.page.as_deref(), DEFAULT_PAGE, 1, i64::MAX)
            .map_err(|reason| details.insert("page".to_string(), reason))
            .ok();
        let size = parse_field(self.size.as_deref(), DEFAULT_SIZE, 1, MAX_SIZE)
            .map_err(|reason| details.insert("size".to_string(), reason))
            .ok();

        match (page, size) {
            (Some(page), Some(size)) => Ok(Pagination::new(page, size)),
            _ => Err(details),
        }
    }
}

fn parse_field(raw: Option<&str>, default: i64, min: i64, max: i64) -> Result<i64, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    let value: i64 = raw
        .parse()
        .map_err(|_| "must be an integer".to_string())?;
    if value < min {
        return Err(format!("must be at least {min}"));
    }
    if value > max {
        return Err(format!("must be at most {max}"));
    }
    Ok(value)
}
