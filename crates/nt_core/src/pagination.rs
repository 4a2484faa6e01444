use serde::Serialize;
use std::num::IntErrorKind;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;
pub const DEFAULT_PAGE: usize = 1;

/// Normalized paging parameters. Construction never fails: anything that
/// isn't a positive integer falls back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub limit: usize,
    pub page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

impl PageRequest {
    pub fn parse(raw_limit: Option<&str>, raw_page: Option<&str>) -> Self {
        let limit = parse_positive(raw_limit)
            .map(|l| l.min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);
        let page = parse_positive(raw_page).unwrap_or(DEFAULT_PAGE);
        Self { limit, page }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

// Digit strings too long for an i64 are still positive: saturate them.
fn parse_positive(raw: Option<&str>) -> Option<usize> {
    match raw?.trim().parse::<i64>() {
        Ok(value) if value > 0 => Some(usize::try_from(value).unwrap_or(usize::MAX)),
        Ok(_) => None,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
        Err(_) => None,
    }
}
