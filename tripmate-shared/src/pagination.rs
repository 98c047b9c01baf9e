use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

/// Caller-supplied paging parameters. Defaults: page 1, 10 rows, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct PageOptions {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            sort_order: SortOrder::default(),
        }
    }
}

impl PageOptions {
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit.max(1))
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page().saturating_sub(1)) * self.limit()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(options: &PageOptions, total: i64) -> Self {
        let limit = options.limit();
        Self {
            page: options.page(),
            limit: limit as u32,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(options: &PageOptions, total: i64, data: Vec<T>) -> Self {
        Self {
            meta: PageMeta::new(options, total),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_math() {
        let options = PageOptions {
            page: 3,
            limit: 10,
            sort_order: SortOrder::Desc,
        };
        assert_eq!(options.offset(), 20);
        assert_eq!(options.limit(), 10);
    }

    #[test]
    fn test_zero_page_clamps_to_first() {
        let options = PageOptions {
            page: 0,
            limit: 0,
            sort_order: SortOrder::Asc,
        };
        assert_eq!(options.page(), 1);
        assert_eq!(options.limit(), 1);
        assert_eq!(options.offset(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let options = PageOptions::default();
        let meta = PageMeta::new(&options, 21);
        assert_eq!(meta.total_pages, 3);
        let meta = PageMeta::new(&options, 20);
        assert_eq!(meta.total_pages, 2);
        let meta = PageMeta::new(&options, 0);
        assert_eq!(meta.total_pages, 0);
    }
}
