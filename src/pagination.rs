//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Resolve the requested page and page size, falling back to the defaults
    /// and clamping to valid values.
    ///
    /// Pages are 1-indexed, so a page of zero is treated as the first page.
    pub fn resolve(&self, page: Option<u64>, page_size: Option<u64>) -> (u64, u64) {
        let page = page.unwrap_or(self.default_page).max(1);
        let page_size = page_size
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size);

        (page, page_size)
    }
}

/// The number of pages needed to show `total` items, `page_size` at a time.
pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }

    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use crate::pagination::{PaginationConfig, page_count};

    #[test]
    fn resolve_uses_defaults() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve(None, None), (1, 10));
    }

    #[test]
    fn resolve_clamps_values() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve(Some(0), Some(0)), (1, 1));
        assert_eq!(config.resolve(Some(3), Some(1000)), (3, 100));
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }
}
