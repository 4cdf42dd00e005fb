// Offset/limit pagination for `GET /get-data`.

/// Rows per page unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// One page request against the record listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Zero-based page number.
    pub page_index: u32,
    pub page_size: u32,
    /// `true` returns the Aadhar numbers as stored (encrypted); `false` asks
    /// the backend to decrypt them.
    pub raw: bool,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            raw: true,
        }
    }
}

impl PageQuery {
    pub fn new(page_index: u32, page_size: u32, raw: bool) -> Self {
        Self {
            page_index,
            page_size,
            raw,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    /// `offset`, `limit`, `raw` query pairs in wire form.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("offset", self.offset().to_string()),
            ("limit", self.page_size.to_string()),
            ("raw", self.raw.to_string()),
        ]
    }
}

/// `max(1, ceil(total / page_size))`. A zero page size is one page.
pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(u64::from(page_size)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_clamps_to_one() {
        assert_eq!(page_count(0, 25), 1);
        assert_eq!(page_count(1, 25), 1);
        assert_eq!(page_count(25, 25), 1);
        assert_eq!(page_count(26, 25), 2);
        assert_eq!(page_count(100, 10), 10);
        assert_eq!(page_count(7, 0), 1);
    }

    #[test]
    fn query_pairs_use_offset_arithmetic() {
        let q = PageQuery::new(3, 25, false);
        assert_eq!(
            q.to_query(),
            vec![
                ("offset", "75".to_string()),
                ("limit", "25".to_string()),
                ("raw", "false".to_string()),
            ]
        );
    }

    #[test]
    fn defaults_match_dashboard() {
        let q = PageQuery::default();
        assert_eq!(q.page_size, DEFAULT_PAGE_SIZE);
        assert!(q.raw);
        assert_eq!(q.offset(), 0);
    }
}
