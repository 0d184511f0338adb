use crate::config::ApiConfig;

/// Page size and scroll cap used while paginating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page_size: u32,
    pub max_offset: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_offset: 999,
        }
    }
}

impl From<&ApiConfig> for Paging {
    fn from(api: &ApiConfig) -> Self {
        Self {
            page_size: api.page_size,
            max_offset: api.max_offset,
        }
    }
}

/// One page request for a (category, location) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub category: String,
    pub location: String,
    pub page_size: u32,
    pub page_index: u32,
}

impl Query {
    /// Creates a query for the first page
    pub fn first_page(category: &str, location: &str, page_size: u32) -> Self {
        Self {
            category: category.to_string(),
            location: location.to_string(),
            page_size,
            page_index: 0,
        }
    }

    /// The query for the page after this one
    pub fn next_page(&self) -> Self {
        Self {
            page_index: self.page_index + 1,
            ..self.clone()
        }
    }

    /// Index of the first listing on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page_size) * u64::from(self.page_index)
    }

    /// True when the offset is past what the API will serve
    pub fn exceeds(&self, max_offset: u32) -> bool {
        self.offset() > u64::from(max_offset)
    }

    /// The location as sent on the wire, spaces replaced by `+`
    pub fn location_param(&self) -> String {
        location_slug(&self.location)
    }
}

/// Replaces spaces with `+`; used both for the query string and for the
/// per-location output directory.
pub fn location_slug(location: &str) -> String {
    location.replace(' ', "+")
}
