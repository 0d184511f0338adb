//! Listing types returned by the search API and the flattened rows written to disk
//!
//! Everything except the listing id is optional on the wire. A listing with
//! missing fields still produces a row; the absent cells are simply empty.

use serde::Deserialize;

/// Literal written in the first column of every row
pub const SEARCH_TERM: &str = "all";

/// Top-level body of a search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub businesses: Option<Vec<Listing>>,
}

/// One business listing as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    /// Stable identifier, used as the dedup key
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<CategoryTitle>>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub location: Option<ListingLocation>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryTitle {
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingLocation {
    #[serde(default)]
    pub display_address: Option<Vec<String>>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

/// A listing flattened into the fixed CSV column order
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub search_term: String,
    pub id: String,
    pub alias: String,
    pub name: String,
    pub rating: String,
    pub review_count: String,
    pub price: String,
    pub phone: String,
    pub categories: String,
    pub latitude: String,
    pub longitude: String,
    pub display_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub url: String,
}

impl OutputRecord {
    /// Column values in write order
    pub fn fields(&self) -> [&str; 16] {
        [
            self.search_term.as_str(),
            self.id.as_str(),
            self.alias.as_str(),
            self.name.as_str(),
            self.rating.as_str(),
            self.review_count.as_str(),
            self.price.as_str(),
            self.phone.as_str(),
            self.categories.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.display_address.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zip_code.as_str(),
            self.url.as_str(),
        ]
    }
}

impl From<&Listing> for OutputRecord {
    fn from(listing: &Listing) -> Self {
        let categories = listing
            .categories
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.title.as_deref())
            .collect::<Vec<_>>()
            .join(",");

        let (latitude, longitude) = match &listing.coordinates {
            Some(c) => (format_float(c.latitude), format_float(c.longitude)),
            None => (String::new(), String::new()),
        };

        let location = listing.location.as_ref();
        let display_address = location
            .and_then(|l| l.display_address.as_ref())
            .map(|lines| lines.join(" "))
            .unwrap_or_default();

        Self {
            search_term: SEARCH_TERM.to_string(),
            id: listing.id.clone(),
            alias: listing.alias.clone().unwrap_or_default(),
            name: listing.name.clone().unwrap_or_default(),
            rating: format_float(listing.rating),
            review_count: listing
                .review_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
            price: listing.price.clone().unwrap_or_default(),
            phone: listing.phone.clone().unwrap_or_default(),
            categories,
            latitude,
            longitude,
            display_address,
            city: location.and_then(|l| l.city.clone()).unwrap_or_default(),
            state: location.and_then(|l| l.state.clone()).unwrap_or_default(),
            zip_code: location
                .and_then(|l| l.zip_code.clone())
                .unwrap_or_default(),
            url: listing.url.clone().unwrap_or_default(),
        }
    }
}

/// Debug formatting keeps the trailing `.0` on whole numbers (`4.0`, not `4`)
fn format_float(value: Option<f64>) -> String {
    value.map(|v| format!("{:?}", v)).unwrap_or_default()
}
