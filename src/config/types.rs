use serde::Deserialize;

/// Default search endpoint of the Yelp Fusion API
pub const DEFAULT_ENDPOINT: &str = "https://api.yelp.com/v3/businesses/search";

/// Main configuration structure for Yelp-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Every (location, category) pair in processing order: locations outer,
    /// categories inner.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.search
            .locations
            .iter()
            .flat_map(|location| {
                self.search
                    .categories
                    .iter()
                    .map(move |category| (category.clone(), location.clone()))
            })
            .collect()
    }
}

/// Search API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Full URL of the business search endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the environment variable holding the bearer token
    #[serde(rename = "key-env", default = "default_key_env")]
    pub key_env: String,

    /// Listings requested per page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Largest offset the API will serve
    #[serde(rename = "max-offset", default = "default_max_offset")]
    pub max_offset: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            key_env: default_key_env(),
            page_size: default_page_size(),
            max_offset: default_max_offset(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for per-run output folders
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// What to search for
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    /// Category aliases (e.g. "bars", "coffee")
    #[serde(default)]
    pub categories: Vec<String>,

    /// Free-text locations (e.g. "Seattle", "Portland OR")
    #[serde(default)]
    pub locations: Vec<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_key_env() -> String {
    "API_KEY".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_max_offset() -> u32 {
    999
}

fn default_data_dir() -> String {
    "data".to_string()
}
