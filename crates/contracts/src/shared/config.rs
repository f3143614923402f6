use serde::Deserialize;

/// Every section and key is optional; missing values keep their defaults.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub transport: TransportConfig,
    pub sales: SalesConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute base URL such as "http://localhost:8000/api".
    /// Empty means: derive it from the page location plus `port` and `prefix`.
    pub base_url: String,
    pub port: u16,
    pub prefix: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub search_debounce_ms: u32,
    pub suggest_debounce_ms: u32,
    pub products_page_size: usize,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TransportConfig {
    /// Fee charged on the sum of a truck's albaranes when the route is settled
    pub fee_percent: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SalesConfig {
    /// Suggested deposit as a share of the sale total
    pub deposit_percent: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            port: 8000,
            prefix: "/api".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 150,
            suggest_debounce_ms: 200,
            products_page_size: 12,
            log_level: "debug".to_string(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { fee_percent: 7.0 }
    }
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            deposit_percent: 30.0,
        }
    }
}

/// Default configuration embedded in the bundle
pub const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://localhost:8000/api"
port = 8000
prefix = "/api"

[ui]
search_debounce_ms = 150
suggest_debounce_ms = 200
products_page_size = 12
log_level = "debug"

[transport]
fee_percent = 7.0

[sales]
deposit_percent = 30.0
"#;

impl AppConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration.
    ///
    /// An override document (usually embedded in the host page) wins over the
    /// default one. A broken override is an error; the caller decides whether
    /// to fall back to `AppConfig::default()`.
    pub fn load(override_toml: Option<&str>) -> anyhow::Result<Self> {
        match override_toml.filter(|s| !s.trim().is_empty()) {
            Some(contents) => {
                Self::from_toml(contents).map_err(|e| e.context("invalid override config"))
            }
            None => Self::from_toml(DEFAULT_CONFIG),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ui.products_page_size == 0 {
            anyhow::bail!("ui.products_page_size must be greater than zero");
        }
        if self.transport.fee_percent < 0.0 || !self.transport.fee_percent.is_finite() {
            anyhow::bail!("transport.fee_percent must be a non-negative number");
        }
        if self.sales.deposit_percent < 0.0 || !self.sales.deposit_percent.is_finite() {
            anyhow::bail!("sales.deposit_percent must be a non-negative number");
        }
        Ok(())
    }

    /// Base URL without trailing slash, or None when it must be derived from the page location.
    pub fn explicit_base_url(&self) -> Option<String> {
        let trimmed = self.api.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Build the base URL from browser location parts.
    pub fn derived_base_url(&self, protocol: &str, hostname: &str) -> String {
        let prefix = self.api.prefix.trim_end_matches('/');
        format!("{}//{}:{}{}", protocol, hostname, self.api.port, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = AppConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.explicit_base_url().as_deref(),
            Some("http://localhost:8000/api")
        );
    }

    #[test]
    fn test_override_only_api_section() {
        let config = AppConfig::load(Some("[api]\nbase_url = \"\"\nport = 9000\n")).unwrap();
        assert_eq!(config.explicit_base_url(), None);
        assert_eq!(
            config.derived_base_url("https:", "shop.local"),
            "https://shop.local:9000/api"
        );
        assert_eq!(config.ui.search_debounce_ms, 150);
        assert_eq!(config.transport.fee_percent, 7.0);
    }

    #[test]
    fn test_partial_override_merges_over_defaults() {
        let config = AppConfig::load(Some("[ui]\nproducts_page_size = 24\n")).unwrap();
        assert_eq!(config.ui.products_page_size, 24);
        assert_eq!(config.ui.search_debounce_ms, 150);
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.sales.deposit_percent, 30.0);

        let config = AppConfig::load(Some("[api]\nport = 9000\n[ui]\nproducts_page_size = 24\n")).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.prefix, "/api");
        assert_eq!(config.ui.suggest_debounce_ms, 200);
    }

    #[test]
    fn test_invalid_override_is_reported() {
        assert!(AppConfig::load(Some("[api]\nbase_url = 12")).is_err());
        assert!(AppConfig::load(Some("   ")).is_ok());
        assert!(AppConfig::load(None).is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let zero_page = "[api]\n[ui]\nsearch_debounce_ms = 150\nsuggest_debounce_ms = 200\nproducts_page_size = 0\nlog_level = \"info\"\n";
        assert!(AppConfig::from_toml(zero_page).is_err());

        let negative_fee = "[api]\n[transport]\nfee_percent = -1.0\n";
        assert!(AppConfig::from_toml(negative_fee).is_err());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = AppConfig::from_toml("[api]\nbase_url = \"http://x:1/api/\"\n").unwrap();
        assert_eq!(config.explicit_base_url().as_deref(), Some("http://x:1/api"));
    }
}
