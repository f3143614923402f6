//! Process-wide configuration, loaded once at startup.

use contracts::shared::config::AppConfig;
use once_cell::sync::OnceCell;
use wasm_bindgen::JsCast;

static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// Element id of the optional TOML override in the host page
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Text of `<script id="app-config" type="application/toml">`, if present
fn read_page_override() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
    let script = element.dyn_into::<web_sys::HtmlScriptElement>().ok()?;
    script.text().ok()
}

/// Load the configuration from the page, falling back to the embedded default.
/// Returns the error message of a broken override so it can be logged once
/// logging is up.
pub fn init() -> (&'static AppConfig, Option<String>) {
    let mut problem = None;
    let config = CONFIG.get_or_init(|| match AppConfig::load(read_page_override().as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            problem = Some(format!("{:#}", e));
            AppConfig::default()
        }
    });
    (config, problem)
}

pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}

pub fn log_level(config: &AppConfig) -> log::Level {
    match config.ui.log_level.to_ascii_lowercase().as_str() {
        "error" => log::Level::Error,
        "warn" => log::Level::Warn,
        "info" => log::Level::Info,
        "trace" => log::Level::Trace,
        _ => log::Level::Debug,
    }
}
