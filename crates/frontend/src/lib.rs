pub mod app;
pub mod dashboards;
pub mod domain;
pub mod layout;
pub mod shared;
pub mod usecases;

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen]
pub fn hydrate() {
    let (config, config_problem) = shared::app_config::init();
    _ = console_log::init_with_level(shared::app_config::log_level(config));
    console_error_panic_hook::set_once();

    if let Some(problem) = config_problem {
        log::error!("app config: {}; using built-in defaults", problem);
    }
    log::info!("API base: {}", shared::api_utils::api_base());

    leptos::mount::mount_to_body(app::App);
}

#[wasm_bindgen(start)]
pub fn start() {
    hydrate();
}
