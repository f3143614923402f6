pub mod api_utils;
pub mod app_config;
pub mod components;
pub mod date_utils;
pub mod export;
pub mod icons;
pub mod modal_frame;
pub mod modal_stack;
pub mod number_format;
pub mod page_frame;
pub mod storage;
