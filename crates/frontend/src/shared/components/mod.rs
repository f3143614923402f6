pub mod date_range_inputs;
pub mod filter_panel;
pub mod pagination_controls;
pub mod search_input;
pub mod stat_card;
pub mod svg_chart;
pub mod table_checkbox;
pub mod ui;
