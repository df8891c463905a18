pub mod filter_panel;
pub mod hangul_table;
pub mod menu;
pub mod progress_bar;
pub mod progress_dashboard;
pub mod quiz_view;
pub mod result_view;
