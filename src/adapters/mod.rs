//! Concrete adapter implementations of the port traits.

pub mod console_notifier;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod svg_chart_adapter;
