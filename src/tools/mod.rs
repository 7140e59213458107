//! 工具模块集合
//!
//! 包含CLI、配置、输入展开、格式化等工具模块，支持main.rs的流程控制。

pub mod cli;
pub mod config;
pub mod constants;
pub mod formatter;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{AppConfig, parse_args, parse_args_from, show_completion_info, show_startup_info};
pub use config::Settings;
pub use formatter::{format_multiplicity_table, render_json_report, render_text_report, write_output};
pub use scanner::{expand_inputs, show_scan_results};
