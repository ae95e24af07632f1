//! Parser 模块 - 解析 ROMS/TOMS 运行日志
//!
//! 此模块提供了完整的日志解析功能,包括:
//! - 行形状分类与段状态机
//! - 各类记录的定长解码
//! - 便捷 API 函数

mod api;
pub(crate) mod constants;
pub mod log_parser;
pub mod parse_functions;

pub use api::{
    open_log_source, parse_log_from_args, parse_log_from_file, parse_log_from_string,
    parse_logs_from_files,
};
pub use log_parser::{LogParser, SectionMode};

#[cfg(test)]
mod tests;
