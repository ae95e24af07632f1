//! 错误类型定义
//!
//! 定义了日志解析过程中可能出现的所有结构性错误。
//! 单行格式不匹配不属于错误：这类行会被静默跳过，扫描继续进行。

use thiserror::Error;

/// 解析错误类型
///
/// 任何一个变体都会中止整次解析，调用方不会拿到部分填充的 `LogSummary`。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// 参数错误：未提供文件、提供了多个文件、路径为空或不是合法的 UTF-8 文本
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// 文件无法打开读取
    #[error("file not found or unreadable: {path}: {reason}")]
    Unreadable {
        /// 文件路径
        path: String,
        /// 底层错误描述
        reason: String,
    },

    /// 输入为空
    #[error("empty input: no lines provided")]
    EmptyInput,

    /// 扫描过程中读取失败（截断、损坏的压缩流等）
    #[error("read failure after {line} lines: {reason}")]
    ReadFailure {
        /// 失败前已消费的行数
        line: usize,
        /// 底层错误描述
        reason: String,
    },
}
