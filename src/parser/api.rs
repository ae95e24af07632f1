//! 便捷 API 函数
//!
//! 提供了一组方便使用的高层 API，用于从路径、命令行参数或字符串快速解析运行日志。
//! 数据源由这里打开并持有，解析器只借用它；任何退出路径上数据源都会随 `Drop` 关闭。

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use crate::error::ParseError;
use crate::parser::log_parser::LogParser;
use crate::summary::LogSummary;

/// 读取日志文件时使用的缓冲区大小
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// 需要透明解压的扩展名
const ZSTD_EXTENSION: &str = "zst";

/// 打开日志文件，返回按行读取的数据源
///
/// 以 `.zst` 结尾的文件会先经过 zstd 解压。
///
/// # 返回
///
/// * `Ok(Box<dyn BufRead>)` - 可按行读取的数据源
/// * `Err(ParseError::Unreadable)` - 文件无法打开、不是普通文件，或解压器无法初始化
pub fn open_log_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, ParseError> {
    let path_ref = path.as_ref();
    let unreadable = |e: std::io::Error| ParseError::Unreadable {
        path: path_ref.display().to_string(),
        reason: e.to_string(),
    };

    let file = File::open(path_ref).map_err(unreadable)?;
    let metadata = file.metadata().map_err(unreadable)?;
    if !metadata.is_file() {
        return Err(ParseError::Unreadable {
            path: path_ref.display().to_string(),
            reason: "not a regular file".to_string(),
        });
    }

    if path_ref.extension().and_then(OsStr::to_str) == Some(ZSTD_EXTENSION) {
        let decoder = zstd::stream::read::Decoder::new(file).map_err(unreadable)?;
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file)))
    }
}

/// 从文件读取并解析运行日志
///
/// # 参数
///
/// * `path` - 日志文件路径（`.zst` 会被透明解压）
///
/// # 返回
///
/// * `Ok(LogSummary)` - 解析结果
/// * `Err(ParseError)` - 路径为空、文件无法打开、文件为空或读取中途失败
///
/// # 示例
///
/// ```no_run
/// use roms_log_parser::parse_log_from_file;
///
/// let summary = parse_log_from_file("ocean_his.log")?;
///
/// println!("版本: {}", summary.version);
/// println!("时间步: {}", summary.steps.as_ref().map_or(0, |s| s.len()));
/// println!("耗时: {:.1} s", summary.elapsed_seconds);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_log_from_file<P: AsRef<Path>>(path: P) -> Result<LogSummary, ParseError> {
    let path_ref = path.as_ref();
    if path_ref.as_os_str().is_empty() {
        return Err(ParseError::InvalidArgument("empty log file path".to_string()));
    }

    let mut source = open_log_source(path_ref)?;
    let summary = LogParser::new(&mut source).parse()?;

    info!(
        path = %path_ref.display(),
        lines = summary.line_count,
        steps = summary.steps.as_ref().map_or(0, Vec::len),
        "log summarized"
    );
    Ok(summary)
}

/// 按命令行参数解析运行日志
///
/// 必须恰好提供一个非空的 UTF-8 路径，参数错误在任何 I/O 之前返回。
///
/// # 示例
///
/// ```no_run
/// use roms_log_parser::parse_log_from_args;
///
/// let summary = parse_log_from_args(std::env::args_os().skip(1))?;
/// println!("{} 行", summary.line_count);
/// # Ok::<(), roms_log_parser::ParseError>(())
/// ```
pub fn parse_log_from_args<I, S>(args: I) -> Result<LogSummary, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut args = args.into_iter();
    let Some(first) = args.next() else {
        return Err(ParseError::InvalidArgument(
            "no log file supplied".to_string(),
        ));
    };

    let extra = args.count();
    if extra > 0 {
        return Err(ParseError::InvalidArgument(format!(
            "expected exactly one log file, got {}",
            extra + 1
        )));
    }

    let path = first.as_ref().to_str().ok_or_else(|| {
        ParseError::InvalidArgument("log file path is not valid UTF-8 text".to_string())
    })?;

    parse_log_from_file(path)
}

/// 从字符串解析运行日志
///
/// # 示例
///
/// ```
/// use roms_log_parser::parse_log_from_string;
///
/// let summary = parse_log_from_string(" Model Input Parameters:  ROMS/TOMS version 3.9\n")?;
/// assert_eq!(summary.version, "ROMS/TOMS version 3.9");
/// assert!(summary.steps.is_none());
/// # Ok::<(), roms_log_parser::ParseError>(())
/// ```
pub fn parse_log_from_string(content: &str) -> Result<LogSummary, ParseError> {
    LogParser::new(Cursor::new(content)).parse()
}

/// 并行解析多个日志文件
///
/// 每个文件由一个任务完整地顺序扫描，文件之间并行；结果顺序与输入顺序一致。
///
/// # 返回
///
/// 每个路径对应一个 `Result<LogSummary, ParseError>`
pub fn parse_logs_from_files<P>(paths: &[P]) -> Vec<Result<LogSummary, ParseError>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(parse_log_from_file)
        .collect()
}
