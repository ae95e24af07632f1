//! LogParser - 从 Reader 单次扫描 ROMS/TOMS 运行日志
//!
//! 逐行读取，按形状把每一行归类为横幅、段标题、记录或无关行，
//! 并在一个显式的段状态机驱动下把记录追加到各自的累加器中。

use std::io::BufRead;

use chrono::NaiveDateTime;
use memchr::memmem;
use tracing::{debug, trace, warn};

use crate::error::ParseError;
use crate::parser::parse_functions::{
    FloatSourceShape, StepLine, decode_float_source, decode_parameter_line,
    decode_step_mode_line, float_source_shape, parse_banner_date,
};
use crate::parser_config::ParserConfig;
use crate::summary::{CflRecord, FloatSourceRecord, LogSummary, ParameterInfo, StepRecord};
use crate::tools::is_start_date_line;

/// 当前活动的日志段
///
/// 只有段标题行和浮标数量行会改变它，其余行不会。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionMode {
    /// 不在任何可解析的段中
    #[default]
    None,
    /// 物理参数段
    Parameters,
    /// 浮标初始位置段
    FloatSources,
    /// 时间步诊断段
    Steps,
}

/// 从 Reader 中逐行读取并汇总成 [`LogSummary`] 的解析器
///
/// 解析器只借用数据源，不负责它的生命周期；传入 `&mut reader` 时，
/// 调用方在任何退出路径上都仍然持有并释放该数据源。
///
/// # 类型参数
///
/// * `R` - 实现了 `BufRead` trait 的类型
///
/// # 示例
///
/// ```
/// use roms_log_parser::LogParser;
/// use std::io::Cursor;
///
/// let log = "   STEP   Day HH:MM:SS  KINETIC_ENRG   POTEN_ENRG    TOTAL_ENRG    NET_VOLUME\n\
///            0     0 00:00:00  0.000000E+00  6.412345E+02  6.412345E+02  1.234567E+13\n";
/// let summary = LogParser::new(Cursor::new(log)).parse()?;
///
/// assert_eq!(summary.line_count, 2);
/// assert_eq!(summary.steps.map(|s| s.len()), Some(1));
/// # Ok::<(), roms_log_parser::ParseError>(())
/// ```
pub struct LogParser<R: BufRead> {
    reader: R,
    config: ParserConfig,
    parameters_header: String,
    floats_header: String,
    step_header_tokens: Vec<String>,
    buffer: Vec<u8>,
    mode: SectionMode,
    line_count: usize,

    version: String,
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
    float_count: i64,
    parameters: ParameterInfo,
    float_sources: Vec<FloatSourceRecord>,
    steps: Vec<StepRecord>,
    cfl: Vec<CflRecord>,
}

impl<R: BufRead> LogParser<R> {
    /// 使用默认 ROMS/TOMS 配置创建解析器
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, ParserConfig::default())
    }

    /// 使用自定义配置创建解析器
    pub fn with_config(reader: R, config: ParserConfig) -> Self {
        let (parameters_header, floats_header, step_header_tokens) = config.lowercase_headers();
        Self {
            reader,
            config,
            parameters_header,
            floats_header,
            step_header_tokens,
            buffer: Vec::with_capacity(256),
            mode: SectionMode::None,
            line_count: 0,
            version: String::new(),
            start_date: None,
            end_date: None,
            float_count: 0,
            parameters: ParameterInfo::default(),
            float_sources: Vec::new(),
            steps: Vec::new(),
            cfl: Vec::new(),
        }
    }

    /// 当前活动的段
    pub fn mode(&self) -> SectionMode {
        self.mode
    }

    /// 目前已消费的行数
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// 扫描到数据源末尾并汇总结果
    ///
    /// # 返回
    ///
    /// * `Ok(LogSummary)` - 扫描成功
    /// * `Err(ParseError::EmptyInput)` - 数据源一行都没有
    /// * `Err(ParseError::ReadFailure)` - 扫描中途读取失败
    pub fn parse(mut self) -> Result<LogSummary, ParseError> {
        self.scan()?;
        Ok(self.finish())
    }

    /// 读取剩余的所有行
    ///
    /// 可以在调用后通过 [`mode`](Self::mode) 观察状态机，再用
    /// [`finish`](Self::finish) 取出结果。
    pub fn scan(&mut self) -> Result<(), ParseError> {
        while let Some(line) = self.read_line()? {
            self.process_line(&line)?;
        }

        if self.line_count == 0 {
            return Err(ParseError::EmptyInput);
        }

        debug!(
            lines = self.line_count,
            float_sources = self.float_sources.len(),
            steps = self.steps.len(),
            cfl = self.cfl.len(),
            "log scan finished"
        );
        Ok(())
    }

    /// 冻结累加器并计算派生字段
    pub fn finish(self) -> LogSummary {
        let elapsed_seconds = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
            _ => f64::NAN,
        };

        LogSummary {
            line_count: self.line_count,
            version: self.version,
            start_date: self.start_date,
            end_date: self.end_date,
            elapsed_seconds,
            float_count: self.float_count,
            parameters: self.parameters,
            float_sources: non_empty(self.float_sources),
            steps: non_empty(self.steps),
            cfl: non_empty(self.cfl),
        }
    }

    /// 读取下一行，去掉行尾的 `\n` / `\r\n`
    fn read_line(&mut self) -> Result<Option<String>, ParseError> {
        self.buffer.clear();
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .map_err(|e| ParseError::ReadFailure {
                line: self.line_count,
                reason: e.to_string(),
            })?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let mut len = self.buffer.len();
        while len > 0 && matches!(self.buffer[len - 1], b'\n' | b'\r') {
            len -= 1;
        }

        self.line_count += 1;
        Ok(Some(String::from_utf8_lossy(&self.buffer[..len]).into_owned()))
    }

    fn set_mode(&mut self, mode: SectionMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, line = self.line_count, "section mode changed");
        }
        self.mode = mode;
    }

    /// 按优先级对一行分类，第一个匹配的规则消费该行
    fn process_line(&mut self, line: &str) -> Result<(), ParseError> {
        let bytes = line.as_bytes();
        let indent = self.config.start_date_indent;

        // 1. 开始时间
        if is_start_date_line(line, indent) {
            self.start_date = parse_banner_date(&line[indent..], &self.config.date_formats);
            if self.start_date.is_none() {
                warn!(line = self.line_count, "unparseable start date banner");
            }
            return Ok(());
        }

        // 2. 版本
        if let Some(pos) = memmem::find(bytes, self.config.version_banner.as_bytes()) {
            self.version = line[pos..].trim().to_string();
            return Ok(());
        }

        // 3. 运行结束
        if let Some(pos) = memmem::find(bytes, self.config.completion_banner.as_bytes()) {
            let rest = &line[pos + self.config.completion_banner.len()..];
            self.end_date = parse_banner_date(rest, &self.config.date_formats);
            if self.end_date.is_none() {
                warn!(line = self.line_count, "unparseable completion date banner");
            }
            return Ok(());
        }

        // 4. 段标题
        if let Some(mode) = self.section_header(line) {
            self.set_mode(mode);
            return Ok(());
        }

        // 5. 浮标数量
        if self.mode == SectionMode::FloatSources
            && memmem::find(bytes, self.config.float_count_label.as_bytes()).is_some()
            && memmem::find(bytes, self.config.float_count_phrase.as_bytes()).is_some()
        {
            match line.split_whitespace().next().and_then(|t| t.parse().ok()) {
                Some(count) => self.float_count = count,
                None => trace!(line = self.line_count, "float count line without a count"),
            }
            self.set_mode(SectionMode::None);
            return Ok(());
        }

        // 6. 按当前段解析记录
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match self.mode {
            SectionMode::None => {}
            SectionMode::Parameters => {
                if let Some(dstart) = decode_parameter_line(&tokens, &self.config.dstart_label) {
                    self.parameters.dstart = Some(dstart);
                    return Ok(());
                }
            }
            SectionMode::FloatSources => return self.process_float_source(line, &tokens),
            SectionMode::Steps => match decode_step_mode_line(&tokens) {
                Some(StepLine::Step(record)) => {
                    self.steps.push(record);
                    return Ok(());
                }
                Some(StepLine::Cfl(record)) => {
                    self.cfl.push(record);
                    return Ok(());
                }
                None => {}
            },
        }

        trace!(line = self.line_count, mode = ?self.mode, "line discarded");
        Ok(())
    }

    /// 判断是否为段标题行（不区分大小写）
    fn section_header(&self, line: &str) -> Option<SectionMode> {
        let lower = line.to_ascii_lowercase();
        let haystack = lower.as_bytes();

        if memmem::find(haystack, self.parameters_header.as_bytes()).is_some() {
            Some(SectionMode::Parameters)
        } else if memmem::find(haystack, self.floats_header.as_bytes()).is_some() {
            Some(SectionMode::FloatSources)
        } else if !self.step_header_tokens.is_empty()
            && self
                .step_header_tokens
                .iter()
                .all(|token| memmem::find(haystack, token.as_bytes()).is_some())
        {
            Some(SectionMode::Steps)
        } else {
            None
        }
    }

    /// 浮标段记录：单行 11 字段，或 7 字段 + 下一行续行
    fn process_float_source(&mut self, line: &str, tokens: &[&str]) -> Result<(), ParseError> {
        let record = match float_source_shape(tokens) {
            FloatSourceShape::SingleLine => decode_float_source(tokens),
            FloatSourceShape::FirstOfTwo => {
                let Some(next) = self.read_line()? else {
                    trace!(line = self.line_count, "float source record truncated at end of input");
                    return Ok(());
                };
                let joined = format!("{line}\n{next}");
                let fields: Vec<&str> = joined.split_whitespace().collect();
                decode_float_source(&fields)
            }
            FloatSourceShape::Unrecognized => None,
        };

        match record {
            Some(record) => self.float_sources.push(record),
            None => trace!(line = self.line_count, "float source line discarded"),
        }
        Ok(())
    }
}

#[inline]
fn non_empty<T>(records: Vec<T>) -> Option<Vec<T>> {
    (!records.is_empty()).then_some(records)
}
