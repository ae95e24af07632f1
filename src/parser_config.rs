//! Parser 配置模块
//!
//! 把分类器查看的所有横幅、段标题和标签集中到一处，
//! 使得日志格式在不同模式版本之间变化时只需更新配置，
//! 而不需要修改核心扫描逻辑。

use crate::parser::constants::{
    COMPLETION_BANNER, DATE_FORMATS, DSTART_LABEL, FLOAT_COUNT_LABEL, FLOAT_COUNT_PHRASE,
    FLOATS_HEADER, PARAMETERS_HEADER, START_DATE_INDENT, STEP_HEADER_TOKENS, VERSION_BANNER,
};

/// Parser 配置
///
/// 定义解析器识别的行形状
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// 开始时间行的前导空格数
    pub start_date_indent: usize,

    /// 版本横幅（区分大小写）
    pub version_banner: String,

    /// 运行结束横幅（区分大小写）
    pub completion_banner: String,

    /// 物理参数段标题（不区分大小写）
    pub parameters_header: String,

    /// 浮标初始位置段标题（不区分大小写）
    pub floats_header: String,

    /// 时间步表头必须同时包含的列名（不区分大小写）
    pub step_header_tokens: Vec<String>,

    /// 浮标数量行的标签
    pub float_count_label: String,

    /// 浮标数量行的描述短语
    pub float_count_phrase: String,

    /// 起始日参数名（不区分大小写比较）
    pub dstart_label: String,

    /// 横幅日期依次尝试的 chrono 格式
    pub date_formats: Vec<String>,
}

impl ParserConfig {
    /// ROMS/TOMS 标准输出的默认配置
    pub fn roms_default() -> Self {
        Self {
            start_date_indent: START_DATE_INDENT,
            version_banner: VERSION_BANNER.to_string(),
            completion_banner: COMPLETION_BANNER.to_string(),
            parameters_header: PARAMETERS_HEADER.to_string(),
            floats_header: FLOATS_HEADER.to_string(),
            step_header_tokens: STEP_HEADER_TOKENS.iter().map(|s| s.to_string()).collect(),
            float_count_label: FLOAT_COUNT_LABEL.to_string(),
            float_count_phrase: FLOAT_COUNT_PHRASE.to_string(),
            dstart_label: DSTART_LABEL.to_string(),
            date_formats: DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 段标题匹配时使用的小写形式：(参数段, 浮标段, 时间步表头列名)
    pub(crate) fn lowercase_headers(&self) -> (String, String, Vec<String>) {
        (
            self.parameters_header.to_ascii_lowercase(),
            self.floats_header.to_ascii_lowercase(),
            self.step_header_tokens
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
        )
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::roms_default()
    }
}
