//! # ROMS Log Parser
//!
//! ROMS/TOMS 海洋模式运行日志（标准输出）解析器，单次线性扫描提取结构化信息。
//!
//! ## 功能特性
//!
//! - **运行元数据**: 版本横幅、开始/结束时间、运行耗时、浮标数量
//! - **物理参数**: 起始日 `dstart`
//! - **浮标投放源**: 支持单行与拆成两行的记录
//! - **时间步诊断**: 单网格、多网格（COAWST）与纯数字三种格式，时间统一为十进制天
//! - **CFL 记录**: `(i,j,k)` 开头的 Courant 数行
//! - **按形状识别**: 不认识的行静默跳过，不会中断解析
//!
//! ## 快速开始
//!
//! ### 解析字符串
//!
//! ```rust
//! use roms_log_parser::parse_log_from_string;
//!
//! let log = r#" Model Input Parameters:  ROMS/TOMS version 3.9
//!    STEP   Day HH:MM:SS  KINETIC_ENRG   POTEN_ENRG    TOTAL_ENRG    NET_VOLUME
//!       0     0 00:00:00  0.000000E+00  6.412345E+02  6.412345E+02  1.234567E+13
//!      96     1 00:00:00  1.201002E-03  6.412301E+02  6.412313E+02  1.234567E+13
//! "#;
//! let summary = parse_log_from_string(log).unwrap();
//!
//! assert_eq!(summary.version, "ROMS/TOMS version 3.9");
//! let steps = summary.steps.unwrap();
//! assert_eq!(steps.len(), 2);
//! assert_eq!(steps[1].time, 1.0);
//! ```
//!
//! ### 从文件读取
//!
//! ```rust,no_run
//! use roms_log_parser::parse_log_from_file;
//!
//! let summary = parse_log_from_file("ocean.log.zst").unwrap();
//! if let Some(cfl) = summary.max_cfl() {
//!     println!("最大 CFL: {}", cfl.max_stability_parameter);
//! }
//! ```
//!
//! ### 任意 BufRead 数据源
//!
//! ```rust
//! use roms_log_parser::LogParser;
//! use std::io::Cursor;
//!
//! let mut source = Cursor::new("unrelated text\n");
//! let summary = LogParser::new(&mut source).parse().unwrap();
//! assert_eq!(summary.line_count, 1);
//! ```
//!
//! ## 日志格式
//!
//! 识别的行形状示例：
//!
//! ```text
//!                     2014-03-03 01:23:45 PM
//!  Model Input Parameters:  ROMS/TOMS version 3.9
//!  Physical Parameters, Grid: 01
//!         0.0000  dstart          Time-stamp assigned to model initialization (days).
//!  Floats Initial Locations:
//!     1    0    5   0.0000   10.0000   20.0000   -5.0000   0.1000   0.5000   0.5000   1.0000
//!      120  Nfloats         Number of float trajectories to compute.
//!    STEP   Day HH:MM:SS  KINETIC_ENRG   POTEN_ENRG    TOTAL_ENRG    NET_VOLUME
//!       0     0 00:00:00  0.000000E+00  6.412345E+02  6.412345E+02  1.234567E+13
//!  (130,061,30)  4.123000E-02  3.200000E-02  1.000000E-03  7.123000E-02
//!  ROMS/TOMS: DONE... 2014-03-03 01:25:00 PM
//! ```

pub mod error;
pub mod parser;
pub mod parser_config;
pub mod summary;
pub mod tools;

pub use error::ParseError;
pub use parser::{
    LogParser,
    SectionMode,
    open_log_source,
    parse_log_from_args,
    parse_log_from_file,
    parse_log_from_string,
    parse_logs_from_files,
};
pub use parser_config::ParserConfig;
pub use summary::{CflRecord, FloatSourceRecord, LogSummary, ParameterInfo, StepRecord};
