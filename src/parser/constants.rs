//! 解析器使用的常量定义
//!
//! 定义了 ROMS/TOMS 标准输出中各类横幅、段标题、标签以及记录字段数。

use once_cell::sync::Lazy;

// 横幅相关常量

/// 开始时间行的前导空格数
pub const START_DATE_INDENT: usize = 20;

/// 版本横幅
pub static VERSION_BANNER: &str = "ROMS/TOMS version";

/// 运行结束横幅
pub static COMPLETION_BANNER: &str = "ROMS/TOMS: DONE";

// 段标题（不区分大小写匹配）

/// 物理参数段标题
pub static PARAMETERS_HEADER: &str = "physical parameters";

/// 浮标初始位置段标题
pub static FLOATS_HEADER: &str = "floats initial locations";

/// 时间步表头必须同时包含的列名
pub static STEP_HEADER_TOKENS: Lazy<[&'static str; 4]> =
    Lazy::new(|| ["step", "kinetic_enrg", "poten_enrg", "total_enrg"]);

// 标签

/// 浮标数量行的标签
pub static FLOAT_COUNT_LABEL: &str = "Nfloats";

/// 浮标数量行的描述短语
pub static FLOAT_COUNT_PHRASE: &str = "Number of float trajectories";

/// 起始日参数名
pub static DSTART_LABEL: &str = "dstart";

/// 横幅日期依次尝试的格式
pub static DATE_FORMATS: Lazy<[&'static str; 3]> = Lazy::new(|| {
    [
        "%Y-%m-%d %I:%M:%S %p",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %I:%M %p",
    ]
});

// 记录字段数

/// 浮标源记录的字段数（grid, coord, count, t0, x0, y0, z0, dt, dx, dy, dz）
pub const FLOAT_SOURCE_FIELDS: usize = 11;

/// 浮标源记录被拆成两行时第一行的字段数
pub const FLOAT_SOURCE_FIRST_LINE_FIELDS: usize = 7;

/// 时间步记录的字段数（grid, step, time, ke, pe, te, nv）
pub const STEP_FIELDS: usize = 7;

/// 时间步记录中能量与体积字段数（ke, pe, te, nv）
pub const ENERGY_FIELDS: usize = 4;

/// CFL 记录的字段数（cu, cv, cw, max）
pub const CFL_FIELDS: usize = 4;
