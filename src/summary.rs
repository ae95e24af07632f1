//! 日志解析结果的数据模型
//!
//! 所有类型都在一次线性扫描中增量构建，扫描结束后不再修改。

use chrono::NaiveDateTime;

/// 物理参数段中捕获的标量
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterInfo {
    /// 模式起始日（天）。多次出现时以最后一次为准
    pub dstart: Option<f64>,
}

/// 浮标投放源描述
///
/// 对应 "Floats Initial Locations" 表中的一行（或被拆成两行的一条记录）。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatSourceRecord {
    /// 网格编号
    pub grid: i64,
    /// 坐标类型标志
    pub coordinate_flag: i64,
    /// 本源投放的浮标数量
    pub count: i64,
    /// 首次投放时间
    pub t0: f64,
    /// 投放位置 x
    pub x0: f64,
    /// 投放位置 y
    pub y0: f64,
    /// 投放位置 z
    pub z0: f64,
    /// 投放时间间隔
    pub dt: f64,
    /// x 方向间隔
    pub dx: f64,
    /// y 方向间隔
    pub dy: f64,
    /// z 方向间隔
    pub dz: f64,
}

/// 一个时间步的能量诊断
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord {
    /// 网格编号，单网格日志固定为 0
    pub grid: i64,
    /// 时间步序号
    pub step: i64,
    /// 模式时间，统一换算为十进制天
    pub time: f64,
    /// 动能
    pub kinetic_energy: f64,
    /// 势能
    pub potential_energy: f64,
    /// 总能量
    pub total_energy: f64,
    /// 净体积
    pub net_volume: f64,
}

/// Courant 数（CFL）采样
///
/// 与 [`StepRecord`] 之间没有共享键，无法可靠地按位置对应。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CflRecord {
    /// u 方向 Courant 数
    pub cu: f64,
    /// v 方向 Courant 数
    pub cv: f64,
    /// w 方向 Courant 数
    pub cw: f64,
    /// 最大稳定性参数
    pub max_stability_parameter: f64,
}

/// 一次模式运行日志的解析结果
///
/// 三个可选序列只有在至少捕获到一条记录时才为 `Some`，
/// "日志中没有该段" 与 "该段为空" 在结构上可区分。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogSummary {
    /// 消费的总行数（包括被拼接的续行）
    pub line_count: usize,
    /// 模式版本横幅文本
    pub version: String,
    /// 运行开始时间
    pub start_date: Option<NaiveDateTime>,
    /// 运行结束时间
    pub end_date: Option<NaiveDateTime>,
    /// `end_date - start_date`（秒），任一端缺失时为 NaN
    pub elapsed_seconds: f64,
    /// 声明的浮标轨迹数量，缺失时为 0
    pub float_count: i64,
    /// 物理参数
    pub parameters: ParameterInfo,
    /// 浮标投放源，按出现顺序
    pub float_sources: Option<Vec<FloatSourceRecord>>,
    /// 时间步诊断，按出现顺序
    pub steps: Option<Vec<StepRecord>>,
    /// CFL 采样，按出现顺序
    pub cfl: Option<Vec<CflRecord>>,
}

impl LogSummary {
    /// 所有出现过的网格编号（按首次出现顺序，去重）
    pub fn grids(&self) -> Vec<i64> {
        let mut grids = Vec::new();
        for step in self.steps.iter().flatten() {
            if !grids.contains(&step.grid) {
                grids.push(step.grid);
            }
        }
        grids
    }

    /// 指定网格的时间步记录，保持原有顺序
    pub fn steps_for_grid(&self, grid: i64) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .flatten()
            .filter(move |step| step.grid == grid)
    }

    /// 最后一条时间步记录
    pub fn last_step(&self) -> Option<&StepRecord> {
        self.steps.as_ref().and_then(|steps| steps.last())
    }

    /// 模拟覆盖的天数（最后一条与第一条时间步记录的时间差）
    pub fn simulated_days(&self) -> Option<f64> {
        let steps = self.steps.as_ref()?;
        let first = steps.first()?;
        let last = steps.last()?;
        Some(last.time - first.time)
    }

    /// 稳定性参数最大的 CFL 记录
    pub fn max_cfl(&self) -> Option<&CflRecord> {
        self.cfl.iter().flatten().fold(None, |best, record| match best {
            Some(b) if b.max_stability_parameter >= record.max_stability_parameter => Some(b),
            _ => Some(record),
        })
    }
}
