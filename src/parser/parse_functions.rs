//! 核心解码函数
//!
//! 每种记录都有一个定长的按位置解码器：取前 N 个 token，依声明顺序填入 N 个字段。
//! 解码失败返回 `None`，由调用方决定丢弃该行，失败不会向外传播。

use chrono::NaiveDateTime;

use crate::parser::constants::{
    CFL_FIELDS, ENERGY_FIELDS, FLOAT_SOURCE_FIELDS, FLOAT_SOURCE_FIRST_LINE_FIELDS, STEP_FIELDS,
};
use crate::summary::{CflRecord, FloatSourceRecord, StepRecord};
use crate::tools::{find_date, is_hms_token, is_index_triple_token, is_numeric_token};

/// 时间步段中一行解出的内容
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepLine {
    /// 时间步能量诊断
    Step(StepRecord),
    /// CFL 采样
    Cfl(CflRecord),
}

/// 浮标段中一行的形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatSourceShape {
    /// 11 个数字：完整记录
    SingleLine,
    /// 7 个数字：记录的前半部分，下一行是续行
    FirstOfTwo,
    /// 其他
    Unrecognized,
}

/// 取前 N 个 token 组成定长数组，不足 N 个时返回 `None`
#[inline]
fn take_fields<'a, const N: usize>(tokens: &[&'a str]) -> Option<[&'a str; N]> {
    tokens.get(..N)?.try_into().ok()
}

/// 解析实数字段，只接受格式良好的数字
#[inline]
pub(crate) fn parse_real(token: &str) -> Option<f64> {
    if is_numeric_token(token) {
        token.parse().ok()
    } else {
        None
    }
}

/// 解析整数字段
#[inline]
pub(crate) fn parse_int(token: &str) -> Option<i64> {
    token.parse().ok()
}

/// 按 (grid, coord, count, t0, x0, y0, z0, dt, dx, dy, dz) 解码浮标源记录
pub fn decode_float_source(tokens: &[&str]) -> Option<FloatSourceRecord> {
    let [grid, coord, count, t0, x0, y0, z0, dt, dx, dy, dz] =
        take_fields::<FLOAT_SOURCE_FIELDS>(tokens)?;
    Some(FloatSourceRecord {
        grid: parse_int(grid)?,
        coordinate_flag: parse_int(coord)?,
        count: parse_int(count)?,
        t0: parse_real(t0)?,
        x0: parse_real(x0)?,
        y0: parse_real(y0)?,
        z0: parse_real(z0)?,
        dt: parse_real(dt)?,
        dx: parse_real(dx)?,
        dy: parse_real(dy)?,
        dz: parse_real(dz)?,
    })
}

/// 按 (grid, step, time, ke, pe, te, nv) 解码时间步记录
pub fn decode_step(tokens: &[&str]) -> Option<StepRecord> {
    let [grid, step, time, ke, pe, te, nv] = take_fields::<STEP_FIELDS>(tokens)?;
    Some(StepRecord {
        grid: parse_int(grid)?,
        step: parse_int(step)?,
        time: parse_real(time)?,
        kinetic_energy: parse_real(ke)?,
        potential_energy: parse_real(pe)?,
        total_energy: parse_real(te)?,
        net_volume: parse_real(nv)?,
    })
}

/// 由已知的网格、步号、时间和能量字段组装时间步记录
fn assemble_step(grid: i64, step: &str, time: f64, energies: &[&str]) -> Option<StepRecord> {
    let [ke, pe, te, nv] = take_fields::<ENERGY_FIELDS>(energies)?;
    Some(StepRecord {
        grid,
        step: parse_int(step)?,
        time,
        kinetic_energy: parse_real(ke)?,
        potential_energy: parse_real(pe)?,
        total_energy: parse_real(te)?,
        net_volume: parse_real(nv)?,
    })
}

/// 按 (cu, cv, cw, max) 解码 CFL 记录
pub fn decode_cfl(tokens: &[&str]) -> Option<CflRecord> {
    let [cu, cv, cw, max] = take_fields::<CFL_FIELDS>(tokens)?;
    Some(CflRecord {
        cu: parse_real(cu)?,
        cv: parse_real(cv)?,
        cw: parse_real(cw)?,
        max_stability_parameter: parse_real(max)?,
    })
}

/// 把整日数与 `HH:MM:SS` 合成为十进制天
///
/// `day + (hour + (minute + second / 60) / 60) / 24`
pub fn day_time_to_days(day: f64, hms: &str) -> Option<f64> {
    if !is_hms_token(hms) {
        return None;
    }
    let hour: f64 = hms[0..2].parse().ok()?;
    let minute: f64 = hms[3..5].parse().ok()?;
    let second: f64 = hms[6..8].parse().ok()?;
    Some(day + (hour + (minute + second / 60.0) / 60.0) / 24.0)
}

/// 判断除 `skip` 位置以外的所有 token 是否都是数字
#[inline]
fn all_numeric_except(tokens: &[&str], skip: usize) -> bool {
    tokens
        .iter()
        .enumerate()
        .all(|(i, t)| i == skip || is_numeric_token(t))
}

/// 解码时间步段中的一行
///
/// 按以下顺序尝试，第一个匹配的形状生效：
/// 1. 单网格：`step day HH:MM:SS ke pe te nv`，网格号补 0
/// 2. 多网格：`grid step day HH:MM:SS ke pe te nv`
/// 3. CFL：`(i,j,k) cu cv cw max`
/// 4. 纯数字：6 个 token 时为 `step time ke pe te nv`（网格号补 0），
///    7 个及以上时为 `grid step time ke pe te nv`
///
/// 形状匹配但字段解码失败时返回 `None`，不会再尝试后面的形状。
pub fn decode_step_mode_line(tokens: &[&str]) -> Option<StepLine> {
    let n = tokens.len();

    if n >= 7 && is_hms_token(tokens[2]) && all_numeric_except(tokens, 2) {
        let time = day_time_to_days(parse_real(tokens[1])?, tokens[2])?;
        return assemble_step(0, tokens[0], time, &tokens[3..]).map(StepLine::Step);
    }

    if n >= 8 && is_hms_token(tokens[3]) && all_numeric_except(tokens, 3) {
        let time = day_time_to_days(parse_real(tokens[2])?, tokens[3])?;
        let grid = parse_int(tokens[0])?;
        return assemble_step(grid, tokens[1], time, &tokens[4..]).map(StepLine::Step);
    }

    if n >= 5 && is_index_triple_token(tokens[0]) {
        return decode_cfl(&tokens[1..]).map(StepLine::Cfl);
    }

    if n >= 6 && tokens.iter().all(|t| is_numeric_token(t)) {
        let record = if n == 6 {
            assemble_step(0, tokens[0], parse_real(tokens[1])?, &tokens[2..])
        } else {
            decode_step(tokens)
        };
        return record.map(StepLine::Step);
    }

    None
}

/// 判断浮标段中一行的形状（只看 token 数与是否全为数字，不看标签）
pub fn float_source_shape(tokens: &[&str]) -> FloatSourceShape {
    if !tokens.iter().all(|t| is_numeric_token(t)) {
        return FloatSourceShape::Unrecognized;
    }
    match tokens.len() {
        FLOAT_SOURCE_FIELDS => FloatSourceShape::SingleLine,
        FLOAT_SOURCE_FIRST_LINE_FIELDS => FloatSourceShape::FirstOfTwo,
        _ => FloatSourceShape::Unrecognized,
    }
}

/// 解码参数段中的一行：`<number> <label> ...`，标签不区分大小写
pub fn decode_parameter_line(tokens: &[&str], label: &str) -> Option<f64> {
    let [value, name] = take_fields(tokens)?;
    if !name.eq_ignore_ascii_case(label) {
        return None;
    }
    parse_real(value)
}

/// 日期解析：从横幅文本中取出日期时间
///
/// 定位第一个 `YYYY-MM-DD`，压缩空白后依次尝试各格式；
/// 尾部若有多余文字，逐个去掉尾部 token 再试。
pub fn parse_banner_date<S: AsRef<str>>(text: &str, formats: &[S]) -> Option<NaiveDateTime> {
    let start = find_date(text)?;
    let tokens: Vec<&str> = text[start..].split_whitespace().collect();

    (1..=tokens.len()).rev().find_map(|n| {
        let candidate = tokens[..n].join(" ");
        formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&candidate, fmt.as_ref()).ok())
    })
}
