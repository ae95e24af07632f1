//! 行形状判断工具
//!
//! 这里的函数都是无副作用的纯谓词，在提交到某种记录形状之前调用，
//! 让格式不符的行可以落到下一个候选形状或被直接丢弃，而不会在解码时失败。

// 日期格式常量（"YYYY-MM-DD"）
const DATE_LENGTH: usize = 10;
const DATE_SEPARATOR_POSITIONS: [usize; 2] = [4, 7];
const DATE_DIGIT_POSITIONS: [usize; 8] = [0, 1, 2, 3, 5, 6, 8, 9];

// 时刻格式常量（"HH:MM:SS"）
const HMS_LENGTH: usize = 8;
const HMS_SEPARATOR_POSITIONS: [usize; 2] = [2, 5];
const HMS_DIGIT_POSITIONS: [usize; 6] = [0, 1, 3, 4, 6, 7];

/// 判断 token 是否为格式良好的实数
///
/// 接受 `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`。
/// 与 `str::parse::<f64>` 不同，`inf`、`NaN` 之类的单词不算数字。
pub fn is_numeric_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// 判断 token 是否为 `HH:MM:SS`（两位数字、冒号、两位数字、冒号、两位数字）
#[inline]
pub fn is_hms_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() != HMS_LENGTH {
        return false;
    }
    HMS_SEPARATOR_POSITIONS.iter().all(|&i| bytes[i] == b':')
        && HMS_DIGIT_POSITIONS.iter().all(|&i| bytes[i].is_ascii_digit())
}

/// 判断 token 是否为带括号的三元组 `(a,b,c)`，分隔符之间可以是任意字符
pub fn is_index_triple_token(token: &str) -> bool {
    let Some(inner) = token
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return false;
    };
    memchr::memchr_iter(b',', inner.as_bytes()).count() >= 2
}

/// 期望输入至少 10 字节，只检查前 10 字节是否符合 `YYYY-MM-DD`
#[inline(always)]
pub fn is_date_prefix_bytes(bytes: &[u8]) -> bool {
    if bytes.len() < DATE_LENGTH {
        return false;
    }

    for &pos in &DATE_SEPARATOR_POSITIONS {
        if bytes[pos] != b'-' {
            return false;
        }
    }

    for &i in &DATE_DIGIT_POSITIONS {
        if !bytes[i].is_ascii_digit() {
            return false;
        }
    }

    true
}

/// 查找文本中第一个 `YYYY-MM-DD` 的起始位置
pub fn find_date(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    memchr::memchr_iter(b'-', bytes)
        .filter(|&dash| dash >= 4)
        .map(|dash| dash - 4)
        .find(|&start| {
            is_date_prefix_bytes(&bytes[start..])
                && (start == 0 || !bytes[start - 1].is_ascii_digit())
        })
}

///
/// 判断一行日志是否为运行开始时间行。
///
/// 判断标准
/// 1. 行首恰好是 `indent` 个空格。
/// 2. 紧接着是 `YYYY-MM-DD` 形式的日期。
/// 3. 行尾（去掉尾部空白后）是以 `M` 结尾的两字符标记，如 `AM` / `PM`。
pub fn is_start_date_line(line: &str, indent: usize) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < indent + DATE_LENGTH {
        return false;
    }

    if !bytes[..indent].iter().all(|&b| b == b' ') {
        return false;
    }

    if !is_date_prefix_bytes(&bytes[indent..]) {
        return false;
    }

    let Some(marker) = line[indent + DATE_LENGTH..].split_whitespace().last() else {
        return false;
    };
    marker.len() == 2 && marker.ends_with('M') && marker.as_bytes()[0].is_ascii_alphabetic()
}
