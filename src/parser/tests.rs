use std::io::{self, BufReader, Cursor, Read};

use chrono::NaiveDate;

use super::*;
use crate::ParseError;
use crate::parser_config::ParserConfig;

const START_LINE: &str = "                    2014-03-03 01:23:45 PM";
const VERSION_LINE: &str = " Model Input Parameters:  ROMS/TOMS version 3.9  ";
const DONE_LINE: &str = " ROMS/TOMS: DONE... 2014-03-03 01:25:15 PM";
const STEP_HEADER: &str =
    "   STEP   Day HH:MM:SS  KINETIC_ENRG   POTEN_ENRG    TOTAL_ENRG    NET_VOLUME";
const FLOATS_HEADER: &str = " Floats Initial Locations:";
const PARAMS_HEADER: &str = " Physical Parameters, Grid: 01";

fn join(lines: &[&str]) -> String {
    let mut s = lines.join("\n");
    s.push('\n');
    s
}

fn parse_lines(lines: &[&str]) -> crate::LogSummary {
    parse_log_from_string(&join(lines)).unwrap()
}

/// 读到一定数据之后报错的数据源
struct BrokenPipe;

impl Read for BrokenPipe {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream truncated"))
    }
}

#[test]
fn test_empty_input_is_error() {
    assert_eq!(parse_log_from_string(""), Err(ParseError::EmptyInput));
}

#[test]
fn test_single_blank_line_is_not_empty() {
    let summary = parse_log_from_string("\n").unwrap();
    assert_eq!(summary.line_count, 1);
    assert!(summary.version.is_empty());
    assert!(summary.elapsed_seconds.is_nan());
}

#[test]
fn test_read_failure_is_surfaced() {
    let data = join(&[STEP_HEADER, "  0  0 00:00:00  1.0  2.0  3.0  4.0"]);
    let reader = BufReader::new(Cursor::new(data.into_bytes()).chain(BrokenPipe));
    let err = LogParser::new(reader).parse().unwrap_err();
    assert!(matches!(err, ParseError::ReadFailure { line: 2, .. }));
}

#[test]
fn test_end_to_end_banners_and_steps() {
    let summary = parse_lines(&[
        START_LINE,
        VERSION_LINE,
        STEP_HEADER,
        "      0  0.0000  1.0  2.0  3.0  4.0",
        "     10  0.5000  1.1  2.1  3.2  4.0",
        "     20  1.0000  1.2  2.2  3.4  4.0",
        DONE_LINE,
    ]);

    assert_eq!(summary.line_count, 7);
    assert_eq!(summary.version, "ROMS/TOMS version 3.9");
    assert_eq!(summary.steps.as_ref().map(Vec::len), Some(3));

    let start = NaiveDate::from_ymd_opt(2014, 3, 3)
        .unwrap()
        .and_hms_opt(13, 23, 45)
        .unwrap();
    assert_eq!(summary.start_date, Some(start));
    assert_eq!(summary.elapsed_seconds, 90.0);
    assert!(summary.float_sources.is_none());
    assert!(summary.cfl.is_none());
}

#[test]
fn test_missing_completion_banner_gives_nan_elapsed() {
    let summary = parse_lines(&[START_LINE, VERSION_LINE]);
    assert!(summary.start_date.is_some());
    assert!(summary.end_date.is_none());
    assert!(summary.elapsed_seconds.is_nan());
}

#[test]
fn test_single_grid_time_normalization() {
    for (day, h, m, s) in [(0, 0, 0, 0), (3, 6, 0, 0), (12, 23, 59, 59), (400, 1, 30, 36)] {
        let line = format!("  7  {day}  {h:02}:{m:02}:{s:02}  1.0  2.0  3.0  4.0");
        let summary = parse_lines(&[STEP_HEADER, line.as_str()]);
        let rec = summary.steps.unwrap()[0];
        let expected = day as f64 + (h * 3600 + m * 60 + s) as f64 / 86_400.0;
        assert!((rec.time - expected).abs() < 1e-9, "{line}");
        assert_eq!(rec.grid, 0);
        assert_eq!(rec.step, 7);
    }
}

#[test]
fn test_multi_grid_fields_not_shifted() {
    let summary = parse_lines(&[
        STEP_HEADER,
        "  1   480  5 12:00:00  1.0E-03  2.0E+02  2.0E+02  3.0E+13",
        "  2  1440  5 12:00:00  4.0E-03  5.0E+02  5.0E+02  6.0E+13",
    ]);
    let steps = summary.steps.unwrap();
    assert_eq!((steps[0].grid, steps[0].step), (1, 480));
    assert_eq!((steps[1].grid, steps[1].step), (2, 1440));
    assert_eq!(steps[1].time, 5.5);
    assert_eq!(steps[1].kinetic_energy, 4.0e-3);
}

#[test]
fn test_step_order_is_preserved() {
    let summary = parse_lines(&[
        STEP_HEADER,
        "  10  0 00:00:00  1.0  2.0  3.0  4.0",
        "  20  0 00:10:00  1.0  2.0  3.0  4.0",
        "   5  0 00:20:00  1.0  2.0  3.0  4.0",
        "  40  0 00:30:00  1.0  2.0  3.0  4.0",
    ]);
    let order: Vec<i64> = summary.steps.unwrap().iter().map(|r| r.step).collect();
    assert_eq!(order, vec![10, 20, 5, 40]);
}

#[test]
fn test_unrelated_line_between_steps() {
    let clean = parse_lines(&[
        STEP_HEADER,
        "  10  0 00:00:00  1.0  2.0  3.0  4.0",
        "  20  0 00:10:00  1.0  2.0  3.0  4.0",
    ]);
    let noisy = parse_lines(&[
        STEP_HEADER,
        "  10  0 00:00:00  1.0  2.0  3.0  4.0",
        " Writing history fields, file: ocean_his.nc",
        "  20  0 00:10:00  1.0  2.0  3.0  4.0",
    ]);
    assert_eq!(noisy.steps, clean.steps);
    assert_eq!(noisy.line_count, clean.line_count + 1);
}

#[test]
fn test_cfl_records_and_header() {
    let summary = parse_lines(&[
        STEP_HEADER,
        "  (i,j,k)        Cu            Cv            Cw         Max Speed",
        "      0     0 00:00:00  0.000000E+00  6.412345E+02  6.412345E+02  1.234567E+13",
        "  (130,061,30)  4.0E-02  3.0E-02  1.0E-03  7.0E-02",
        "      1     0 00:01:00  1.000000E-05  6.412345E+02  6.412345E+02  1.234567E+13",
        "  (012,100,01)  5.0E-02  1.0E-02  2.0E-03  6.0E-02",
    ]);
    let cfl = summary.cfl.unwrap();
    assert_eq!(cfl.len(), 2);
    assert_eq!(cfl[0].max_stability_parameter, 0.07);
    assert_eq!(cfl[1].cu, 0.05);
    assert_eq!(summary.steps.unwrap().len(), 2);
}

#[test]
fn test_absent_cfl_is_none_not_empty() {
    let summary = parse_lines(&[STEP_HEADER, "  0  0 00:00:00  1.0  2.0  3.0  4.0"]);
    assert!(summary.cfl.is_none());
    assert!(summary.steps.is_some());
}

#[test]
fn test_repeated_header_is_idempotent() {
    let mut once = LogParser::new(Cursor::new(join(&[FLOATS_HEADER])));
    once.scan().unwrap();
    let mut twice = LogParser::new(Cursor::new(join(&[FLOATS_HEADER, FLOATS_HEADER])));
    twice.scan().unwrap();

    assert_eq!(once.mode(), SectionMode::FloatSources);
    assert_eq!(twice.mode(), once.mode());
}

#[test]
fn test_headers_are_case_insensitive_and_reset_mode() {
    let mut parser = LogParser::new(Cursor::new(join(&[
        " PHYSICAL PARAMETERS, Grid: 01",
        STEP_HEADER,
    ])));
    parser.scan().unwrap();
    assert_eq!(parser.mode(), SectionMode::Steps);

    let mut parser = LogParser::new(Cursor::new(join(&[STEP_HEADER, PARAMS_HEADER])));
    parser.scan().unwrap();
    assert_eq!(parser.mode(), SectionMode::Parameters);
}

#[test]
fn test_step_lines_ignored_outside_step_section() {
    let summary = parse_lines(&["  0  0 00:00:00  1.0  2.0  3.0  4.0"]);
    assert!(summary.steps.is_none());

    let summary = parse_lines(&[PARAMS_HEADER, "  0  0 00:00:00  1.0  2.0  3.0  4.0"]);
    assert!(summary.steps.is_none());
}

#[test]
fn test_dstart_last_write_wins() {
    let summary = parse_lines(&[
        PARAMS_HEADER,
        "        1000  ntimes          Number of timesteps for 3-D equations.",
        "      0.0000  dstart          Time-stamp assigned to model initialization (days).",
        "    120.5000  DSTART          Time-stamp assigned to model initialization (days).",
    ]);
    assert_eq!(summary.parameters.dstart, Some(120.5));
}

#[test]
fn test_float_source_single_and_double_line() {
    let single = parse_lines(&[
        FLOATS_HEADER,
        "  1  0  5  0.0  10.0  20.0  -5.0  0.1  0.5  0.5  1.0",
    ]);
    let double = parse_lines(&[
        FLOATS_HEADER,
        "  1  0  5  0.0  10.0  20.0  -5.0",
        "  0.1  0.5  0.5  1.0",
    ]);

    assert_eq!(double.line_count, single.line_count + 1);
    assert_eq!(double.float_sources, single.float_sources);

    let rec = single.float_sources.unwrap()[0];
    assert_eq!((rec.grid, rec.coordinate_flag, rec.count), (1, 0, 5));
    assert_eq!(rec.z0, -5.0);
    assert_eq!(rec.dz, 1.0);
}

#[test]
fn test_double_line_consumes_two_lines() {
    let mut parser = LogParser::new(Cursor::new(join(&[FLOATS_HEADER])));
    parser.scan().unwrap();
    let before = parser.line_count();

    let with_record = parse_lines(&[
        FLOATS_HEADER,
        "  1  1  5  0.0  1.0  2.0  3.0",
        "  0.1  0.5  0.5  1.0",
    ]);
    assert_eq!(with_record.line_count, before + 2);
    assert_eq!(with_record.float_sources.map(|v| v.len()), Some(1));
}

#[test]
fn test_double_line_truncated_at_end_of_input() {
    let summary = parse_lines(&[FLOATS_HEADER, "  1  1  5  0.0  1.0  2.0  3.0"]);
    assert_eq!(summary.line_count, 2);
    assert!(summary.float_sources.is_none());
}

#[test]
fn test_float_count_line_exits_float_mode() {
    let summary = parse_lines(&[
        FLOATS_HEADER,
        "   Fgrd Fcoor Ftype Fcount  Ft0  Fx0  Fy0  Fz0  Fdt  Fdx  Fdy  Fdz",
        "  1  0  5  0.0  10.0  20.0  -5.0  0.1  0.5  0.5  1.0",
        "       120  Nfloats         Number of float trajectories to compute.",
        "  1  0  5  0.0  10.0  20.0  -5.0  0.1  0.5  0.5  1.0",
    ]);
    assert_eq!(summary.float_count, 120);
    assert_eq!(summary.float_sources.map(|v| v.len()), Some(1));
}

#[test]
fn test_float_count_line_outside_float_mode_is_ignored() {
    let summary = parse_lines(&["       120  Nfloats         Number of float trajectories to compute."]);
    assert_eq!(summary.float_count, 0);
}

#[test]
fn test_crlf_and_invalid_utf8_lines() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(STEP_HEADER.as_bytes());
    bytes.extend_from_slice(b"\r\n\xff\xfe garbage\r\n");
    bytes.extend_from_slice(b"  3  0 00:00:00  1.0  2.0  3.0  4.0\r\n");

    let summary = LogParser::new(Cursor::new(bytes)).parse().unwrap();
    assert_eq!(summary.line_count, 3);
    assert_eq!(summary.steps.unwrap()[0].step, 3);
}

#[test]
fn test_borrowed_reader_remains_usable() {
    let mut source = Cursor::new(join(&[VERSION_LINE]));
    let summary = LogParser::new(&mut source).parse().unwrap();
    assert_eq!(summary.line_count, 1);
    assert_eq!(source.position() as usize, source.get_ref().len());
}

#[test]
fn test_custom_config() {
    let config = ParserConfig {
        version_banner: "MYMODEL release".to_string(),
        step_header_tokens: vec!["iter".to_string(), "energy".to_string()],
        ..ParserConfig::default()
    };
    let data = join(&[
        " MYMODEL release 1.2",
        " ITER  TIME  ENERGY",
        "  1  0.5  1.0  2.0  3.0  4.0",
    ]);
    let summary = LogParser::with_config(Cursor::new(data), config).parse().unwrap();
    assert_eq!(summary.version, "MYMODEL release 1.2");
    assert_eq!(summary.steps.unwrap()[0].time, 0.5);
}
