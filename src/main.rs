//! `romslog` 命令行工具
//!
//! - `romslog summary <FILE>` 解析单个运行日志
//! - `romslog batch <FILE>...` 并行解析多个运行日志
//!
//! 日志级别由 `RUST_LOG` 控制，默认 `romslog=info,roms_log_parser=info`。

use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use roms_log_parser::{LogSummary, parse_log_from_args, parse_logs_from_files};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Summarize ROMS/TOMS run transcripts.
#[derive(Debug, Parser)]
#[command(name = "romslog", version)]
struct Cli {
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarize exactly one log file.
    Summary {
        /// Log file (`.zst` is decompressed transparently).
        files: Vec<OsString>,
    },
    /// Summarize several log files in parallel.
    Batch {
        /// Log files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// 未设置 `RUST_LOG` 时的过滤规则，库的事件使用 `roms_log_parser` 作为 target
const DEFAULT_LOG_FILTER: &str = "romslog=info,roms_log_parser=info";

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// 返回 `Ok(false)` 表示批量模式中有文件解析失败
fn run(cli: Cli) -> Result<bool, Box<dyn Error>> {
    match cli.command {
        Command::Summary { files } => {
            let summary = parse_log_from_args(&files)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            Ok(true)
        }
        Command::Batch { files } => {
            let results = parse_logs_from_files(&files);
            let all_ok = results.iter().all(Result::is_ok);

            if cli.json {
                let values: Vec<serde_json::Value> = files
                    .iter()
                    .zip(&results)
                    .map(|(path, result)| match result {
                        Ok(summary) => serde_json::json!({
                            "path": path.display().to_string(),
                            "summary": summary,
                        }),
                        Err(e) => serde_json::json!({
                            "path": path.display().to_string(),
                            "error": e.to_string(),
                        }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                for (path, result) in files.iter().zip(&results) {
                    match result {
                        Ok(summary) => println!("{}: {}", path.display(), one_line(summary)),
                        Err(e) => println!("{}: error: {e}", path.display()),
                    }
                }
            }
            Ok(all_ok)
        }
    }
}

fn one_line(summary: &LogSummary) -> String {
    format!(
        "{} lines, {} steps, {} cfl, elapsed {}",
        summary.line_count,
        summary.steps.as_ref().map_or(0, Vec::len),
        summary.cfl.as_ref().map_or(0, Vec::len),
        format_seconds(summary.elapsed_seconds),
    )
}

fn format_seconds(seconds: f64) -> String {
    if seconds.is_nan() {
        "unknown".to_string()
    } else {
        format!("{seconds:.0}s")
    }
}

fn print_summary(summary: &LogSummary) {
    let or_unset = |d: Option<chrono::NaiveDateTime>| {
        d.map_or_else(|| "unset".to_string(), |d| d.to_string())
    };

    println!("lines:         {}", summary.line_count);
    println!("version:       {}", summary.version);
    println!("start:         {}", or_unset(summary.start_date));
    println!("end:           {}", or_unset(summary.end_date));
    println!("elapsed:       {}", format_seconds(summary.elapsed_seconds));
    println!("floats:        {}", summary.float_count);
    if let Some(dstart) = summary.parameters.dstart {
        println!("dstart:        {dstart}");
    }
    if let Some(sources) = &summary.float_sources {
        println!("float sources: {}", sources.len());
    }
    if let Some(steps) = &summary.steps {
        println!("steps:         {} (grids {:?})", steps.len(), summary.grids());
        if let Some(days) = summary.simulated_days() {
            println!("simulated:     {days:.4} days");
        }
    }
    if let Some(cfl) = summary.max_cfl() {
        println!(
            "max cfl:       {} (cu {}, cv {}, cw {})",
            cfl.max_stability_parameter, cfl.cu, cfl.cv, cfl.cw
        );
    }
}
