use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use roms_log_parser::{LogParser, parse_log_from_string};
use std::io::Cursor;

// 生成测试数据：时间步行与 CFL 行交替出现
fn generate_test_data(num_steps: usize) -> String {
    let mut log_text = String::new();
    log_text.push_str("                    2014-03-03 01:23:45 PM\n");
    log_text.push_str(" Model Input Parameters:  ROMS/TOMS version 3.9\n");
    log_text.push_str(
        "   STEP   Day HH:MM:SS  KINETIC_ENRG   POTEN_ENRG    TOTAL_ENRG    NET_VOLUME\n",
    );
    for i in 0..num_steps {
        let seconds = i * 300;
        log_text.push_str(&format!(
            "{:7} {:5} {:02}:{:02}:{:02}  {:.6E}  6.412345E+02  6.412345E+02  1.234567E+13\n",
            i,
            seconds / 86_400,
            (seconds / 3600) % 24,
            (seconds / 60) % 60,
            seconds % 60,
            i as f64 * 1.0e-6,
        ));
        log_text.push_str(&format!(
            "         ({:03},{:03},30)  4.123000E-02  3.200000E-02  1.000000E-03  7.123000E-02\n",
            i % 100,
            i % 80
        ));
        if i % 50 == 0 {
            log_text.push_str(" DEF_HIS     - creating history file, Grid 01: ocean_his.nc\n");
        }
    }
    log_text.push_str(" ROMS/TOMS: DONE... 2014-03-03 02:23:45 PM\n");
    log_text
}

fn benchmark_log_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_scan");

    for size in [100, 1000, 10000].iter() {
        let log_text = generate_test_data(*size);
        group.bench_with_input(
            BenchmarkId::new("parse_log_from_string", size),
            &log_text,
            |b, text| b.iter(|| black_box(parse_log_from_string(black_box(text)))),
        );
        group.bench_with_input(BenchmarkId::new("log_parser_bytes", size), &log_text, |b, text| {
            b.iter(|| {
                let parser = LogParser::new(Cursor::new(black_box(text.as_bytes())));
                black_box(parser.parse())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_log_scan);
criterion_main!(benches);
