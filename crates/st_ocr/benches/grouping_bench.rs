use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use st_ocr::{Detection, GroupingParams, group_lines};

/// Synthetic page: `rows` lines of `words` fragments with small jitter.
fn page(rows: i32, words: i32) -> Vec<Detection> {
    let mut dets = Vec::new();
    for row in 0..rows {
        for word in 0..words {
            let x = word * 70 + (row % 3);
            let y = row * 30 + (word % 2);
            dets.push(Detection::from_rect(x, y, 60, 20, format!("w{row}x{word}"), 0.9));
        }
    }
    // Recognizers do not report in reading order.
    dets.reverse();
    dets
}

fn bench_group_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_lines");
    let params = GroupingParams::default();

    for (rows, words) in [(10, 5), (40, 12), (120, 20)] {
        let dets = page(rows, words);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{words}")),
            &dets,
            |b, dets| b.iter(|| black_box(group_lines(black_box(dets), &params))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_group_lines);
criterion_main!(benches);
