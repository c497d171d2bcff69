//! パフォーマンスベンチマーク
//!
//! メモリ上のグリッド（部署50列 × サービス2000行）を使用して、
//! レコード抽出とドキュメント生成の速度を測定します。

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use frgu_classif::{build_document, extract, ClassifierSchema, ExtractOptions, MemoryGrid};

const DEPARTMENTS: usize = 50;
const SERVICES: usize = 2000;

/// ベンチマーク用のグリッドを生成
fn generate_grid() -> MemoryGrid {
    let mut rows = Vec::with_capacity(SERVICES + 2);

    let mut names = vec![None, None];
    let mut codes = vec![None, None];
    for d in 0..DEPARTMENTS {
        names.push(Some(format!("Ведомство {}", d)));
        codes.push(Some(format!("{:02}", d)));
    }
    rows.push(names);
    rows.push(codes);

    for s in 0..SERVICES {
        let mut row = vec![Some(format!("{:04}", s)), Some(format!("Услуга {}", s))];
        for d in 0..DEPARTMENTS {
            // 一部のセルは参照数式・空セル
            let cell = match (s + d) % 10 {
                0 => Some("ВПР(A1;B:B;1)".to_string()),
                1 => None,
                _ => Some(format!("{}{}", d, s)),
            };
            row.push(cell);
        }
        rows.push(row);
    }

    MemoryGrid::new("Sheet1", rows)
}

fn benchmark_extract(c: &mut Criterion) {
    let grid = generate_grid();
    let options = ExtractOptions::default();

    let mut group = c.benchmark_group("extract");
    group.throughput(Throughput::Elements((DEPARTMENTS * SERVICES) as u64));
    group.bench_function("extract_50x2000", |b| {
        b.iter(|| extract(black_box(&grid), black_box(&options)).unwrap())
    });
    group.finish();
}

fn benchmark_document(c: &mut Criterion) {
    let grid = generate_grid();
    let records = extract(&grid, &ExtractOptions::default()).unwrap().records;
    let schema = ClassifierSchema::default();

    let mut group = c.benchmark_group("document");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("build_document", |b| {
        b.iter(|| build_document(black_box(&records), black_box(&schema)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, benchmark_extract, benchmark_document);
criterion_main!(benches);
