//! パフォーマンスベンチマーク
//!
//! パッケージレベルの書き込み・読み込みと、代替実装の処理時間を測定します。
//! すべてメモリ上（またはテンポラリディレクトリ）で完結し、フィクスチャは不要です。

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use xlsxloader::{
    DriverReader, PackageReader, PackageWriter, Person, RecordWriter, RowReader, WorkbookWriter,
};

/// ベンチマーク用のレコードを生成
fn people(count: u32) -> Vec<Person> {
    (0..count)
        .map(|i| Person::new(format!("First {}", i), format!("Last name {}", i), 20 + i % 60))
        .collect()
}

/// パッケージレベルの書き込み
fn benchmark_package_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("package_write");

    for count in [12u32, 1_000, 10_000] {
        let records = people(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| {
                let cursor = PackageWriter
                    .write_to(Cursor::new(Vec::new()), "sheet", black_box(records))
                    .unwrap();
                black_box(cursor)
            });
        });
    }

    group.finish();
}

/// パッケージレベルの読み込み
fn benchmark_package_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("package_read");
    let reader = PackageReader::default();

    for count in [12u32, 1_000, 10_000] {
        let data = PackageWriter
            .write_to(Cursor::new(Vec::new()), "sheet", &people(count))
            .unwrap()
            .into_inner();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| {
                let rows = reader.read_from(Cursor::new(black_box(data))).unwrap();
                black_box(rows)
            });
        });
    }

    group.finish();
}

/// 代替実装（rust_xlsxwriter + calamine）の往復
fn benchmark_workbook_driver_round_trip(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.xlsx");
    let records = people(1_000);

    let mut group = c.benchmark_group("workbook_driver");
    group.sample_size(20);

    group.bench_function("round_trip_1000", |b| {
        b.iter(|| {
            WorkbookWriter
                .write_records(&path, "sheet", black_box(&records))
                .unwrap();
            let rows = DriverReader.read_rows(&path, "sheet").unwrap();
            black_box(rows)
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(std::time::Duration::from_secs(10))
        .warm_up_time(std::time::Duration::from_secs(3));
    targets = benchmark_package_write, benchmark_package_read, benchmark_workbook_driver_round_trip
}

criterion_main!(benches);
