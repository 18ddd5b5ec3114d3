use brc_processor::config::BoundaryMode;
use brc_processor::models::new_station_map;
use brc_processor::processors::{ChunkAggregator, ParallelProcessor, ResultMerger};
use brc_processor::readers::MeasurementParser;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;

// Create test data for benchmarking
fn create_measurements(station_count: usize, lines: usize) -> String {
    let mut data = String::with_capacity(lines * 16);
    for i in 0..lines {
        let station = i % station_count;
        let tenths = ((i * 7919) % 1999) as i64 - 999;
        data.push_str(&format!(
            "Station {};{:.1}\n",
            station,
            tenths as f64 / 10.0
        ));
    }
    data
}

fn benchmark_line_parsing(c: &mut Criterion) {
    let lines = [
        "Hamburg;12.0",
        "Bulawayo;8.9",
        "Palembang;38.8",
        "St. John's;15.2",
        "Cracow;-12.6",
        "badline",
    ];
    let parser = MeasurementParser::new();

    c.bench_function("parse_line", |b| {
        b.iter(|| {
            let mut parsed = 0;
            for line in &lines {
                if parser.parse_line(black_box(line.as_bytes())).is_some() {
                    parsed += 1;
                }
            }
            black_box(parsed)
        })
    });
}

fn benchmark_chunk_aggregation(c: &mut Criterion) {
    let data = create_measurements(400, 100_000);
    let aggregator = ChunkAggregator::default();

    let mut group = c.benchmark_group("chunk_aggregation");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("aggregate_100k_lines", |b| {
        b.iter(|| {
            let (stations, stats) = aggregator.aggregate(black_box(data.as_bytes()));
            black_box((stations.len(), stats.records))
        })
    });
    group.finish();
}

fn benchmark_result_merger(c: &mut Criterion) {
    let aggregator = ChunkAggregator::default();
    let partials: Vec<_> = (0..16)
        .map(|i| {
            let data = create_measurements(400 + i, 5_000);
            aggregator.aggregate(data.as_bytes()).0
        })
        .collect();

    c.bench_function("merge_16_partials", |b| {
        b.iter(|| {
            let mut merged = new_station_map();
            for partial in partials.iter().cloned() {
                ResultMerger::merge_stations(&mut merged, partial);
            }
            black_box(merged.len())
        })
    });
}

fn benchmark_pipeline_by_workers(c: &mut Criterion) {
    let data = create_measurements(400, 200_000);
    let mut group = c.benchmark_group("pipeline_by_workers");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(20);

    for &workers in &[1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, &workers| {
            let processor = ParallelProcessor::new(workers)
                .with_chunk_size(256 * 1024)
                .with_queue_depth(64)
                .with_boundary_mode(BoundaryMode::Stitch);

            b.iter(|| {
                let merged = processor
                    .process_reader(Cursor::new(data.as_bytes()), None)
                    .unwrap();
                black_box(merged.stations.len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_line_parsing,
    benchmark_chunk_aggregation,
    benchmark_result_merger,
    benchmark_pipeline_by_workers
);
criterion_main!(benches);
