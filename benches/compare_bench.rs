use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dircmp::compare::{ComparisonEngine, DirectoryScanner, tally};
use dircmp::utils::hash::{hash_file, hash_file_streaming};
use filetime::FileTime;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use tempfile::{TempDir, tempdir};

/// Two trees of `count` files each where every third file differs in content
/// only, so classification has to hash.
fn create_trees(count: usize) -> (TempDir, ComparisonEngine) {
    let dir = tempdir().unwrap();
    let left = dir.path().join("left");
    let right = dir.path().join("right");
    let mtime = FileTime::from_unix_time(1_700_000_000, 0);

    for i in 0..count {
        let rel = format!("dir_{}/file_{i}.txt", i % 10);
        let content = format!("This is test file number {i:06} with some content");
        let other = if i % 3 == 0 {
            content.replace("test", "TEST")
        } else {
            content.clone()
        };
        write(&left.join(&rel), &content, mtime);
        write(&right.join(&rel), &other, mtime);
    }

    let engine = ComparisonEngine::new(&left, &right, DirectoryScanner::default());
    (dir, engine)
}

fn write(path: &Path, content: &str, mtime: FileTime) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    filetime::set_file_mtime(path, mtime).unwrap();
}

fn benchmark_scan_and_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_and_compare");

    for count in &[100, 1000] {
        let (_dir, engine) = create_trees(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &engine, |b, engine| {
            b.iter(|| black_box(engine.run()));
        });
    }

    group.finish();
}

fn benchmark_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    for count in &[100, 1000] {
        let (_dir, engine) = create_trees(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &engine, |b, engine| {
            // Fresh results each time so hashes are not already cached
            b.iter(|| tally(black_box(&engine.run())));
        });
    }

    group.finish();
}

fn benchmark_hashing(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let medium_file = dir.path().join("medium.bin");
    let large_file = dir.path().join("large.bin");

    fs::write(&medium_file, vec![b'b'; 1024 * 100]).unwrap(); // 100KB
    fs::write(&large_file, vec![b'c'; 1024 * 1024 * 10]).unwrap(); // 10MB

    let mut group = c.benchmark_group("file_hashing");

    group.bench_function("hash_100kb", |b| {
        b.iter(|| hash_file(black_box(&medium_file)));
    });
    group.bench_function("hash_10mb_mmap", |b| {
        b.iter(|| hash_file(black_box(&large_file)));
    });
    group.bench_function("hash_10mb_streaming", |b| {
        b.iter(|| hash_file_streaming(black_box(&large_file)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_scan_and_compare,
    benchmark_classification,
    benchmark_hashing
);
criterion_main!(benches);
