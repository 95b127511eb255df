use asset_core::bundle::MemoryBundle;
use asset_core::{CopyProgress, NoProgress, SyncConfig, SyncOrchestrator, TreeCopier};
use asset_fs::{NormalizedPath, purge};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use tempfile::tempdir;

fn sample_bundle() -> MemoryBundle {
    let mut bundle = MemoryBundle::new();
    bundle.insert_file("share/version.txt", b"1".to_vec());
    for dir in 0..10 {
        for file in 0..20 {
            bundle.insert_file(format!("share/d{dir}/f{file}.bin"), vec![dir as u8; 4096]);
        }
    }
    bundle
}

fn tree_copy_benchmark(c: &mut Criterion) {
    let bundle = sample_bundle();
    let mut group = c.benchmark_group("TreeCopier::copy (200 x 4 KiB)");

    for buffer_size in [1024usize, 8 * 1024, 64 * 1024] {
        group.bench_function(format!("buffer {buffer_size}"), |b| {
            let dir = tempdir().unwrap();
            let dest = NormalizedPath::new(dir.path().join("share"));

            b.iter_batched(
                || purge(&dest).unwrap(),
                |_| {
                    TreeCopier::new(&bundle, NormalizedPath::new("share"))
                        .with_buffer_size(buffer_size)
                        .copy(
                            black_box(&NormalizedPath::new("share")),
                            &dest,
                            &mut CopyProgress::new(),
                            &mut NoProgress,
                        )
                        .unwrap()
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

fn noop_run_benchmark(c: &mut Criterion) {
    c.bench_function("SyncOrchestrator::run (up to date)", |b| {
        let dir = tempdir().unwrap();
        let dest = NormalizedPath::new(dir.path().join("share"));
        std::fs::create_dir_all(dest.to_native()).unwrap();
        std::fs::write(dest.join("version.txt").to_native(), "1").unwrap();

        b.iter_batched(
            || {
                SyncOrchestrator::new(Box::new(sample_bundle()), dest.clone(), SyncConfig::default())
                    .unwrap()
            },
            |orchestrator| orchestrator.run(&mut NoProgress),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, tree_copy_benchmark, noop_run_benchmark);
criterion_main!(benches);
