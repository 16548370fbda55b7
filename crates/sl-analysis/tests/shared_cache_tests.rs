//! Concurrency behavior of the shared schema cache

use sl_analysis::test_utils::{func, module, ret, schema_lit, source_file, COMMONSCHEMA};
use sl_analysis::{AnalysisResult, CacheState, ModuleLoader, SharedSchemaCache};
use sl_core::syntax::Module;
use sl_core::SharedSchemaConfig;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

/// Loader that is slow enough for concurrent first uses to overlap
struct SlowLoader {
    loads: Arc<AtomicUsize>,
}

impl ModuleLoader for SlowLoader {
    fn load(&self, dir: &Path) -> AnalysisResult<Module> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        let file = source_file(
            dir.join("schema.go").to_str().unwrap(),
            vec![
                func("Location", vec![ret(schema_lit(&["required"]))]),
                func("ResourceGroupName", vec![ret(schema_lit(&["required"]))]),
            ],
        );
        Ok(module(COMMONSCHEMA, dir.to_str().unwrap(), vec![file]))
    }
}

#[test]
fn test_concurrent_first_use_populates_once() {
    let root = tempfile::tempdir().unwrap();
    let config = SharedSchemaConfig::default();
    std::fs::create_dir_all(root.path().join(&config.relative_path)).unwrap();
    let service_dir = root.path().join("internal/services/foo");

    let loads = Arc::new(AtomicUsize::new(0));
    let cache = SharedSchemaCache::with_loader(
        config,
        Box::new(SlowLoader {
            loads: Arc::clone(&loads),
        }),
    );
    let analyzed = module(
        "example.com/provider/internal/services/foo",
        service_dir.to_str().unwrap(),
        vec![],
    );

    const THREADS: usize = 8;
    let barrier = Barrier::new(THREADS);
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    cache.get_or_load(&analyzed)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(cache.population_passes(), 1);
    assert_eq!(results[0].len(), 2);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    assert!(matches!(cache.state(), CacheState::Populated(_)));
}

#[test]
fn test_concurrent_misses_leave_cache_retryable() {
    // No helper directory on disk: every caller may attempt discovery
    let root = tempfile::tempdir().unwrap();
    let service_dir = root.path().join("internal/services/foo");
    let loads = Arc::new(AtomicUsize::new(0));
    let cache = SharedSchemaCache::with_loader(
        SharedSchemaConfig::default(),
        Box::new(SlowLoader {
            loads: Arc::clone(&loads),
        }),
    );
    let analyzed = module(
        "example.com/provider/internal/services/foo",
        service_dir.to_str().unwrap(),
        vec![],
    );

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| assert!(cache.get_or_load(&analyzed).is_empty()));
        }
    });

    assert_eq!(loads.load(Ordering::SeqCst), 0);
    assert!(cache.population_passes() >= 1);
    assert!(matches!(cache.state(), CacheState::FailedRetryable));
}
