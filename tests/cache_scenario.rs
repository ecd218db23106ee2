use counted_cache::backend::{InMemoryBackend, StoreBackend};
use counted_cache::{Cache, Error};
use proptest::prelude::*;
use uuid::Uuid;

type MemCache = Cache<InMemoryBackend>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

#[tokio::test]
async fn test_store_and_read_back_scenario() {
    init_logging();

    let cache = Cache::new(InMemoryBackend::new())
        .await
        .expect("Failed to create cache");

    let k1 = cache.store("hello").await.expect("Failed to store");
    assert!(Uuid::parse_str(&k1).is_ok(), "{} is not a UUID", k1);
    assert_eq!(
        cache.get_str(&k1).await.expect("get failed"),
        Some("hello".to_string())
    );
    assert_eq!(cache.call_count(MemCache::STORE).await.expect("count failed"), 1);

    let k2 = cache.store(42).await.expect("Failed to store");
    assert_eq!(cache.get_int(&k2).await.expect("get failed"), Some(42));
    assert_eq!(cache.call_count(MemCache::STORE).await.expect("count failed"), 2);

    assert_eq!(
        cache.get_str("nonexistent-key").await.expect("get failed"),
        None
    );
}

#[tokio::test]
async fn test_new_cache_clears_previous_entries() {
    init_logging();

    let backend = InMemoryBackend::new();
    let first = Cache::new(backend.clone())
        .await
        .expect("Failed to create cache");
    let keys = vec![
        first.store("a").await.expect("Failed to store"),
        first.store(1).await.expect("Failed to store"),
        first.store(1.5).await.expect("Failed to store"),
    ];

    let second = Cache::new(backend).await.expect("Failed to create cache");

    for key in &keys {
        assert!(second.get(key).await.expect("get failed").is_none());
        assert!(first.get(key).await.expect("get failed").is_none());
    }
    assert_eq!(second.call_count(MemCache::STORE).await.expect("count failed"), 0);
}

#[tokio::test]
async fn test_get_int_on_text_is_a_conversion_error() {
    let cache = Cache::new(InMemoryBackend::new())
        .await
        .expect("Failed to create cache");
    let key = cache.store("forty-two").await.expect("Failed to store");

    let err = cache.get_int(&key).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInteger(_)));
}

#[tokio::test]
async fn test_concurrent_stores_are_all_counted() {
    init_logging();

    let cache = Cache::new(InMemoryBackend::new())
        .await
        .expect("Failed to create cache");

    let keys = futures::future::try_join_all((0..64).map(|i| cache.store(i)))
        .await
        .expect("Failed to store");

    let mut unique = keys.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 64);

    assert_eq!(cache.call_count(MemCache::STORE).await.expect("count failed"), 64);
    // 64 values plus the counter key.
    assert_eq!(cache.backend().len().await, 65);

    for (i, key) in keys.iter().enumerate() {
        assert_eq!(
            cache.get_int(key).await.expect("get failed"),
            Some(i as i64)
        );
    }
}

#[tokio::test]
async fn test_counter_lives_in_the_backend() {
    let backend = InMemoryBackend::new();
    let cache = Cache::new(backend.clone())
        .await
        .expect("Failed to create cache");

    cache.store("x").await.expect("Failed to store");

    assert_eq!(MemCache::counter_name(MemCache::STORE), "Cache.store");
    assert_eq!(
        backend.get("Cache.store").await.expect("get failed"),
        Some(b"1".to_vec())
    );
}

proptest! {
    #[test]
    fn prop_text_roundtrip(text in ".*") {
        let rt = runtime();
        let loaded = rt.block_on(async {
            let cache = Cache::new(InMemoryBackend::new()).await?;
            let key = cache.store(text.as_str()).await?;
            cache.get_str(&key).await
        }).expect("roundtrip failed");

        prop_assert_eq!(loaded, Some(text));
    }

    #[test]
    fn prop_bytes_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let rt = runtime();
        let loaded = rt.block_on(async {
            let cache = Cache::new(InMemoryBackend::new()).await?;
            let key = cache.store(bytes.as_slice()).await?;
            cache.get(&key).await
        }).expect("roundtrip failed");

        prop_assert_eq!(loaded, Some(bytes));
    }

    #[test]
    fn prop_integer_roundtrip(n in any::<i64>()) {
        let rt = runtime();
        let loaded = rt.block_on(async {
            let cache = Cache::new(InMemoryBackend::new()).await?;
            let key = cache.store(n).await?;
            cache.get_int(&key).await
        }).expect("roundtrip failed");

        prop_assert_eq!(loaded, Some(n));
    }

    #[test]
    fn prop_float_roundtrip(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        let rt = runtime();
        let loaded = rt.block_on(async {
            let cache = Cache::new(InMemoryBackend::new()).await?;
            let key = cache.store(x).await?;
            cache.get_float(&key).await
        }).expect("roundtrip failed");

        prop_assert_eq!(loaded, Some(x));
    }

    #[test]
    fn prop_store_count_matches_calls(n in 0usize..40) {
        let rt = runtime();
        let count = rt.block_on(async {
            let cache = Cache::new(InMemoryBackend::new()).await?;
            for i in 0..n {
                cache.store(i as u32).await?;
            }
            cache.call_count(MemCache::STORE).await
        }).expect("counting failed");

        prop_assert_eq!(count, n as i64);
    }

    #[test]
    fn prop_unknown_keys_are_absent(key in "[a-z0-9-]{1,40}") {
        let rt = runtime();
        let loaded = rt.block_on(async {
            let cache = Cache::new(InMemoryBackend::new()).await?;
            cache.store("something").await?;
            cache.get(&key).await
        }).expect("get failed");

        prop_assert!(loaded.is_none());
    }
}
