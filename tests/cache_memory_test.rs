// ABOUTME: Integration tests for the in-memory TTL cache backend
// ABOUTME: Covers expiry, pattern invalidation, eviction, and the factory path
//
// SPDX-License-Identifier: MIT OR Apache-2.0

mod common;

use std::time::Duration;

use anyhow::Result;

use fitref::cache::memory::InMemoryCache;
use fitref::cache::{CacheConfig, CacheService};

#[tokio::test]
async fn set_then_get_round_trips() -> Result<()> {
    let cache = common::test_cache();

    cache
        .set("greeting", &"hello".to_owned(), Duration::from_secs(60))
        .await?;
    let value: Option<String> = cache.get("greeting").await?;

    assert_eq!(value.as_deref(), Some("hello"));
    Ok(())
}

#[tokio::test]
async fn get_missing_key_is_none() -> Result<()> {
    let cache = common::test_cache();

    let value: Option<String> = cache.get("nothing-here").await?;

    assert!(value.is_none());
    Ok(())
}

#[tokio::test]
async fn expired_entry_reads_as_miss() -> Result<()> {
    let cache = common::test_cache();

    cache
        .set("short-lived", &42_i32, Duration::from_millis(30))
        .await?;
    tokio::time::sleep(Duration::from_millis(80)).await;

    let value: Option<i32> = cache.get("short-lived").await?;
    assert!(value.is_none());
    assert!(!cache.exists("short-lived").await);
    Ok(())
}

#[tokio::test]
async fn remaining_ttl_counts_down() -> Result<()> {
    let cache = common::test_cache();

    cache
        .set("timed", &1_i32, Duration::from_secs(60))
        .await?;

    let remaining = cache
        .remaining_ttl("timed")
        .await
        .unwrap_or(Duration::ZERO);
    assert!(remaining <= Duration::from_secs(60));
    assert!(remaining > Duration::from_secs(50));
    assert!(cache.remaining_ttl("absent").await.is_none());
    Ok(())
}

#[tokio::test]
async fn remove_deletes_one_entry() -> Result<()> {
    let cache = common::test_cache();

    cache.set("keep", &1_i32, Duration::from_secs(60)).await?;
    cache.set("drop", &2_i32, Duration::from_secs(60)).await?;
    cache.remove("drop").await?;

    assert!(cache.exists("keep").await);
    assert!(!cache.exists("drop").await);
    Ok(())
}

#[tokio::test]
async fn remove_by_pattern_only_touches_matches() -> Result<()> {
    let cache = common::test_cache();

    cache
        .set("equip:a", &1_i32, Duration::from_secs(60))
        .await?;
    cache
        .set("equip:b", &2_i32, Duration::from_secs(60))
        .await?;
    cache
        .set("other:c", &3_i32, Duration::from_secs(60))
        .await?;

    let removed = cache.remove_by_pattern("equip:").await?;

    assert_eq!(removed, 2);
    assert!(!cache.exists("equip:a").await);
    assert!(!cache.exists("equip:b").await);
    assert!(cache.exists("other:c").await);
    Ok(())
}

#[tokio::test]
async fn remove_by_pattern_treats_trailing_star_as_prefix() -> Result<()> {
    let cache = common::test_cache();

    cache
        .set("equip:a", &1_i32, Duration::from_secs(60))
        .await?;
    cache
        .set("equip:b", &2_i32, Duration::from_secs(60))
        .await?;
    cache
        .set("other:c", &3_i32, Duration::from_secs(60))
        .await?;

    let removed = cache.remove_by_pattern("equip:*").await?;

    assert_eq!(removed, 2);
    assert!(!cache.exists("equip:a").await);
    assert!(cache.exists("other:c").await);
    Ok(())
}

#[tokio::test]
async fn remove_by_pattern_with_inner_glob_matches_fully() -> Result<()> {
    let cache = common::test_cache();

    cache
        .set("table:a:GetAll", &1_i32, Duration::from_secs(60))
        .await?;
    cache
        .set("table:b:GetAll", &2_i32, Duration::from_secs(60))
        .await?;
    cache
        .set("table:a:GetById", &3_i32, Duration::from_secs(60))
        .await?;

    let removed = cache.remove_by_pattern("table:*:GetAll").await?;

    assert_eq!(removed, 2);
    assert!(cache.exists("table:a:GetById").await);
    Ok(())
}

#[tokio::test]
async fn remove_by_pattern_rejects_bad_glob() {
    let cache = common::test_cache();

    let result = cache.remove_by_pattern("broken[").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn clear_all_empties_the_store() -> Result<()> {
    let cache = common::test_cache();

    cache.set("a", &1_i32, Duration::from_secs(60)).await?;
    cache.set("b", &2_i32, Duration::from_secs(60)).await?;
    cache.clear_all().await;

    assert!(!cache.exists("a").await);
    assert!(!cache.exists("b").await);
    Ok(())
}

#[tokio::test]
async fn lru_eviction_respects_capacity() -> Result<()> {
    common::init_test_logging();
    let cache = InMemoryCache::new(&CacheConfig {
        max_entries: 2,
        enable_background_cleanup: false,
        ..CacheConfig::default()
    });

    cache.set("first", &1_i32, Duration::from_secs(60)).await?;
    cache.set("second", &2_i32, Duration::from_secs(60)).await?;
    cache.set("third", &3_i32, Duration::from_secs(60)).await?;

    // oldest entry falls out once capacity is exceeded
    assert!(!cache.exists("first").await);
    assert!(cache.exists("second").await);
    assert!(cache.exists("third").await);
    Ok(())
}

#[tokio::test]
async fn get_or_create_runs_factory_only_on_miss() -> Result<()> {
    let cache = common::test_cache();

    let first = cache
        .get_or_create("computed", || async { 7_i32 }, Duration::from_secs(60))
        .await?;
    let second: i32 = cache
        .get_or_create(
            "computed",
            || async { unreachable!("factory must not run on a hit") },
            Duration::from_secs(60),
        )
        .await?;

    assert_eq!(first, 7);
    assert_eq!(second, 7);
    Ok(())
}
