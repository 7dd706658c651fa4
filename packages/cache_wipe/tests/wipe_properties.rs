//! Properties of the cache wiper that hold for every configured cache level.

#![allow(missing_docs, reason = "No need for API documentation in test code")]

use cache_wipe::{BufferPolicy, CacheLevel, CacheSizes, CacheWiper, WipeConfig};

#[test]
#[cfg(not(miri))] // The L3-sized buffer takes forever under Miri.
fn every_level_walks_its_documented_size() {
    let mut wiper = CacheWiper::new(WipeConfig::default());

    for level in CacheLevel::EVICTING {
        let expected_bytes = CacheSizes::OBSERVED.bytes(level);

        let wiped = wiper.wipe(level);

        assert_eq!(wiped.stats().buffer_bytes(), expected_bytes, "{level}");
        assert_eq!(wiped.stats().touched_cells(), expected_bytes / 32, "{level}");
        assert!(wiped.stats().allocated(), "{level}");

        wiped.teardown();
    }
}

#[test]
fn l1_touches_1024_cells() {
    let mut wiper = CacheWiper::new(WipeConfig::default());

    let wiped = wiper.wipe(CacheLevel::L1);

    assert_eq!(wiped.stats().buffer_bytes(), 32_768);
    assert_eq!(wiped.stats().touched_cells(), 1024);

    wiped.teardown();
}

#[test]
fn none_never_allocates() {
    for policy in [BufferPolicy::PerTrial, BufferPolicy::Reused] {
        let mut wiper = CacheWiper::new(WipeConfig::builder().policy(policy).build());

        for _ in 0..10 {
            let wiped = wiper.wipe(CacheLevel::None);

            assert_eq!(wiped.stats().buffer_bytes(), 0);
            assert_eq!(wiped.stats().touched_cells(), 0);
            assert!(!wiped.stats().allocated());

            wiped.teardown();
        }

        assert!(!wiper.has_resident_buffer());
    }
}

#[test]
#[cfg(not(miri))] // Miri cannot query the processor.
fn detected_sizes_can_be_wiped() {
    let config = WipeConfig::builder().sizes(CacheSizes::detect()).build();
    let mut wiper = CacheWiper::new(config);

    let wiped = wiper.wipe(CacheLevel::L1);

    assert_eq!(
        wiped.stats().buffer_bytes(),
        config.sizes().bytes(CacheLevel::L1)
    );
    assert!(wiped.stats().touched_cells() > 0);

    wiped.teardown();
}
