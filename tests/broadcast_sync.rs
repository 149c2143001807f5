//! End-to-end timing of a running station
//!
//! All tests run on a paused clock, so sleeps complete instantly and
//! offsets are exact.

use std::sync::Arc;
use std::time::Duration;

use ambient_tv::{OverflowPolicy, RegistryConfig, Station, StationConfig};
use tokio::time::Instant;

fn station_with(config: StationConfig, items: &[(&str, u64)]) -> Arc<Station> {
    let station = Arc::new(Station::new(config));
    for (url, secs) in items {
        station.append(*url, Duration::from_secs(*secs)).unwrap();
    }
    station
}

#[tokio::test(start_paused = true)]
async fn two_item_playlist_wraps_on_schedule() {
    let station = station_with(StationConfig::default(), &[("A", 10), ("B", 5)]);
    let mut viewer = station.subscribe();
    let t0 = Instant::now();
    let advancer = station.spawn_advancer();

    let a = viewer.recv().await.unwrap();
    assert_eq!((a.video_url.as_str(), t0.elapsed().as_secs()), ("A", 0));
    assert_eq!(a.elapsed(), Duration::ZERO);

    let b = viewer.recv().await.unwrap();
    assert_eq!((b.video_url.as_str(), t0.elapsed().as_secs()), ("B", 10));
    assert_eq!(b.elapsed(), Duration::ZERO);

    let wrapped = viewer.recv().await.unwrap();
    assert_eq!((wrapped.video_url.as_str(), t0.elapsed().as_secs()), ("A", 15));
    assert_eq!(wrapped.index, 0);

    advancer.abort();
}

#[tokio::test(start_paused = true)]
async fn viewer_waiting_on_empty_playlist_gets_first_item() {
    let config = StationConfig::default().idle_poll_interval(Duration::from_secs(1));
    let station = station_with(config, &[]);
    let advancer = station.spawn_advancer();

    let mut viewer = station.subscribe();
    assert!(viewer.try_recv().is_none());

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    let appended_at = Instant::now();
    station.append("/uploads/new.mp4", Duration::from_secs(30)).unwrap();

    let snapshot = tokio::time::timeout(Duration::from_secs(2), viewer.recv())
        .await
        .expect("no snapshot within the idle poll interval")
        .unwrap();

    assert_eq!(snapshot.video_url, "/uploads/new.mp4");
    assert!(appended_at.elapsed() <= Duration::from_secs(1));

    advancer.abort();
}

#[tokio::test(start_paused = true)]
async fn late_joiners_share_the_same_offset() {
    let station = station_with(StationConfig::default(), &[("A", 10), ("B", 5)]);
    let advancer = station.spawn_advancer();
    tokio::task::yield_now().await;

    // Join 3.25s into A and 2s into B
    tokio::time::sleep(Duration::from_millis(3_250)).await;
    let mut early = station.subscribe();
    let early_snapshot = early.try_recv().unwrap();
    assert_eq!(early_snapshot.video_url, "A");
    assert_eq!(early_snapshot.elapsed(), Duration::from_millis(3_250));

    tokio::time::sleep(Duration::from_millis(8_750)).await;
    let mut late = station.subscribe();
    let late_snapshot = late.try_recv().unwrap();
    assert_eq!(late_snapshot.video_url, "B");

    let elapsed = late_snapshot.elapsed();
    assert!(elapsed < late_snapshot.segment_duration());
    assert_eq!(elapsed, Duration::from_secs(2));

    // The early viewer got B through the broadcast, same segment start
    let early_b = early.try_recv().unwrap();
    assert_eq!(early_b.started_at, late_snapshot.started_at);
    assert_eq!(early_b.start_time, late_snapshot.start_time);

    advancer.abort();
}

#[tokio::test(start_paused = true)]
async fn reconnect_resyncs_with_a_new_subscriber() {
    let station = station_with(StationConfig::default(), &[("A", 20)]);
    let advancer = station.spawn_advancer();
    tokio::task::yield_now().await;

    let mut first = station.subscribe();
    let first_id = first.id();
    let before = first.try_recv().unwrap();
    drop(first);
    assert_eq!(station.registry().subscriber_count(), 0);

    tokio::time::sleep(Duration::from_secs(7)).await;

    let mut second = station.subscribe();
    assert_ne!(second.id(), first_id);
    let after = second.try_recv().unwrap();
    assert_eq!(after.started_at, before.started_at);
    assert_eq!(after.elapsed(), Duration::from_secs(7));

    advancer.abort();
}

#[tokio::test(start_paused = true)]
async fn stalled_viewer_does_not_delay_the_schedule() {
    let config = StationConfig::default().registry(
        RegistryConfig::default()
            .subscriber_buffer(1)
            .overflow(OverflowPolicy::Disconnect),
    );
    let station = station_with(config, &[("A", 2), ("B", 3)]);
    let t0 = Instant::now();
    let advancer = station.spawn_advancer();
    tokio::task::yield_now().await;

    // Never reads; its one slot holds the resync snapshot
    let stalled = station.subscribe();
    let mut active = station.subscribe();
    active.try_recv().unwrap();

    let next = active.recv().await.unwrap();
    assert_eq!(next.video_url, "B");
    assert_eq!(t0.elapsed().as_secs(), 2);

    assert!(!stalled.is_registered());
    assert_eq!(station.registry().subscriber_count(), 1);

    let wrapped = active.recv().await.unwrap();
    assert_eq!(wrapped.video_url, "A");
    assert_eq!(t0.elapsed().as_secs(), 5);

    advancer.abort();
}

#[tokio::test(start_paused = true)]
async fn likes_show_up_in_the_next_broadcast() {
    let station = station_with(StationConfig::default(), &[("A", 4), ("B", 4)]);
    let mut viewer = station.subscribe();
    let advancer = station.spawn_advancer();

    let a = viewer.recv().await.unwrap();
    assert_eq!(a.likes, 0);

    let mut likers = Vec::new();
    for _ in 0..10 {
        let station = Arc::clone(&station);
        likers.push(tokio::spawn(async move { station.like(0).unwrap() }));
    }
    for liker in likers {
        liker.await.unwrap();
    }

    viewer.recv().await.unwrap();
    let a_again = viewer.recv().await.unwrap();
    assert_eq!(a_again.video_url, "A");
    assert_eq!(a_again.likes, 10);

    advancer.abort();
}
