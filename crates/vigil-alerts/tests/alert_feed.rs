//! Integration tests for the simulated alert feed

use chrono::Utc;
use std::time::Duration;
use vigil_alerts::{Alert, AlertFeed, AlertSimulator};
use vigil_telemetry::{rng_for, SimulationHandle};

fn spawn(probability: f64) -> SimulationHandle<AlertSimulator> {
    let feed = AlertFeed::with_alerts(10, Alert::fixtures(Utc::now()));
    let simulator = AlertSimulator::new(feed, probability).unwrap();
    SimulationHandle::spawn(simulator, Duration::from_secs(10), rng_for(Some(9), "alerts"))
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_feed_grows_to_cap_and_stays_there() {
    let handle = spawn(1.0);

    tokio::time::sleep(Duration::from_secs(101)).await;
    assert_eq!(handle.ticks(), 10);

    let snapshot = handle.latest();
    assert_eq!(snapshot.alerts.len(), 10);
    let ids: Vec<u64> = snapshot.alerts.iter().map(|a| a.id).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]), "newest first: {ids:?}");
}

#[tokio::test(start_paused = true)]
async fn test_operator_actions_race_with_timer() {
    let handle = spawn(1.0);
    tokio::time::sleep(Duration::from_secs(11)).await;

    let newest = handle.latest().alerts[0].id;
    assert!(handle.update(|sim| sim.acknowledge(newest)));
    assert!(handle.update(|sim| sim.dismiss(1)).is_some());
    assert!(handle.update(|sim| sim.dismiss(1)).is_none());

    let snapshot = handle.latest();
    assert!(snapshot.alerts.iter().all(|a| a.id != 1));
    assert!(snapshot.alerts.iter().find(|a| a.id == newest).unwrap().acknowledged);
    assert_eq!(snapshot.unacknowledged, 3);
}

#[tokio::test(start_paused = true)]
async fn test_quiet_feed_publishes_nothing_new() {
    let handle = spawn(0.0);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(handle.ticks(), 6);
    assert_eq!(handle.latest().alerts.len(), 5);
}
