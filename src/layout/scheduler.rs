//! Periodic layout advancement.
//!
//! # Responsibilities
//! - Tick on a fixed interval
//! - Ask the engine to advance when the current layout's time is up
//! - Stop cleanly on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::time;

use crate::layout::engine::PlaybackEngine;

pub struct LayoutScheduler {
    engine: Arc<PlaybackEngine>,
    tick: Duration,
}

impl LayoutScheduler {
    pub fn new(engine: Arc<PlaybackEngine>, tick: Duration) -> Self {
        Self { engine, tick }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(tick_ms = self.tick.as_millis() as u64, "Layout scheduler starting");

        let mut ticker = time::interval(self.tick);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.engine.advance_if_due(Instant::now()) {
                        metrics::counter!("control_layout_advances_total").increment(1);
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Layout scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutStateMachine;
    use crate::playlist::{JsonPlaylistLoader, PlaylistLoader};
    use serde_json::json;

    #[tokio::test]
    async fn test_scheduler_stops_on_shutdown() {
        let loader = JsonPlaylistLoader::with_default_playlist().unwrap();
        let playlist = loader.parse_playlist(&loader.initial_config()).unwrap();
        let engine = Arc::new(PlaybackEngine::new(playlist, 4));

        let (tx, rx) = broadcast::channel(1);
        let scheduler = LayoutScheduler::new(engine, Duration::from_millis(10));
        let handle = tokio::spawn(scheduler.run(rx));

        tx.send(()).unwrap();
        time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_scheduler_advances_due_layouts() {
        let loader = JsonPlaylistLoader::with_default_playlist().unwrap();
        let config = json!({
            "modules": [{"name": "a"}, {"name": "b"}],
            "playlist": [
                {"layout": {"name": "one", "duration": 1}, "modules": ["a"]},
                {"layout": {"name": "two", "duration": 600}, "modules": ["b"]}
            ]
        });
        let engine = Arc::new(PlaybackEngine::new(loader.parse_playlist(&config).unwrap(), 4));

        let (tx, rx) = broadcast::channel(1);
        let scheduler = LayoutScheduler::new(engine.clone(), Duration::from_millis(50));
        let handle = tokio::spawn(scheduler.run(rx));

        time::sleep(Duration::from_millis(1300)).await;
        assert_eq!(engine.layout().name, "two");

        tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
