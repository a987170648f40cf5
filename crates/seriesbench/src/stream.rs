//! Deterministic synthesis of the (series × time) grid.
//!
//! [`PointStream`] walks the grid one second at a time. For each step it
//! yields one point per series, in identifier order, all sharing the step's
//! timestamp. Interleaving the series this way spreads consecutive writes
//! over different partitions of the store.

use crate::{DataPoint, IdentitySet, SeriesId, channel::Sender};
use chrono::{DateTime, TimeDelta, Utc};
use core::iter::FusedIterator;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Arc;

/// Lazy, single-pass iterator over every point of a run.
///
/// Values are drawn from a [`StdRng`] seeded with a fixed seed, so two
/// streams built with the same seed and identifiers yield the same values in
/// the same order.
pub struct PointStream {
    ids: Arc<[SeriesId]>,
    rng: StdRng,
    timestamp: DateTime<Utc>,
    steps: usize,
    step: usize,
    cursor: usize,
}

impl PointStream {
    /// Builds the stream for `ids` over `steps` one-second steps.
    ///
    /// The first emitted timestamp is `anchor + 1s`.
    pub fn new(ids: &IdentitySet, steps: usize, anchor: DateTime<Utc>, seed: u64) -> Self {
        Self {
            ids: ids.shared(),
            rng: StdRng::seed_from_u64(seed),
            timestamp: anchor,
            steps,
            step: 0,
            cursor: 0,
        }
    }

    fn remaining(&self) -> usize {
        let len = self.ids.len();
        if len == 0 {
            return 0;
        }
        let in_step = if self.cursor == 0 { 0 } else { len - self.cursor };
        (self.steps - self.step)
            .saturating_mul(len)
            .saturating_add(in_step)
    }
}

impl Iterator for PointStream {
    type Item = DataPoint;

    fn next(&mut self) -> Option<DataPoint> {
        if self.ids.is_empty() {
            return None;
        }
        if self.cursor == 0 {
            if self.step == self.steps {
                return None;
            }
            self.step += 1;
            self.timestamp += TimeDelta::seconds(1);
        }

        let series_id = self.ids[self.cursor];
        self.cursor = (self.cursor + 1) % self.ids.len();

        Some(DataPoint {
            series_id,
            timestamp: self.timestamp,
            value: self.rng.random(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl FusedIterator for PointStream {}

/// Drives `stream` into the queue, then closes it.
///
/// Returns the number of points enqueued. Sending only fails once every
/// writer is gone, in which case the rest of the stream is abandoned.
#[tracing::instrument(skip_all)]
pub async fn produce(stream: PointStream, tx: Sender<DataPoint>) -> u64 {
    let mut sent = 0_u64;

    for point in stream {
        if tx.send(point).await.is_err() {
            tracing::error!("All writers are gone, stopping after {sent} points");
            break;
        }
        sent += 1;
    }

    tx.close();
    tracing::debug!("Producer finished after {sent} points");
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::bounded;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn emits_series_times_steps_points() {
        for series in [0, 1, 3, 17] {
            for steps in [0, 1, 2, 50] {
                let ids = IdentitySet::generate(series);
                let stream = PointStream::new(&ids, steps, anchor(), 123);
                assert_eq!(stream.size_hint(), (series * steps, Some(series * steps)));
                assert_eq!(stream.count(), series * steps, "{series} x {steps}");
            }
        }
    }

    #[test]
    fn size_hint_tracks_progress() {
        let ids = IdentitySet::generate(3);
        let mut stream = PointStream::new(&ids, 2, anchor(), 1);
        for remaining in (0..6).rev() {
            assert!(stream.next().is_some());
            assert_eq!(stream.size_hint().0, remaining);
        }
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn same_seed_same_values() {
        let ids = IdentitySet::generate(5);
        let a: Vec<_> = PointStream::new(&ids, 20, anchor(), 123)
            .map(|p| p.value)
            .collect();
        let b: Vec<_> = PointStream::new(&ids, 20, anchor(), 123)
            .map(|p| p.value)
            .collect();
        assert_eq!(a, b);

        let c: Vec<_> = PointStream::new(&ids, 20, anchor(), 124)
            .map(|p| p.value)
            .collect();
        assert_ne!(a, c);
    }

    #[test]
    fn values_are_in_unit_interval() {
        let ids = IdentitySet::generate(4);
        assert!(
            PointStream::new(&ids, 250, anchor(), 9).all(|p| (0.0..1.0).contains(&p.value))
        );
    }

    #[test]
    fn steps_share_timestamps_in_identifier_order() {
        let ids = IdentitySet::generate(3);
        let points: Vec<_> = PointStream::new(&ids, 2, anchor(), 123).collect();
        assert_eq!(points.len(), 6);

        for (step, chunk) in points.chunks(3).enumerate() {
            let expected = anchor() + TimeDelta::seconds(step as i64 + 1);
            for (point, id) in chunk.iter().zip(ids.iter()) {
                assert_eq!(point.series_id, *id);
                assert_eq!(point.timestamp, expected);
            }
        }
    }

    #[test]
    fn timestamps_strictly_increase_per_series() {
        let ids = IdentitySet::generate(4);
        let mut last: HashMap<SeriesId, DateTime<Utc>> = HashMap::new();
        for point in PointStream::new(&ids, 100, anchor(), 5) {
            if let Some(prev) = last.insert(point.series_id, point.timestamp) {
                assert_eq!(point.timestamp - prev, TimeDelta::seconds(1));
            }
        }
        assert_eq!(last.len(), 4);
    }

    #[tokio::test]
    async fn produce_sends_everything_then_closes() {
        let ids = IdentitySet::generate(2);
        let (tx, rx) = bounded(4);
        let producer = tokio::spawn(produce(PointStream::new(&ids, 10, anchor(), 1), tx));

        let mut received = 0;
        while let Some(_point) = rx.recv().await {
            received += 1;
        }
        assert_eq!(received, 20);
        assert_eq!(producer.await.unwrap(), 20);
    }

    #[tokio::test]
    async fn produce_stops_when_receivers_are_gone() {
        let ids = IdentitySet::generate(2);
        let (tx, rx) = bounded(1);
        drop(rx);
        let sent = produce(PointStream::new(&ids, 10, anchor(), 1), tx).await;
        assert_eq!(sent, 0);
    }
}
