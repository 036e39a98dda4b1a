//! Throughput and lag tracking for a run.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use nearfs_shared::types::Block;

/// Number of recent blocks the speed is averaged over.
pub const PROGRESS_WINDOW: usize = 100;

/// Point-in-time view of ingestion progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub block_height: u64,
    pub shards: usize,
    pub blocks_processed: u64,
    /// Blocks per second over the rolling window.
    pub speed: f64,
    /// How far the block trails the wall clock.
    pub lag: Duration,
    /// Estimated time to catch up with the chain tip, `None` while the speed
    /// is still zero.
    pub eta: Option<Duration>,
}

/// Rolling throughput and lag metrics.
///
/// Purely observational: nothing here can fail or block.
#[derive(Debug)]
pub struct Progress {
    window: VecDeque<(Instant, u64)>,
    blocks_processed: u64,
    report_interval: Duration,
    last_report: Instant,
    latest: Option<ProgressSnapshot>,
}

impl Progress {
    pub fn new(report_interval: Duration) -> Self {
        Self::starting_at(report_interval, Instant::now())
    }

    pub fn starting_at(report_interval: Duration, started: Instant) -> Self {
        let mut window = VecDeque::with_capacity(PROGRESS_WINDOW + 1);
        window.push_back((started, 0));
        Self {
            window,
            blocks_processed: 0,
            report_interval,
            last_report: started,
            latest: None,
        }
    }

    /// Records a block observed now.
    pub fn observe(&mut self, block: &Block) -> ProgressSnapshot {
        self.observe_at(block, Instant::now(), Utc::now())
    }

    pub fn observe_at(
        &mut self,
        block: &Block,
        now: Instant,
        wall_clock: DateTime<Utc>,
    ) -> ProgressSnapshot {
        self.blocks_processed += 1;
        self.window.push_back((now, self.blocks_processed));
        while self.window.len() > PROGRESS_WINDOW + 1 {
            self.window.pop_front();
        }

        let speed = self.speed();
        let lag = lag(block.timestamp(), wall_clock);
        let eta = if speed > 0.0 {
            Duration::try_from_secs_f64(lag.as_secs_f64() / speed).ok()
        } else {
            None
        };

        let snapshot = ProgressSnapshot {
            block_height: block.height(),
            shards: block.shards.len(),
            blocks_processed: self.blocks_processed,
            speed,
            lag,
            eta,
        };
        self.latest = Some(snapshot.clone());
        snapshot
    }

    /// Returns true at most once per report interval.
    pub fn should_report(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_report) >= self.report_interval {
            self.last_report = now;
            true
        } else {
            false
        }
    }

    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed
    }

    pub fn latest(&self) -> Option<&ProgressSnapshot> {
        self.latest.as_ref()
    }

    fn speed(&self) -> f64 {
        let (Some((first_at, first_count)), Some((last_at, last_count))) =
            (self.window.front(), self.window.back())
        else {
            return 0.0;
        };

        let elapsed = last_at.saturating_duration_since(*first_at).as_secs_f64();
        if elapsed > 0.0 {
            (last_count - first_count) as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Wall clock minus the block timestamp (nanoseconds), zero for blocks
/// stamped in the future.
fn lag(block_timestamp_ns: u64, wall_clock: DateTime<Utc>) -> Duration {
    let now_ms = u64::try_from(wall_clock.timestamp_millis()).unwrap_or(0);
    Duration::from_millis(now_ms.saturating_sub(block_timestamp_ns / 1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nearfs_shared::types::BlockHeader;

    fn block(height: u64, timestamp_ms: u64) -> Block {
        Block::new(
            BlockHeader {
                height,
                timestamp: timestamp_ms * 1_000_000,
                hash: String::new(),
                prev_hash: String::new(),
            },
            Vec::new(),
        )
    }

    fn wall_clock(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_speed_lag_and_eta() {
        let started = Instant::now();
        let mut progress = Progress::starting_at(Duration::from_secs(10), started);

        progress.observe_at(&block(1, 0), started + Duration::from_secs(1), wall_clock(100_000));
        let snapshot = progress.observe_at(
            &block(2, 1_000),
            started + Duration::from_secs(2),
            wall_clock(101_000),
        );

        assert_eq!(snapshot.block_height, 2);
        assert_eq!(snapshot.blocks_processed, 2);
        assert!((snapshot.speed - 1.0).abs() < 1e-9);
        assert_eq!(snapshot.lag, Duration::from_secs(100));
        assert_eq!(snapshot.eta, Some(Duration::from_secs(100)));
        assert_eq!(progress.latest(), Some(&snapshot));
    }

    #[test]
    fn test_zero_speed_has_no_eta() {
        let started = Instant::now();
        let mut progress = Progress::starting_at(Duration::from_secs(10), started);

        let snapshot = progress.observe_at(&block(1, 0), started, wall_clock(5_000));

        assert_eq!(snapshot.speed, 0.0);
        assert_eq!(snapshot.eta, None);
    }

    #[test]
    fn test_future_block_has_zero_lag() {
        let started = Instant::now();
        let mut progress = Progress::starting_at(Duration::from_secs(10), started);

        let snapshot = progress.observe_at(
            &block(1, 10_000),
            started + Duration::from_secs(1),
            wall_clock(5_000),
        );

        assert_eq!(snapshot.lag, Duration::ZERO);
        assert_eq!(snapshot.eta, Some(Duration::ZERO));
    }

    #[test]
    fn test_window_is_bounded() {
        let started = Instant::now();
        let mut progress = Progress::starting_at(Duration::from_secs(10), started);

        // Slow start, then 10 blocks per second.
        progress.observe_at(&block(0, 0), started + Duration::from_secs(100), wall_clock(0));
        for i in 1..=200u64 {
            progress.observe_at(
                &block(i, 0),
                started + Duration::from_secs(100) + Duration::from_millis(i * 100),
                wall_clock(0),
            );
        }

        assert_eq!(progress.blocks_processed(), 201);
        assert_eq!(progress.window.len(), PROGRESS_WINDOW + 1);
        assert!((progress.speed() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_should_report_once_per_interval() {
        let started = Instant::now();
        let mut progress = Progress::starting_at(Duration::from_secs(10), started);

        assert!(!progress.should_report(started + Duration::from_secs(5)));
        assert!(progress.should_report(started + Duration::from_secs(10)));
        assert!(!progress.should_report(started + Duration::from_secs(15)));
        assert!(progress.should_report(started + Duration::from_secs(21)));
    }
}
