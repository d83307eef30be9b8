use crate::{
    container::DataContainer,
    error::DataError,
    event::Tick,
    producer::{MarketDataProducer, TickProducer, validate_window},
};
use std::sync::Arc;
use tracing::debug;

/// Replay cache over a [`TickProducer`].
///
/// The first `setup` drains the inner producer across the container's entire timestamp range
/// into one materialized tick sequence, then releases the inner producer's merged runs. Every
/// window - the first included - is served from that sequence via binary-searched index
/// bounds, so repeated replays over the same container (eg/ parameter sweeps) pay the
/// merge/materialization cost exactly once.
#[derive(Debug)]
pub struct CachedTickProducer {
    inner: TickProducer,
    data_cache: Vec<Tick>,
    ts_cache: Vec<i64>,
    cached: bool,
    cursor: usize,
    init_start: usize,
    init_stop: usize,
    has_data: bool,
}

impl CachedTickProducer {
    pub fn new(container: Arc<DataContainer>) -> Self {
        Self {
            inner: TickProducer::new(container),
            data_cache: Vec::new(),
            ts_cache: Vec::new(),
            cached: false,
            cursor: 0,
            init_start: 0,
            init_stop: 0,
            has_data: false,
        }
    }

    /// Number of ticks materialized by the first `setup`.
    pub fn cached_len(&self) -> usize {
        self.data_cache.len()
    }

    fn build_cache(&mut self, min_ts_ns: i64, max_ts_ns: i64) -> Result<(), DataError> {
        self.inner.setup(min_ts_ns, max_ts_ns)?;
        while let Some(tick) = self.inner.next() {
            self.ts_cache.push(tick.ts_ns());
            self.data_cache.push(tick);
        }
        self.inner.clear();
        self.cached = true;

        debug!(ticks = self.data_cache.len(), "materialized full container traversal");
        Ok(())
    }
}

impl MarketDataProducer for CachedTickProducer {
    fn setup(&mut self, start_ns: i64, stop_ns: i64) -> Result<(), DataError> {
        let (min_ts_ns, max_ts_ns) = validate_window(self.inner.container(), start_ns, stop_ns)?;

        if !self.cached {
            self.build_cache(min_ts_ns, max_ts_ns)?;
        }

        self.init_start = self.ts_cache.partition_point(|&ts| ts < start_ns);
        self.init_stop = self.ts_cache.partition_point(|&ts| ts <= stop_ns);
        self.cursor = self.init_start;
        self.has_data = self.init_start < self.init_stop;

        Ok(())
    }

    fn reset(&mut self) {
        self.cursor = self.init_start;
        self.has_data = self.init_start < self.init_stop;
    }

    fn next(&mut self) -> Option<Tick> {
        if self.cursor >= self.init_stop {
            self.has_data = false;
            return None;
        }

        let tick = self.data_cache[self.cursor].clone();
        self.cursor += 1;
        self.has_data = self.cursor < self.init_stop;
        Some(tick)
    }

    fn has_data(&self) -> bool {
        self.has_data
    }
}
