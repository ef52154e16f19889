//! Mock sensor and telemetry link for host testing.
//!
//! `MockDmp` stands in for the motion-processor FIFO path and `MockLink`
//! for the serial uplink, so the full fusion loop runs on the host with
//! scripted data.

use heapless::Deque;
use quatfuse_core::fusion::traits::{SampleError, SampleSource, TelemetryFrame, TelemetrySink};
use quatfuse_core::fusion::RawSampleBatch;

/// Milliseconds between scripted batches, matching a 200 Hz FIFO rate.
const MOCK_BATCH_PERIOD_MS: u32 = 5;

/// Scripted motion processor.
///
/// Reads pop queued batches front to back; when the queue is empty a
/// default (level, stationary) batch is synthesized with an advancing
/// timestamp. Failure flags turn entire read paths into errors.
pub struct MockDmp {
    queue: Deque<RawSampleBatch, 64>,
    compass: [i16; 3],
    fail_batches: bool,
    fail_compass: bool,
    timestamp_ms: u32,
}

impl Default for MockDmp {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDmp {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
            compass: [0; 3],
            fail_batches: false,
            fail_compass: false,
            timestamp_ms: 0,
        }
    }

    /// Queue a batch to be returned by a future `read_batch` call.
    pub fn push_batch(&mut self, batch: RawSampleBatch) {
        // Silently drop if full (64 batches is plenty for tests)
        let _ = self.queue.push_back(batch);
    }

    /// Set the compass triplet returned by `read_compass`.
    pub fn set_compass(&mut self, mag: [i16; 3]) {
        self.compass = mag;
    }

    /// Make every `read_batch` fail with a bus error.
    pub fn set_fail_batches(&mut self, fail: bool) {
        self.fail_batches = fail;
    }

    /// Make every `read_compass` fail with a bus error.
    pub fn set_fail_compass(&mut self, fail: bool) {
        self.fail_compass = fail;
    }
}

impl SampleSource for MockDmp {
    async fn read_batch(&mut self) -> Result<RawSampleBatch, SampleError> {
        if self.fail_batches {
            return Err(SampleError::Bus);
        }
        let mut batch = self.queue.pop_front().unwrap_or_default();
        batch.timestamp_ms = self.timestamp_ms;
        self.timestamp_ms = self.timestamp_ms.wrapping_add(MOCK_BATCH_PERIOD_MS);
        Ok(batch)
    }

    async fn read_compass(&mut self) -> Result<[i16; 3], SampleError> {
        if self.fail_compass {
            return Err(SampleError::Bus);
        }
        Ok(self.compass)
    }
}

/// Telemetry sink that collects every uploaded frame.
pub struct MockLink {
    frames: heapless::Vec<TelemetryFrame, 128>,
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            frames: heapless::Vec::new(),
        }
    }

    /// Every frame uploaded so far, oldest first.
    pub fn frames(&self) -> &[TelemetryFrame] {
        &self.frames
    }
}

impl TelemetrySink for MockLink {
    async fn upload(&mut self, frame: &TelemetryFrame) {
        let _ = self.frames.push(*frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quatfuse_core::fusion::{
        CycleOutcome, FusionConfig, FusionController, FusionState, NineAxisComplementary,
    };
    use quatfuse_core::traits::MockTime;

    fn block_on<Fut: core::future::Future>(fut: Fut) -> Fut::Output {
        // Simple polling executor for tests
        use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            const VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut fut = core::pin::pin!(fut);

        loop {
            match fut.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => continue,
            }
        }
    }

    #[test]
    fn mock_dmp_synthesizes_level_batches_with_advancing_timestamps() {
        let mut dmp = MockDmp::new();

        let first = block_on(dmp.read_batch()).unwrap();
        let second = block_on(dmp.read_batch()).unwrap();

        assert_eq!(first.timestamp_ms, 0);
        assert_eq!(second.timestamp_ms, 5);
        assert_eq!(first.quat_q30, [1 << 30, 0, 0, 0]);
    }

    #[test]
    fn mock_dmp_failure_flags_fail_each_path_independently() {
        let mut dmp = MockDmp::new();
        dmp.set_fail_batches(true);
        assert_eq!(block_on(dmp.read_batch()), Err(SampleError::Bus));
        assert!(block_on(dmp.read_compass()).is_ok());

        dmp.set_fail_batches(false);
        dmp.set_fail_compass(true);
        assert!(block_on(dmp.read_batch()).is_ok());
        assert_eq!(block_on(dmp.read_compass()), Err(SampleError::Bus));
    }

    /// Full-loop wiring: real complementary backend, mock device, mock
    /// link, mock clock, driven for a simulated second at 200 Hz.
    #[test]
    fn fusion_loop_runs_end_to_end_against_mock_devices() {
        let mut dmp = MockDmp::new();
        dmp.set_compass([150, 0, -300]);

        let time = MockTime::new();
        let mut ctrl = FusionController::new(
            NineAxisComplementary::default(),
            dmp,
            MockLink::new(),
            time.clone(),
            FusionConfig::default(),
        );

        assert_eq!(block_on(ctrl.run_cycle()), CycleOutcome::Initialized);
        assert_eq!(ctrl.state(), FusionState::Steady);

        let mut transmitted = 0;
        for _ in 0..200 {
            time.advance(5);
            match block_on(ctrl.run_cycle()) {
                CycleOutcome::Updated { transmitted: true } => transmitted += 1,
                CycleOutcome::Updated { transmitted: false } => {}
                outcome => panic!("unexpected outcome {:?}", outcome),
            }
        }

        // 9 ms interval against a 5 ms cycle: frames go out every other
        // cycle, 100 over a simulated second
        assert_eq!(transmitted, 100);
        assert_eq!(ctrl.link().frames().len(), 100);

        // Stationary level data keeps the estimate level
        let att = ctrl.attitude();
        assert!(att.roll.abs() < 0.05);
        assert!(att.pitch.abs() < 0.05);

        // Frames carry the scripted compass ticks
        assert_eq!(ctrl.link().frames()[0].mag, [150, 0, -300]);
    }

    #[test]
    fn sensor_dropout_skips_cycles_without_losing_state() {
        let dmp = MockDmp::new();
        let time = MockTime::new();
        let mut ctrl = FusionController::new(
            NineAxisComplementary::default(),
            dmp,
            MockLink::new(),
            time.clone(),
            FusionConfig::default(),
        );

        block_on(ctrl.run_cycle());
        let timing = ctrl.timing();

        // Bus drops out for three cycles
        ctrl.source_mut().set_fail_batches(true);
        for _ in 0..3 {
            time.advance(5);
            assert_eq!(block_on(ctrl.run_cycle()), CycleOutcome::Skipped);
        }
        assert_eq!(ctrl.state(), FusionState::Steady);
        assert_eq!(ctrl.timing(), timing);

        // Recovery on the next interrupt
        ctrl.source_mut().set_fail_batches(false);
        time.advance(5);
        assert!(matches!(
            block_on(ctrl.run_cycle()),
            CycleOutcome::Updated { .. }
        ));
    }
}
