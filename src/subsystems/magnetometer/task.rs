//! Magnetometer sampling task
//!
//! Owns the HMC5883L driver for the lifetime of the node. The task first
//! brings the device up (both self-tests, normal mode, one discarded
//! sample), retrying forever with a fixed backoff, then samples on an
//! absolute-deadline schedule until the stop signal is raised.
//!
//! ```text
//!   startup delay ─► Initializing ──ok──► Sampling ──stop──► return
//!                     │        ▲
//!                     └─fail───┘ (health ERROR, backoff)
//! ```

use super::cache::SampleCache;
use super::node::{ComponentId, HealthReporter, StopSignal, Transport};
use super::publisher::FieldPublisher;
use crate::devices::magnetometer::hmc5883l::{
    Hmc5883lConfig, Hmc5883lDriver, MagError, RegisterConfig, SelfTestError,
};
use embedded_hal_async::i2c::I2c;
use mag_node_core::magnetometer::{to_ned, HealthEstimator, HealthStatus, Polarity};
use mag_node_core::parameters::MagParams;
use mag_node_core::traits::Clock;

/// Task timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagTaskConfig {
    /// Delay before the first bring-up attempt (default: 500ms)
    pub startup_delay_us: u64,
    /// Delay between failed bring-up attempts (default: 500ms)
    pub retry_backoff_us: u64,
}

impl Default for MagTaskConfig {
    fn default() -> Self {
        Self {
            startup_delay_us: 500_000,
            retry_backoff_us: 500_000,
        }
    }
}

/// Lifecycle phase of the task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum MagPhase {
    Initializing,
    Sampling,
}

/// Bring-up step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum InitError {
    PositiveSelfTest(SelfTestError),
    NegativeSelfTest(SelfTestError),
    NormalMode(MagError),
    DiscardRead(MagError),
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InitError::PositiveSelfTest(e) => write!(f, "positive self test: {}", e),
            InitError::NegativeSelfTest(e) => write!(f, "negative self test: {}", e),
            InitError::NormalMode(e) => write!(f, "normal mode config: {}", e),
            InitError::DiscardRead(e) => write!(f, "post-config read: {}", e),
        }
    }
}

/// Magnetometer task state
pub struct MagTask<'a, I2C, C, T, H>
where
    I2C: I2c,
    C: Clock,
    T: Transport,
    H: HealthReporter,
{
    driver: Hmc5883lDriver<I2C>,
    clock: C,
    publisher: FieldPublisher<T>,
    reporter: H,
    estimator: HealthEstimator,
    cache: &'a SampleCache,
    params: MagParams,
    config: MagTaskConfig,
    phase: MagPhase,
    init_attempts: u32,
    next_wake_us: u64,
}

/// Build the magnetometer task
///
/// Nothing touches the bus here; all hardware work happens inside
/// [`MagTask::run`], which the caller spawns on its executor.
///
/// # Example
///
/// ```ignore
/// static MAG_CACHE: SampleCache = SampleCache::new();
/// static MAG_STOP: AtomicBool = AtomicBool::new(false);
///
/// #[embassy_executor::task]
/// async fn mag_task(i2c: I2c<'static, I2C0, Async>, node: NodeHandle) {
///     let params = MagParams::from_store(&node.params());
///     let mut task = init(i2c, EmbassyTime, node.transport(), node.health(), &MAG_CACHE, params);
///     task.run(&MAG_STOP).await;
/// }
/// ```
pub fn init<'a, I2C, C, T, H>(
    i2c: I2C,
    clock: C,
    transport: T,
    reporter: H,
    cache: &'a SampleCache,
    params: MagParams,
) -> MagTask<'a, I2C, C, T, H>
where
    I2C: I2c,
    C: Clock,
    T: Transport,
    H: HealthReporter,
{
    MagTask::new(
        Hmc5883lDriver::new(i2c, Hmc5883lConfig::default()),
        clock,
        transport,
        reporter,
        cache,
        params,
        MagTaskConfig::default(),
    )
}

impl<'a, I2C, C, T, H> MagTask<'a, I2C, C, T, H>
where
    I2C: I2c,
    C: Clock,
    T: Transport,
    H: HealthReporter,
{
    pub fn new(
        driver: Hmc5883lDriver<I2C>,
        clock: C,
        transport: T,
        reporter: H,
        cache: &'a SampleCache,
        params: MagParams,
        config: MagTaskConfig,
    ) -> Self {
        Self {
            driver,
            clock,
            publisher: FieldPublisher::new(transport, params.priority, params.variance),
            reporter,
            estimator: HealthEstimator::new(),
            cache,
            params,
            config,
            phase: MagPhase::Initializing,
            init_attempts: 0,
            next_wake_us: 0,
        }
    }

    pub fn phase(&self) -> MagPhase {
        self.phase
    }

    /// Number of bring-up attempts made so far
    pub fn init_attempts(&self) -> u32 {
        self.init_attempts
    }

    pub fn params(&self) -> &MagParams {
        &self.params
    }

    pub fn reporter(&self) -> &H {
        &self.reporter
    }

    pub fn publisher(&self) -> &FieldPublisher<T> {
        &self.publisher
    }

    /// Run the task until `stop` is raised
    pub async fn run<S: StopSignal>(&mut self, stop: &S) {
        self.clock.sleep_us(self.config.startup_delay_us).await;
        self.reporter.mark_initialized(ComponentId::MAGNETOMETER);

        if self.initialize(stop).await {
            self.sampling_loop(stop).await;
        }

        crate::log_info!("magnetometer driver terminated");
    }

    /// Bring the device up, retrying until success or stop
    ///
    /// Returns `false` if stopped before the device came up.
    pub async fn initialize<S: StopSignal>(&mut self, stop: &S) -> bool {
        loop {
            if stop.stop_requested() {
                return false;
            }

            self.init_attempts += 1;
            match self.try_init().await {
                Ok(()) => {
                    crate::log_info!(
                        "HMC5883L initialized after {} attempt(s)",
                        self.init_attempts
                    );
                    self.phase = MagPhase::Sampling;
                    return true;
                }
                Err(e) => {
                    self.reporter
                        .set_health(ComponentId::MAGNETOMETER, HealthStatus::Error);
                    crate::log_warn!("HMC5883L init failed: {:?}", e);
                    self.clock.sleep_us(self.config.retry_backoff_us).await;
                }
            }
        }
    }

    /// One full bring-up attempt
    async fn try_init(&mut self) -> Result<(), InitError> {
        self.driver
            .run_self_test(Polarity::Positive, &self.clock)
            .await
            .map_err(InitError::PositiveSelfTest)?;
        self.driver
            .run_self_test(Polarity::Negative, &self.clock)
            .await
            .map_err(InitError::NegativeSelfTest)?;

        self.driver
            .write_config(RegisterConfig::normal())
            .await
            .map_err(InitError::NormalMode)?;

        // First conversion after a gain change is stale
        self.clock
            .sleep_us(self.driver.config().settle_delay_us)
            .await;
        self.driver
            .read_raw()
            .await
            .map_err(InitError::DiscardRead)?;

        Ok(())
    }

    /// Sample every period on an absolute schedule until stop
    pub async fn sampling_loop<S: StopSignal>(&mut self, stop: &S) {
        self.phase = MagPhase::Sampling;
        self.next_wake_us = self.clock.now_us();

        while !stop.stop_requested() {
            self.step().await;
        }
    }

    /// One sampling period: read, publish, classify, cache, then sleep
    /// until the next deadline
    pub async fn step(&mut self) {
        self.next_wake_us = self
            .next_wake_us
            .saturating_add(self.params.period_us as u64);

        self.sample_once().await;

        self.clock.sleep_until(self.next_wake_us).await;
    }

    /// Read and publish one sample
    ///
    /// Returns `false` if the read failed; health is then ERROR and the
    /// cache is left untouched.
    pub async fn sample_once(&mut self) -> bool {
        let raw = match self.driver.read_raw().await {
            Ok(raw) => raw,
            Err(_) => {
                self.reporter
                    .set_health(ComponentId::MAGNETOMETER, HealthStatus::Error);
                return false;
            }
        };

        let field = to_ned(&raw.to_physical());
        self.publisher.publish(&field);

        let status = self.estimator.classify(&field, self.clock.now_us());
        self.reporter.set_health(ComponentId::MAGNETOMETER, status);

        self.cache.set(field);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::magnetometer::hmc5883l::registers;
    use crate::platform::mock::MockI2c;
    use crate::subsystems::magnetometer::publisher::tests::RecordingTransport;
    use core::cell::Cell;
    use core::sync::atomic::AtomicBool;
    use mag_node_core::magnetometer::RawReading;
    use mag_node_core::traits::{MockTime, TimeSource};
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingReporter {
        initialized: Vec<ComponentId>,
        health: Vec<HealthStatus>,
    }

    impl HealthReporter for RecordingReporter {
        fn mark_initialized(&mut self, component: ComponentId) {
            self.initialized.push(component);
        }

        fn set_health(&mut self, component: ComponentId, status: HealthStatus) {
            assert_eq!(component, ComponentId::MAGNETOMETER);
            self.health.push(status);
        }
    }

    /// Allows `polls` stop checks, then requests stop
    struct StopAfter {
        remaining: Cell<u32>,
    }

    impl StopAfter {
        fn new(polls: u32) -> Self {
            Self {
                remaining: Cell::new(polls),
            }
        }
    }

    impl StopSignal for StopAfter {
        fn stop_requested(&self) -> bool {
            match self.remaining.get() {
                0 => true,
                n => {
                    self.remaining.set(n - 1);
                    false
                }
            }
        }
    }

    type TestTask<'a> = MagTask<'a, MockI2c, &'a MockTime, RecordingTransport, RecordingReporter>;

    fn task<'a>(mock: &MockI2c, time: &'a MockTime, cache: &'a SampleCache) -> TestTask<'a> {
        init(
            mock.clone(),
            time,
            RecordingTransport::started(),
            RecordingReporter::default(),
            cache,
            MagParams::default(),
        )
    }

    fn push_passing_bring_up(mock: &MockI2c) {
        mock.push_samples(&[RawReading::new(200, 200, 200); 3]);
        mock.push_samples(&[RawReading::new(-200, -200, -200); 3]);
        // Discarded after the gain change
        mock.push_sample(RawReading::new(0, 0, 0));
    }

    fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-6, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_task_config_default() {
        let config = MagTaskConfig::default();
        assert_eq!(config.startup_delay_us, 500_000);
        assert_eq!(config.retry_backoff_us, 500_000);
    }

    #[tokio::test]
    async fn test_bring_up_and_first_sample() {
        let mock = MockI2c::new();
        push_passing_bring_up(&mock);
        mock.push_sample(RawReading::new(100, 50, -30));
        let time = MockTime::new();
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);

        // One poll in bring-up, one sampling cycle
        task.run(&StopAfter::new(2)).await;

        assert_eq!(task.init_attempts(), 1);
        assert_eq!(task.phase(), MagPhase::Sampling);
        assert_eq!(task.reporter().initialized, [ComponentId::MAGNETOMETER]);
        assert_eq!(task.reporter().health, [HealthStatus::Ok]);
        assert_eq!(
            mock.config_registers(),
            [registers::CRA_NORMAL, registers::CRB_GAIN_DEFAULT, registers::MODE_CONTINUOUS]
        );

        let sample = cache.get();
        assert_eq!(sample.sequence_id, 1);
        assert_close(sample.field.as_array(), [-0.046, 0.092, -0.0276]);

        let messages = &task.publisher().transport().messages;
        assert_eq!(messages.len(), 1);
        assert_close(messages[0].magnetic_field_ga, [-0.046, 0.092, -0.0276]);
        assert_eq!(messages[0].magnetic_field_covariance.as_slice(), &[0.005]);
    }

    #[tokio::test]
    async fn test_bring_up_timing() {
        let mock = MockI2c::new();
        push_passing_bring_up(&mock);
        let time = MockTime::new();
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);

        task.run(&StopAfter::new(1)).await;

        // Startup 500ms, six self-test settles of 80ms, one discard settle
        assert_eq!(time.now_us(), 500_000 + 6 * 80_000 + 80_000);
        assert_eq!(cache.get().sequence_id, 0);
    }

    #[tokio::test]
    async fn test_bring_up_retries_after_self_test_failure() {
        let mock = MockI2c::new();
        // First attempt: positive self test out of band
        mock.push_samples(&[RawReading::new(100, 100, 100); 3]);
        push_passing_bring_up(&mock);
        let time = MockTime::new();
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);

        assert!(task.initialize(&AtomicBool::new(false)).await);

        assert_eq!(task.init_attempts(), 2);
        assert_eq!(task.reporter().health, [HealthStatus::Error]);
        assert_eq!(mock.pending_samples(), 0);
        // Failed attempt: 3 settles + backoff; second attempt: 7 settles
        assert_eq!(time.now_us(), 3 * 80_000 + 500_000 + 7 * 80_000);
    }

    #[tokio::test]
    async fn test_bring_up_restarts_from_positive_self_test() {
        let mock = MockI2c::new();
        mock.push_samples(&[RawReading::new(200, 200, 200); 3]);
        // Negative self test sees the wrong sign
        mock.push_samples(&[RawReading::new(200, 200, 200); 3]);
        push_passing_bring_up(&mock);
        let time = MockTime::new();
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);

        assert!(task.initialize(&AtomicBool::new(false)).await);
        assert_eq!(task.init_attempts(), 2);
        assert_eq!(mock.data_reads(), 6 + 7);
    }

    #[tokio::test]
    async fn test_stop_during_bring_up_skips_sampling() {
        let mock = MockI2c::new();
        mock.set_fail_all(true);
        let time = MockTime::new();
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);

        task.run(&StopAfter::new(3)).await;

        assert_eq!(task.init_attempts(), 3);
        assert_eq!(task.phase(), MagPhase::Initializing);
        assert_eq!(task.reporter().health, [HealthStatus::Error; 3]);
        assert!(task.publisher().transport().messages.is_empty());
        assert_eq!(cache.get().sequence_id, 0);
        assert_eq!(mock.data_reads(), 0);
    }

    #[tokio::test]
    async fn test_sustained_bus_failure_keeps_running() {
        let mock = MockI2c::new();
        push_passing_bring_up(&mock);
        let time = MockTime::new();
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);

        assert!(task.initialize(&AtomicBool::new(false)).await);
        mock.set_fail_all(true);
        let start = time.now_us();

        task.sampling_loop(&StopAfter::new(5)).await;

        assert_eq!(task.phase(), MagPhase::Sampling);
        assert_eq!(task.reporter().health, [HealthStatus::Error; 5]);
        assert_eq!(cache.get().sequence_id, 0);
        assert!(task.publisher().transport().messages.is_empty());
        assert_eq!(time.now_us(), start + 5 * 20_000);
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_cache() {
        let mock = MockI2c::new();
        push_passing_bring_up(&mock);
        mock.set_default_sample(RawReading::new(100, 50, -30));
        let time = MockTime::new();
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);
        assert!(task.initialize(&AtomicBool::new(false)).await);

        assert!(task.sample_once().await);
        let before = cache.get();

        mock.fail_next(1);
        assert!(!task.sample_once().await);
        assert_eq!(cache.get(), before);

        assert!(task.sample_once().await);
        assert_eq!(cache.get().sequence_id, 2);
        assert_eq!(
            task.reporter().health,
            [HealthStatus::Ok, HealthStatus::Error, HealthStatus::Ok]
        );
    }

    #[tokio::test]
    async fn test_deadlines_do_not_drift() {
        let mock = MockI2c::new();
        mock.set_default_sample(RawReading::new(100, 50, -30));
        let time = MockTime::with_initial(1_000);
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);
        task.next_wake_us = time.now_us();

        task.step().await;
        assert_eq!(time.now_us(), 21_000);

        // Cycle overran by 5ms; next deadline stays on the grid
        time.advance(5_000);
        task.step().await;
        assert_eq!(time.now_us(), 41_000);

        task.step().await;
        assert_eq!(time.now_us(), 61_000);
        assert_eq!(cache.get().sequence_id, 3);
    }

    #[tokio::test]
    async fn test_zero_field_warns_after_timeout() {
        let mock = MockI2c::new();
        push_passing_bring_up(&mock);
        mock.push_sample(RawReading::new(100, 50, -30));
        mock.set_default_sample(RawReading::new(0, 0, 0));
        let time = MockTime::new();
        let cache = SampleCache::new();
        let params = MagParams {
            period_us: 1_000_000,
            ..MagParams::default()
        };
        let mut task = MagTask::new(
            Hmc5883lDriver::new(mock.clone(), Hmc5883lConfig::default()),
            &time,
            RecordingTransport::started(),
            RecordingReporter::default(),
            &cache,
            params,
            MagTaskConfig::default(),
        );
        assert!(task.initialize(&AtomicBool::new(false)).await);

        // One non-zero sample, then zeros once per second
        task.sampling_loop(&StopAfter::new(7)).await;

        let health = &task.reporter().health;
        assert_eq!(health.len(), 7);
        assert!(health[..6].iter().all(|s| *s == HealthStatus::Ok));
        assert_eq!(health[6], HealthStatus::Warning);
        // Zero readings are still published and cached
        assert_eq!(cache.get().sequence_id, 7);
    }

    #[tokio::test]
    async fn test_strong_field_warns() {
        let mock = MockI2c::new();
        // 1500 counts is 1.38 gauss
        mock.set_default_sample(RawReading::new(0, 1500, 0));
        let time = MockTime::new();
        let cache = SampleCache::new();
        let mut task = task(&mock, &time, &cache);

        assert!(task.sample_once().await);
        assert_eq!(task.reporter().health, [HealthStatus::Warning]);
    }

    #[tokio::test]
    async fn test_priority_applied_once_across_cycles() {
        let mock = MockI2c::new();
        mock.set_default_sample(RawReading::new(100, 50, -30));
        let time = MockTime::new();
        let cache = SampleCache::new();
        let params = MagParams {
            priority: 24,
            ..MagParams::default()
        };
        let mut task = MagTask::new(
            Hmc5883lDriver::new(mock.clone(), Hmc5883lConfig::default()),
            &time,
            RecordingTransport::started(),
            RecordingReporter::default(),
            &cache,
            params,
            MagTaskConfig::default(),
        );

        task.sampling_loop(&StopAfter::new(4)).await;

        assert_eq!(task.publisher().transport().priorities, [24]);
        assert_eq!(task.publisher().transport().messages.len(), 4);
    }
}
