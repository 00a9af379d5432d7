//! Intersection driver
//!
//! Owns the [`Controller`] together with its platform collaborators and
//! runs one tick at a time. Everything that reaches the outside world from
//! the state machine (transition logs, warnings, telemetry, console
//! replies) passes through here.

use traffic_signal_core::command::{self, Command};
use traffic_signal_core::scheduler::TickStats;
use traffic_signal_core::traits::{
    CommandChannel, Delay, DetectorInput, LampOutput, TelemetrySink, TimeSource,
};
use traffic_signal_core::{
    Controller, Detection, Lane, SignalError, StepOutcome, TimingParams, Transition,
    VehicleDetector, LANE_COUNT,
};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport<const N: usize = LANE_COUNT> {
    pub step: StepOutcome,
    pub detections: [Detection; N],
    /// A telemetry entry was emitted
    pub logged: bool,
    pub command: Option<Command>,
}

/// A running intersection
///
/// # Type Parameters
///
/// - `O`, `I`: lamp outputs and detector input of each lane
/// - `C`: clock, also used for the debounce wait
/// - `K`: operator console
/// - `S`: telemetry sink
pub struct Intersection<O, I, C, K, S, const N: usize = LANE_COUNT> {
    controller: Controller<O, I, N>,
    detector: VehicleDetector<N>,
    clock: C,
    console: K,
    telemetry: S,
    stats: TickStats,
}

impl<O, I, C, K, S, const N: usize> Intersection<O, I, C, K, S, N>
where
    O: LampOutput,
    I: DetectorInput,
    C: TimeSource + Delay,
    K: CommandChannel,
    S: TelemetrySink,
{
    /// Bring up the intersection at the clock's current time
    ///
    /// Lane 0 starts in GO and every other lane in STOP.
    ///
    /// # Errors
    ///
    /// Propagates [`SignalError`] from controller construction.
    pub fn new(
        lanes: [Lane<O, I>; N],
        params: TimingParams,
        clock: C,
        console: K,
        telemetry: S,
    ) -> Result<Self, SignalError> {
        let now_ms = clock.now_ms();
        let controller = Controller::new(lanes, params, now_ms)?;

        crate::log_info!(
            "Traffic signal controller started: {} lanes, GO {}..{} ms, CAUTION {} ms",
            N,
            params.min_go_ms,
            params.max_go_ms,
            params.caution_ms
        );
        for lane in controller.lanes().iter() {
            crate::log_info!("Lane {} -> {}", lane.id().0, lane.phase().as_str());
        }

        Ok(Self {
            controller,
            detector: VehicleDetector::new(),
            clock,
            console,
            telemetry,
            stats: TickStats::default(),
        })
    }

    /// Run one pass of the control loop
    pub fn tick(&mut self) -> TickReport<N> {
        let started_us = self.clock.now_us();
        let now_ms = self.clock.now_ms();

        let step = self.controller.update(now_ms);
        self.report_step(&step);

        let detections = self.detector.poll(&mut self.controller, &self.clock);
        self.report_detections(&detections);

        let logged = self.controller.telemetry_due(now_ms);
        if logged {
            self.controller.emit_telemetry(now_ms, &mut self.telemetry);
            self.stats.telemetry_entries = self.stats.telemetry_entries.saturating_add(1);
        }

        let command = command::service(&self.controller, &mut self.console);
        if let Some(command) = command {
            self.stats.commands = self.stats.commands.saturating_add(1);
            crate::log_debug!("Console command: {:?}", command);
        }

        self.stats.debounce_stalls = self.detector.stalls();
        self.stats.exclusion_corrections = self.controller.corrections();
        let elapsed_us = self.clock.now_us().saturating_sub(started_us);
        self.stats
            .record_tick(u32::try_from(elapsed_us).unwrap_or(u32::MAX));

        TickReport {
            step,
            detections,
            logged,
            command,
        }
    }

    /// Run the control loop forever
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    fn report_step(&mut self, step: &StepOutcome) {
        match step {
            StepOutcome::Hold => {}
            StepOutcome::Caution(transition) => self.report_transition(transition),
            StepOutcome::Handover { stopped, started } => {
                self.report_transition(stopped);
                self.report_transition(started);
                crate::log_info!(
                    "Lane {} count: {} -> Duration: {} ms",
                    started.lane.0,
                    started.demand,
                    started.go_duration_ms
                );
            }
        }
    }

    fn report_transition(&mut self, transition: &Transition) {
        self.stats.transitions = self.stats.transitions.saturating_add(1);
        crate::log_info!(
            "Lane {} -> {}",
            transition.lane.0,
            transition.to.as_str()
        );
        if transition.corrected > 0 {
            crate::log_warn!(
                "Exclusion check forced {} lane(s) to STOP at {} ms",
                transition.corrected,
                transition.at_ms
            );
        }
    }

    fn report_detections(&mut self, detections: &[Detection; N]) {
        for (index, detection) in detections.iter().enumerate() {
            match *detection {
                Detection::Arrival { count } => {
                    self.stats.arrivals = self.stats.arrivals.saturating_add(1);
                    crate::log_debug!("Lane {} arrival, pending {}", index, count);
                }
                Detection::Stuck { count } => {
                    self.stats.arrivals = self.stats.arrivals.saturating_add(1);
                    crate::log_warn!(
                        "Lane {} detector still active after {} ms, pending {}",
                        index,
                        self.controller.params().debounce_max_wait_ms,
                        count
                    );
                }
                Detection::Idle | Detection::Latched => {}
            }
        }
    }
}

impl<O, I, C, K, S, const N: usize> Intersection<O, I, C, K, S, N> {
    pub fn controller(&self) -> &Controller<O, I, N> {
        &self.controller
    }

    /// Mutable controller access, for manual phase changes
    pub fn controller_mut(&mut self) -> &mut Controller<O, I, N> {
        &mut self.controller
    }

    pub fn detector(&self) -> &VehicleDetector<N> {
        &self.detector
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn console(&self) -> &K {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut K {
        &mut self.console
    }

    pub fn telemetry(&self) -> &S {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut S {
        &mut self.telemetry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::{UartConsole, UartTelemetry};
    use crate::devices::{GpioDetector, GpioSignalHead};
    use crate::platform::mock::{MockGpio, MockUart};
    use crate::platform::traits::UartConfig;
    use traffic_signal_core::traits::{InputLevel, Lamp, MockTime};
    use traffic_signal_core::{LaneId, Phase};

    type Head = GpioSignalHead<MockGpio>;
    type Sensor = GpioDetector<MockGpio>;
    type TestIntersection<'a> = Intersection<
        Head,
        Sensor,
        &'a MockTime,
        UartConsole<MockUart>,
        UartTelemetry<MockUart>,
    >;

    fn head() -> Head {
        GpioSignalHead::new(
            MockGpio::new_output(),
            MockGpio::new_output(),
            MockGpio::new_output(),
        )
        .unwrap()
    }

    fn idle_sensor() -> Sensor {
        GpioDetector::pull_up(MockGpio::new_input()).unwrap()
    }

    fn build(clock: &MockTime, lane1_sensor: Sensor) -> TestIntersection<'_> {
        let lanes = [
            Lane::new(LaneId(0), head(), idle_sensor()),
            Lane::new(LaneId(1), head(), lane1_sensor),
        ];
        Intersection::new(
            lanes,
            TimingParams::default(),
            clock,
            UartConsole::new(MockUart::new(UartConfig::default())),
            UartTelemetry::new(MockUart::new(UartConfig::default())),
        )
        .unwrap()
    }

    fn intersection(clock: &MockTime) -> TestIntersection<'_> {
        build(clock, idle_sensor())
    }

    fn lit(sim: &TestIntersection<'_>, index: usize) -> [bool; 3] {
        let lane = sim.controller().lane(index).unwrap();
        Lamp::ALL.map(|lamp| lane.outputs().is_lit(lamp))
    }

    #[test]
    fn test_startup_lamps() {
        let clock = MockTime::new();
        let sim = intersection(&clock);

        // [stop, caution, go]
        assert_eq!(lit(&sim, 0), [false, false, true]);
        assert_eq!(lit(&sim, 1), [true, false, false]);
        assert!(sim.controller().is_exclusive());
    }

    #[test]
    fn test_idle_ticks_hold() {
        let clock = MockTime::new();
        let mut sim = intersection(&clock);

        let report = sim.tick();
        assert_eq!(report.step, StepOutcome::Hold);
        assert_eq!(report.detections, [Detection::Idle; 2]);
        assert!(!report.logged);
        assert_eq!(report.command, None);
        assert_eq!(sim.stats().tick_count, 1);
    }

    #[test]
    fn test_full_cycle_without_demand() {
        let clock = MockTime::new();
        let mut sim = intersection(&clock);

        clock.set_ms(4000);
        assert!(matches!(sim.tick().step, StepOutcome::Caution(_)));
        assert_eq!(lit(&sim, 0), [false, true, false]);

        clock.set_ms(6000);
        match sim.tick().step {
            StepOutcome::Handover { stopped, started } => {
                assert_eq!(stopped.lane, LaneId(0));
                assert_eq!(started.lane, LaneId(1));
                assert_eq!(started.go_duration_ms, 4000);
            }
            other => panic!("expected handover, got {:?}", other),
        }
        assert_eq!(lit(&sim, 0), [true, false, false]);
        assert_eq!(lit(&sim, 1), [false, false, true]);
        assert_eq!(sim.stats().transitions, 3);
        assert_eq!(sim.stats().exclusion_corrections, 0);
    }

    #[test]
    fn test_stuck_detector_counts_once() {
        let clock = MockTime::new();
        let mut held = MockGpio::new_input();
        held.set_input_state(false);
        let mut sim = build(&clock, GpioDetector::pull_up(held).unwrap());
        assert_eq!(
            sim.controller().lane(1).unwrap().detector().level(),
            InputLevel::Active
        );

        let first = sim.tick();
        assert_eq!(first.detections[1], Detection::Stuck { count: 1 });
        // The debounce wait ran its full bound on the mock clock
        assert!(clock.now_ms() >= 500);

        let second = sim.tick();
        assert_eq!(second.detections[1], Detection::Latched);

        assert_eq!(sim.controller().pending_counts(), [0, 1]);
        assert_eq!(sim.stats().debounce_stalls, 1);
        assert_eq!(sim.stats().arrivals, 1);
        assert!(sim.stats().max_tick_us >= 500_000);
    }

    #[test]
    fn test_stuck_demand_sizes_next_go() {
        let clock = MockTime::new();
        let mut held = MockGpio::new_input();
        held.set_input_state(false);
        let mut sim = build(&clock, GpioDetector::pull_up(held).unwrap());

        sim.tick();
        clock.set_ms(4000);
        sim.tick();
        clock.set_ms(6000);
        match sim.tick().step {
            StepOutcome::Handover { started, .. } => {
                assert_eq!(started.demand, 1);
                assert_eq!(started.go_duration_ms, 4500);
            }
            other => panic!("expected handover, got {:?}", other),
        }
    }

    #[test]
    fn test_telemetry_entry_at_interval() {
        let clock = MockTime::new();
        let mut sim = intersection(&clock);

        clock.set_ms(9999);
        sim.tick();
        assert!(sim.telemetry().uart().tx_buffer().is_empty());

        clock.set_ms(10000);
        assert!(sim.tick().logged);
        let lines = sim.telemetry().uart().tx_lines();
        assert_eq!(lines[0], "--- LOG ENTRY ---");
        assert_eq!(
            lines[1],
            "Timestamp(ms),LaneID,State,VehicleCount,CurrentGreenDuration(ms),WaitTime(ms)"
        );
        assert_eq!(lines.len(), 5);
        assert_eq!(sim.controller().next_log_deadline_ms(), 20000);
        assert_eq!(sim.stats().telemetry_entries, 1);
    }

    #[test]
    fn test_status_command() {
        let clock = MockTime::new();
        let mut sim = intersection(&clock);
        sim.console_mut().uart_mut().inject_rx_data(b"s");

        assert_eq!(sim.tick().command, Some(Command::Status));
        assert_eq!(
            sim.console().uart().tx_lines(),
            vec![
                "Command received: s".to_string(),
                "--- SYSTEM STATUS ---".to_string(),
                "Lane 0 count: 0".to_string(),
                "Lane 1 count: 0".to_string(),
            ]
        );
        assert_eq!(sim.stats().commands, 1);
    }

    #[test]
    fn test_exclusive_over_many_ticks() {
        let clock = MockTime::new();
        let mut sim = intersection(&clock);

        for step in 0..200u64 {
            clock.set_ms(step * 100);
            sim.tick();
            assert!(sim.controller().is_exclusive());
        }
        assert_ne!(sim.controller().active_lane().phase(), Phase::Stop);
    }
}
