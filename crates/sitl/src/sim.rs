//! Simulation runner.
//!
//! Builds a full intersection on simulated peripherals: three lamp pins and
//! one detector pin per lane, a UART console and a shared simulated clock.
//! Each step feeds due arrivals to the detector pins, runs one controller
//! tick, then advances the clock by `step_ms`.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use traffic_signal::communication::UartConsole;
use traffic_signal::core::scheduler::{Intersection, TickReport, TickStats};
use traffic_signal::devices::{GpioDetector, GpioSignalHead};
use traffic_signal_core::traits::{Lamp, TelemetrySink, TimeSource};
use traffic_signal_core::{Lane, LaneId, LANE_COUNT};

use crate::config::{LaneTraffic, SimConfig};
use crate::error::SitlError;
use crate::platform::{SitlGpio, SitlTimeSource, SitlUart};
use crate::telemetry::SimTelemetry;
use crate::traffic::TrafficGenerator;

/// Console baud rate reported by the simulated UART.
const CONSOLE_BAUD: u32 = 9600;

/// First detector pin; lane `i` uses `DETECTOR_PIN_BASE + i`.
const DETECTOR_PIN_BASE: u8 = 20;

pub type SimLane = Lane<GpioSignalHead<SitlGpio>, GpioDetector<SitlGpio>>;

pub type SimIntersection<S> = Intersection<
    GpioSignalHead<SitlGpio>,
    GpioDetector<SitlGpio>,
    SitlTimeSource,
    UartConsole<SitlUart>,
    S,
>;

/// Outcome of a simulation run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub steps: u64,
    pub sim_time_ms: u64,
    pub stats: TickStats,
    /// Console replies, in order
    pub console_lines: Vec<String>,
}

/// A simulated intersection with its traffic.
pub struct Simulation<S: TelemetrySink = SimTelemetry> {
    intersection: SimIntersection<S>,
    traffic: Vec<TrafficGenerator>,
    clock: SitlTimeSource,
    step_ms: u64,
    duration_ms: Option<u64>,
    realtime: bool,
}

impl<S: TelemetrySink> Simulation<S> {
    /// Build the intersection described by `config`, starting at time zero.
    pub fn new(config: &SimConfig, telemetry: S) -> Result<Self, SitlError> {
        config.validate()?;
        let params = config.timing.to_params()?;
        let clock = SitlTimeSource::new();

        let mut lanes = Vec::with_capacity(LANE_COUNT);
        let mut traffic = Vec::with_capacity(LANE_COUNT);
        for index in 0..LANE_COUNT {
            let (lane, generator) = build_lane(index, &config.lane(index), clock.now_ms())?;
            lanes.push(lane);
            traffic.push(generator);
        }
        let lanes: [SimLane; LANE_COUNT] = lanes
            .try_into()
            .map_err(|_| SitlError::Config("lane count mismatch".into()))?;

        let intersection = Intersection::new(
            lanes,
            params,
            clock.clone(),
            UartConsole::new(SitlUart::new(CONSOLE_BAUD)),
            telemetry,
        )?;

        Ok(Self {
            intersection,
            traffic,
            clock,
            step_ms: config.step_ms,
            duration_ms: config.duration_ms,
            realtime: config.realtime,
        })
    }

    /// Advance the simulation by one controller tick.
    pub fn step(&mut self) -> TickReport {
        let now_ms = self.clock.now_ms();
        for generator in self.traffic.iter_mut() {
            generator.advance(now_ms);
        }
        let report = self.intersection.tick();
        self.clock.advance_ms(self.step_ms);
        report
    }

    /// Step until `duration_ms` of simulated time have passed.
    pub fn run_for(&mut self, duration_ms: u64) -> RunSummary {
        let end_ms = self.now_ms() + duration_ms;
        let mut summary = RunSummary::default();
        while self.now_ms() < end_ms {
            self.step();
            summary.steps += 1;
            summary.console_lines.extend(self.take_console_lines());
        }
        self.finish(summary)
    }

    /// Run until the configured duration elapses or `shutdown` resolves.
    ///
    /// Bytes received on `commands` are fed to the console. Console replies
    /// are printed as they appear. In realtime mode one step is taken per
    /// `step_ms` of wall-clock time; otherwise steps run back to back.
    pub async fn run<F>(&mut self, mut commands: mpsc::Receiver<Vec<u8>>, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut interval = tokio::time::interval(Duration::from_millis(self.step_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let realtime = self.realtime;
        let mut commands_open = true;
        let mut summary = RunSummary::default();

        while !self.finished() {
            tokio::select! {
                _ = &mut shutdown => break,
                received = commands.recv(), if commands_open => match received {
                    Some(bytes) => self.inject_command(&bytes),
                    None => commands_open = false,
                },
                _ = pace(&mut interval, realtime) => {
                    self.step();
                    summary.steps += 1;
                    for line in self.take_console_lines() {
                        println!("{line}");
                        summary.console_lines.push(line);
                    }
                }
            }
        }

        self.finish(summary)
    }

    fn finish(&self, mut summary: RunSummary) -> RunSummary {
        summary.sim_time_ms = self.now_ms();
        summary.stats = *self.intersection.stats();
        summary
    }

    /// Whether the configured duration has elapsed.
    pub fn finished(&self) -> bool {
        self.duration_ms.is_some_and(|end| self.now_ms() >= end)
    }

    /// Queue operator command bytes on the console.
    pub fn inject_command(&mut self, bytes: &[u8]) {
        self.intersection
            .console_mut()
            .uart_mut()
            .inject_rx_data(bytes);
    }

    /// Complete console reply lines written since the last call.
    pub fn take_console_lines(&mut self) -> Vec<String> {
        self.intersection.console_mut().uart_mut().drain_lines()
    }

    /// Lit lamps of a lane as `[stop, caution, go]`.
    pub fn lamps(&self, index: usize) -> Option<[bool; 3]> {
        let lane = self.intersection.controller().lane(index)?;
        Some(Lamp::ALL.map(|lamp| lane.outputs().is_lit(lamp)))
    }

    /// Arrivals generated so far on each lane.
    pub fn presses(&self) -> Vec<u32> {
        self.traffic.iter().map(TrafficGenerator::presses).collect()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &SitlTimeSource {
        &self.clock
    }

    pub fn intersection(&self) -> &SimIntersection<S> {
        &self.intersection
    }

    pub fn intersection_mut(&mut self) -> &mut SimIntersection<S> {
        &mut self.intersection
    }
}

async fn pace(interval: &mut Interval, realtime: bool) {
    if realtime {
        interval.tick().await;
    } else {
        tokio::task::yield_now().await;
    }
}

fn build_lane(
    index: usize,
    traffic: &LaneTraffic,
    start_ms: u64,
) -> Result<(SimLane, TrafficGenerator), SitlError> {
    let pin_base = (index * 3) as u8;
    let head = GpioSignalHead::new(
        SitlGpio::new_output(pin_base),
        SitlGpio::new_output(pin_base + 1),
        SitlGpio::new_output(pin_base + 2),
    )?;

    let detector_pin = SitlGpio::new_input(DETECTOR_PIN_BASE + index as u8);
    let generator = TrafficGenerator::new(detector_pin.clone(), traffic, start_ms);
    let detector = GpioDetector::pull_up(detector_pin)?;

    Ok((Lane::new(LaneId(index as u8), head, detector), generator))
}
