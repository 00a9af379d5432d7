//! Two-lane intersection on a Raspberry Pi Pico 2 W
//!
//! Drives two signal heads and reads two push-button or loop detectors.
//! Phase timings come from the build environment (see `parameters`).
//!
//! # Wiring
//!
//! | Lane | STOP | CAUTION | GO | Detector (to GND) |
//! |------|------|---------|----|-------------------|
//! | 0    | GP2  | GP3     | GP4 | GP14 |
//! | 1    | GP6  | GP7     | GP8 | GP15 |
//!
//! Operator console on UART0 (GP0 TX, GP1 RX) at 9600 baud. Telemetry
//! goes to the defmt log.
//!
//! # Usage
//!
//! ```bash
//! SIGNAL_CAUTION_MS=3000 cargo build --release --features pico2_w \
//!     --target thumbv8m.main-none-eabihf --bin intersection_board
//! probe-rs run --chip RP2350 target/thumbv8m.main-none-eabihf/release/intersection_board
//! ```

#![no_std]
#![no_main]

use defmt::error;
use rp235x_hal as hal;
use {defmt_rtt as _, panic_probe as _};

use hal::clocks::{init_clocks_and_plls, Clock};
use hal::fugit::RateExtU32;
use hal::gpio::{DynPinId, FunctionSioInput, FunctionSioOutput, FunctionUart, PullNone, PullUp};
use hal::uart::{DataBits, StopBits, UartConfig as HalUartConfig, UartPeripheral};

use traffic_signal::communication::{LogTelemetry, UartConsole};
use traffic_signal::core::scheduler::Intersection;
use traffic_signal::devices::{GpioDetector, GpioSignalHead};
use traffic_signal::parameters::timing_from_build_env;
use traffic_signal::platform::rp2350::{Rp2350Clock, Rp2350Gpio, Rp2350Uart};
use traffic_signal::platform::traits::UartConfig;
use traffic_signal::platform::{GpioMode, PlatformError};
use traffic_signal_core::{Lane, LaneId};

/// Boot block telling the RP2350 bootrom this is a secure ARM image
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: hal::block::ImageDef = hal::block::ImageDef::secure_exe();

/// Pico 2 W crystal frequency
const XTAL_FREQ_HZ: u32 = 12_000_000;

const CONSOLE_BAUD: u32 = 9600;

type LampPin = Rp2350Gpio<DynPinId, FunctionSioOutput, PullNone>;
type DetectorPin = Rp2350Gpio<DynPinId, FunctionSioInput, PullUp>;
type BoardLane = Lane<GpioSignalHead<LampPin>, GpioDetector<DetectorPin>>;

#[hal::entry]
fn main() -> ! {
    let Some(mut pac) = hal::pac::Peripherals::take() else {
        halt("peripherals already taken");
    };

    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let Ok(clocks) = init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    ) else {
        halt("clock initialization failed");
    };

    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let timer = hal::Timer::new_timer0(pac.TIMER0, &mut pac.RESETS, &clocks);

    let uart_pins = (
        pins.gpio0.into_function::<FunctionUart>(),
        pins.gpio1.into_function::<FunctionUart>(),
    );
    let Ok(uart) = UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS).enable(
        HalUartConfig::new(
            CONSOLE_BAUD.Hz(),
            DataBits::Eight,
            None,
            StopBits::One,
        ),
        clocks.peripheral_clock.freq(),
    ) else {
        halt("UART0 initialization failed");
    };
    let console = UartConsole::new(Rp2350Uart::new(
        uart,
        UartConfig {
            baud_rate: CONSOLE_BAUD,
            ..UartConfig::default()
        },
    ));

    let lanes = match build_lanes(
        [
            lamp(Rp2350Gpio::new(pins.gpio2, GpioMode::Input).into_output()),
            lamp(Rp2350Gpio::new(pins.gpio3, GpioMode::Input).into_output()),
            lamp(Rp2350Gpio::new(pins.gpio4, GpioMode::Input).into_output()),
        ],
        [
            lamp(Rp2350Gpio::new(pins.gpio6, GpioMode::Input).into_output()),
            lamp(Rp2350Gpio::new(pins.gpio7, GpioMode::Input).into_output()),
            lamp(Rp2350Gpio::new(pins.gpio8, GpioMode::Input).into_output()),
        ],
        [
            Rp2350Gpio::new(pins.gpio14, GpioMode::Input)
                .into_pull_up_input()
                .into_dyn(),
            Rp2350Gpio::new(pins.gpio15, GpioMode::Input)
                .into_pull_up_input()
                .into_dyn(),
        ],
    ) {
        Ok(lanes) => lanes,
        Err(e) => {
            error!("Lane setup failed: {}", e);
            halt("lane setup failed");
        }
    };

    let params = timing_from_build_env();
    let intersection = Intersection::new(
        lanes,
        params,
        Rp2350Clock::new(timer),
        console,
        LogTelemetry::new(),
    );

    match intersection {
        Ok(mut intersection) => intersection.run(),
        Err(e) => {
            error!("Controller rejected timing: {}", e);
            halt("invalid timing");
        }
    }
}

fn lamp<I: hal::gpio::PinId>(pin: Rp2350Gpio<I, FunctionSioOutput, PullNone>) -> LampPin {
    pin.into_dyn()
}

fn build_lanes(
    lane0: [LampPin; 3],
    lane1: [LampPin; 3],
    detectors: [DetectorPin; 2],
) -> Result<[BoardLane; 2], PlatformError> {
    let [stop0, caution0, go0] = lane0;
    let [stop1, caution1, go1] = lane1;
    let [detector0, detector1] = detectors;

    Ok([
        Lane::new(
            LaneId(0),
            GpioSignalHead::new(stop0, caution0, go0)?,
            GpioDetector::pull_up(detector0)?,
        ),
        Lane::new(
            LaneId(1),
            GpioSignalHead::new(stop1, caution1, go1)?,
            GpioDetector::pull_up(detector1)?,
        ),
    ])
}

fn halt(reason: &str) -> ! {
    error!("Halted: {}", reason);
    loop {
        core::hint::spin_loop();
    }
}
