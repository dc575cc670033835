#![no_std]
//! # `ad9833` - Embedded driver for the AD9833 DDS waveform generator
//!
//! The AD9833 is a low power DDS waveform generator sold by Analog Devices. Check the [datasheet](https://www.analog.com/media/en/technical-documentation/data-sheets/AD9833.pdf) for general information about it.
//!
//! This crate implements an interface for embedded devices to control such an AD9833 chip, optionally
//! paired with an MCP41010 digital potentiometer on its output for amplitude control. On top of plain
//! frequency/phase/waveform control it runs frequency sweeps and AM/FM modulation, recomputed on each
//! call to [`tick`](Ad9833::tick).
//!
//! The driver needs:
//! - an SPI bus implementing [`embedded_hal::blocking::spi::Write<u8>`] (mode 2, MSB first),
//! - a chip-select pin implementing [`embedded_hal::digital::v2::OutputPin`],
//! - a delay provider implementing [`DelayUs<u32>`] and [`DelayMs<u32>`],
//! - a millisecond [`Clock`]. Any `Fn() -> u32` works.
//!
//! ## Usage example
//!
//! ```ignore
//! let mut ad9833 = ad9833::Ad9833::new(spi, cs, delay, || millis())
//!     .with_digipot(digipot_cs) // optional: MCP41010 for amplitude control
//!     .init()?;
//!
//! ad9833.set_waveform(Waveform::Triangle)?;
//! ad9833.start_sweep(100.0, 10_000.0, 5000.0, SweepCurve::Logarithmic)?;
//!
//! loop {
//!     ad9833.tick()?;
//! }
//! ```
//!
//! ## Supported features
//!
//! - [x] Reset the device
//! - [x] Frequency, phase and waveform (sine, triangle, square)
//! - [x] Power down / wakeup
//! - [x] Amplitude via MCP41010
//! - [x] Looping linear and logarithmic sweeps
//! - [x] AM, FM and FSK
//! - [ ] PHASE1 register / phase shift keying
//!
//! ## A note about timing
//!
//! Sweeps and modulation are computed from the [`Clock`] each time [`tick`](Ad9833::tick) is called.
//! The output only changes on a tick, so the smoothness of a sweep or modulation depends on how often
//! the main loop gets around to calling it. A 28-bit frequency update is three SPI transfers; they
//! are always issued back to back within a single call.
//!
//! Requests the chip cannot honour (frequencies above 12.5 MHz, amplitude changes without a
//! potentiometer) are refused with an [`Error`] and a warning through [`tracing`]; the driver
//! state is left untouched and it keeps running.

#[cfg(test)]
extern crate std;

pub mod digipot;
mod error;
pub mod modulation;
pub mod register;
pub mod sweep;
#[cfg(test)]
mod testing;
pub mod util;

pub use error::Error;
pub use modulation::{Modulation, ModulationKind, ModulationOutput};
pub use sweep::{Sweep, SweepCurve};

use core::fmt;
use core::marker::PhantomData;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;
use tracing::{debug, info, trace, warn};

use digipot::Mcp41010;
use register::{control, FrequencyRegister};

/// Default frequency of the oscillator connected to the AD9833.
pub const DEFAULT_MASTER_CLOCK: f32 = 25e6;

/// Highest output frequency accepted, in Hz.
pub const MAX_FREQUENCY: f32 = 12.5e6;

/// Length of the reset pulse, in milliseconds.
const RESET_PULSE_MS: u32 = 1;

/// Monotonic millisecond time source.
///
/// The value is allowed to wrap around.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<F> Clock for F
where
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// Output waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    /// Square wave from the MSB of the phase accumulator.
    Square,
}

impl Waveform {
    fn control_bits(self) -> u16 {
        match self {
            Waveform::Sine => 0,
            Waveform::Triangle => control::MODE,
            Waveform::Square => control::OPBITEN | control::DIV2,
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waveform::Sine => write!(f, "SINE"),
            Waveform::Triangle => write!(f, "TRIANGLE"),
            Waveform::Square => write!(f, "SQUARE"),
        }
    }
}

/// Settings applied by [`init`](Ad9833::init).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Frequency of the oscillator on the MCLK pin, in Hz.
    pub master_clock: f32,
    /// Initial output frequency, in Hz.
    pub frequency: f32,
    pub waveform: Waveform,
    /// Initial phase offset, in degrees.
    pub phase: f32,
    /// Initial amplitude in percent. Only used with a potentiometer attached.
    pub amplitude: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            master_clock: DEFAULT_MASTER_CLOCK,
            frequency: 1000.0,
            waveform: Waveform::Sine,
            phase: 0.0,
            amplitude: 50.0,
        }
    }
}

/// Placeholder for the potentiometer chip-select when none is attached.
pub struct NoPin<E>(PhantomData<E>);

impl<E> OutputPin for NoPin<E> {
    type Error = E;

    fn set_low(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), E> {
        Ok(())
    }
}

/// Represents a connection to an AD9833 device.
///
/// See [crate level documentation](crate), or check the [`new`](Ad9833::new) method for an entry point.
pub struct Ad9833<Mode, Spi, Cs, Delay, Clk, DigiCs> {
    spi: Spi,
    cs: Cs,
    delay: Delay,
    clock: Clk,
    config: Config,
    digipot: Option<Mcp41010<DigiCs>>,
    waveform: Waveform,
    frequency: f32,
    // frequency FM deviates around; not moved by FM itself
    carrier: f32,
    phase: f32,
    sleeping: bool,
    active_register: FrequencyRegister,
    fsk: Option<(f32, f32)>,
    sweep: Option<Sweep>,
    modulation: Option<Modulation>,
    marker: PhantomData<Mode>,
}

impl<Spi, Cs, Delay, Clk, PinE> Ad9833<mode::Init, Spi, Cs, Delay, Clk, NoPin<PinE>>
where
    Cs: OutputPin<Error = PinE>,
{
    /// Construct a new Ad9833 instance, in initial mode.
    ///
    /// This call does not communicate with the device yet. You need to call [`init`](Ad9833::init)
    /// to reset the chip before you can send any data.
    ///
    /// Uses the default [`Config`]: 25 MHz master clock, 1 kHz sine at 0°, 50 % amplitude.
    pub fn new(spi: Spi, cs: Cs, delay: Delay, clock: Clk) -> Self {
        Self::new_with_config(spi, cs, delay, clock, Config::default())
    }

    /// Same as [`new`](Ad9833::new), but with explicit settings.
    ///
    /// Use this if your board's oscillator is **not** 25 MHz.
    pub fn new_with_config(spi: Spi, cs: Cs, delay: Delay, clock: Clk, config: Config) -> Self {
        Self {
            spi,
            cs,
            delay,
            clock,
            config,
            digipot: None,
            waveform: Waveform::Sine,
            frequency: 0.0,
            carrier: 0.0,
            phase: 0.0,
            sleeping: false,
            active_register: FrequencyRegister::Freq0,
            fsk: None,
            sweep: None,
            modulation: None,
            marker: PhantomData,
        }
    }

    /// Attach an MCP41010 potentiometer, selected by `cs`, sharing the AD9833's SPI bus.
    pub fn with_digipot<DigiCs>(self, cs: DigiCs) -> Ad9833<mode::Init, Spi, Cs, Delay, Clk, DigiCs>
    where
        DigiCs: OutputPin<Error = PinE>,
    {
        Ad9833 {
            spi: self.spi,
            cs: self.cs,
            delay: self.delay,
            clock: self.clock,
            config: self.config,
            digipot: Some(Mcp41010::new(cs)),
            waveform: self.waveform,
            frequency: self.frequency,
            carrier: self.carrier,
            phase: self.phase,
            sleeping: self.sleeping,
            active_register: self.active_register,
            fsk: self.fsk,
            sweep: self.sweep,
            modulation: self.modulation,
            marker: PhantomData,
        }
    }
}

impl<Spi, Cs, Delay, Clk, DigiCs, SpiE, PinE> Ad9833<mode::Init, Spi, Cs, Delay, Clk, DigiCs>
where
    Spi: Write<u8, Error = SpiE>,
    Cs: OutputPin<Error = PinE>,
    Delay: DelayUs<u32> + DelayMs<u32>,
    Clk: Clock,
    DigiCs: OutputPin<Error = PinE>,
{
    /// Reset the device and apply the initial [`Config`].
    ///
    /// Sets up the potentiometer first when one is attached, then pulses RESET and
    /// loads frequency, waveform, phase and amplitude.
    ///
    /// Returns an error if any bus or pin operation fails, or if the configured
    /// frequency is out of range.
    pub fn init(self) -> Result<Ad9833<mode::Ready, Spi, Cs, Delay, Clk, DigiCs>, Error<SpiE, PinE>> {
        let mut ad9833 = Ad9833 {
            spi: self.spi,
            cs: self.cs,
            delay: self.delay,
            clock: self.clock,
            config: self.config,
            digipot: self.digipot,
            waveform: self.waveform,
            frequency: self.frequency,
            carrier: self.carrier,
            phase: self.phase,
            sleeping: self.sleeping,
            active_register: self.active_register,
            fsk: self.fsk,
            sweep: self.sweep,
            modulation: self.modulation,
            marker: PhantomData,
        };
        debug!("Setting up AD9833...");

        ad9833.cs.set_high().map_err(Error::Pin)?;
        if let Some(digipot) = ad9833.digipot.as_mut() {
            digipot.setup(&mut ad9833.spi, &mut ad9833.delay)?;
            debug!("MCP41010 digital potentiometer configured");
        }

        let config = ad9833.config;
        ad9833.reset()?;
        ad9833.set_frequency(config.frequency)?;
        ad9833.set_waveform(config.waveform)?;
        ad9833.set_phase(config.phase)?;
        if ad9833.digipot.is_some() {
            ad9833.set_amplitude_percent(config.amplitude)?;
        }

        Ok(ad9833)
    }
}

impl<Spi, Cs, Delay, Clk, DigiCs, SpiE, PinE> Ad9833<mode::Ready, Spi, Cs, Delay, Clk, DigiCs>
where
    Spi: Write<u8, Error = SpiE>,
    Cs: OutputPin<Error = PinE>,
    Delay: DelayUs<u32> + DelayMs<u32>,
    Clk: Clock,
    DigiCs: OutputPin<Error = PinE>,
{
    /// Set output frequency to the given value (in Hz).
    ///
    /// Loads FREQ0 as a 28-bit word and routes it to the output. Values outside
    /// 0 to 12.5 MHz are refused with [`Error::FrequencyOutOfRange`] and nothing
    /// is written.
    pub fn set_frequency(&mut self, frequency: f32) -> Result<(), Error<SpiE, PinE>> {
        self.load_frequency(frequency)?;
        self.carrier = frequency;
        Ok(())
    }

    /// Select the output waveform.
    ///
    /// Only the control register is written; the frequency and phase registers keep their contents.
    pub fn set_waveform(&mut self, waveform: Waveform) -> Result<(), Error<SpiE, PinE>> {
        self.write_control(waveform, self.sleeping, self.active_register)?;
        self.waveform = waveform;
        debug!("Set waveform to {}", waveform);
        Ok(())
    }

    /// Set the phase offset of the output (in degrees).
    ///
    /// Any angle is accepted and wrapped into one turn.
    pub fn set_phase(&mut self, phase_deg: f32) -> Result<(), Error<SpiE, PinE>> {
        let word = util::phase_to_word(phase_deg);
        self.write_register(register::phase0(word))?;
        self.phase = phase_deg;
        debug!("Set phase to {:.2} degrees", phase_deg);
        Ok(())
    }

    /// Power the DAC down (`true`) or back up (`false`).
    ///
    /// The chip keeps its register contents while asleep, so frequency, phase and
    /// waveform are unchanged on wakeup.
    pub fn sleep(&mut self, enable: bool) -> Result<(), Error<SpiE, PinE>> {
        self.write_control(self.waveform, enable, self.active_register)?;
        self.sleeping = enable;
        debug!("Sleep mode: {}", if enable { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Pulse the RESET bit.
    ///
    /// The control register is cleared afterwards: sine output from FREQ0, awake.
    pub fn reset(&mut self) -> Result<(), Error<SpiE, PinE>> {
        self.write_register(register::control_word(control::RESET))?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.write_register(register::control_word(0))?;

        self.waveform = Waveform::Sine;
        self.sleeping = false;
        self.active_register = FrequencyRegister::Freq0;
        debug!("Reset complete");
        Ok(())
    }

    /// Set the amplitude in percent, through the potentiometer.
    ///
    /// Values are clamped to 0..=100. Without a potentiometer this does nothing and
    /// returns [`Error::AmplitudeNotConfigured`].
    pub fn set_amplitude_percent(&mut self, percent: f32) -> Result<(), Error<SpiE, PinE>> {
        let Some(digipot) = self.digipot.as_mut() else {
            warn!("Digital potentiometer not configured");
            return Err(Error::AmplitudeNotConfigured);
        };
        digipot.set_amplitude(&mut self.spi, &mut self.delay, percent)?;
        debug!("Amplitude set to {:.1}%", percent);
        Ok(())
    }

    /// Write a raw wiper code to the potentiometer.
    pub fn set_amplitude_raw(&mut self, code: u8) -> Result<(), Error<SpiE, PinE>> {
        let Some(digipot) = self.digipot.as_mut() else {
            warn!("Digital potentiometer not configured");
            return Err(Error::AmplitudeNotConfigured);
        };
        digipot.set_wiper(&mut self.spi, &mut self.delay, code)?;
        debug!("Amplitude wiper set to {}", code);
        Ok(())
    }

    /// Put the potentiometer into its shutdown state.
    pub fn shutdown_amplitude(&mut self) -> Result<(), Error<SpiE, PinE>> {
        let Some(digipot) = self.digipot.as_mut() else {
            warn!("Digital potentiometer not configured");
            return Err(Error::AmplitudeNotConfigured);
        };
        digipot.shutdown(&mut self.spi, &mut self.delay)?;
        debug!("Digital potentiometer shut down");
        Ok(())
    }

    /// Last amplitude written, in percent. `0.0` without a potentiometer.
    pub fn get_amplitude_percent(&self) -> f32 {
        match &self.digipot {
            Some(digipot) => digipot.amplitude(),
            None => {
                warn!("Digital potentiometer not configured");
                0.0
            }
        }
    }

    /// Last wiper code written, if a potentiometer is attached.
    pub fn amplitude_raw(&self) -> Option<u8> {
        self.digipot.as_ref().map(Mcp41010::wiper)
    }

    pub fn has_amplitude_control(&self) -> bool {
        self.digipot.is_some()
    }

    /// Start a looping sweep from `start` to `end` (Hz) over `duration_ms`.
    ///
    /// Replaces any running sweep. The output follows on the next [`tick`](Ad9833::tick).
    /// A logarithmic sweep needs both endpoints above zero.
    pub fn start_sweep(&mut self, start: f32, end: f32, duration_ms: f32, curve: SweepCurve) -> Result<(), Error<SpiE, PinE>> {
        if !in_range(start) || !in_range(end) {
            warn!("Invalid sweep frequency range: {:.2} Hz -> {:.2} Hz", start, end);
            return Err(Error::SweepOutOfRange { start, end });
        }
        if !(duration_ms.is_finite() && duration_ms > 0.0) {
            warn!("Invalid sweep duration: {} ms", duration_ms);
            return Err(Error::InvalidSweepDuration(duration_ms));
        }

        self.sweep = Some(Sweep::new(start, end, duration_ms, curve, self.clock.now_ms()));
        info!(
            "Starting {} sweep: {:.2} Hz -> {:.2} Hz over {:.0} ms",
            curve, start, end, duration_ms
        );
        Ok(())
    }

    /// Stop the sweep. The output stays at the last swept frequency.
    pub fn stop_sweep(&mut self) {
        self.sweep = None;
        info!("Sweep stopped");
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    pub fn sweep(&self) -> Option<&Sweep> {
        self.sweep.as_ref()
    }

    /// Start modulating at `rate_hz` with the given depth.
    ///
    /// `depth` outside 0..=1 is clamped. AM drives the potentiometer when one is
    /// attached, and falls back to phase modulation otherwise.
    ///
    /// FM deviates around the frequency last set by [`set_frequency`](Ad9833::set_frequency)
    /// or the sweep, not around its own previous output, so the carrier does not drift.
    ///
    /// A non-finite `rate_hz` is refused with [`Error::InvalidModulationRate`] and any
    /// running modulation is kept.
    pub fn set_modulation(&mut self, kind: ModulationKind, rate_hz: f32, depth: f32) -> Result<(), Error<SpiE, PinE>> {
        if !rate_hz.is_finite() {
            warn!("Invalid modulation rate: {} Hz", rate_hz);
            return Err(Error::InvalidModulationRate(rate_hz));
        }
        if !(0.0..=1.0).contains(&depth) {
            warn!("Modulation depth must be 0.0-1.0, got {:.2}", depth);
        }
        let modulation = Modulation::new(kind, rate_hz, depth, self.clock.now_ms());
        info!(
            "Modulation set: {}, Freq: {:.2} Hz, Depth: {:.2}",
            kind,
            rate_hz,
            modulation.depth()
        );

        if kind == ModulationKind::Am {
            if self.digipot.is_some() {
                info!("Using MCP41010 for true amplitude modulation");
            } else {
                warn!("No digital potentiometer, approximating AM with phase modulation");
            }
        }
        self.modulation = Some(modulation);
        Ok(())
    }

    /// Stop modulating. The last applied frequency, phase or amplitude stays in place.
    pub fn stop_modulation(&mut self) {
        self.modulation = None;
        info!("Modulation stopped");
    }

    pub fn is_modulating(&self) -> bool {
        self.modulation.is_some()
    }

    pub fn modulation(&self) -> Option<&Modulation> {
        self.modulation.as_ref()
    }

    /// Pre-load FREQ0 with `freq0` and FREQ1 with `freq1` (Hz).
    ///
    /// FSELECT is left alone during both loads, so the output keeps running from whatever
    /// [`set_fsk_active_state`](Ad9833::set_fsk_active_state) last selected.
    pub fn set_fsk_frequencies(&mut self, freq0: f32, freq1: f32) -> Result<(), Error<SpiE, PinE>> {
        for frequency in [freq0, freq1] {
            if !in_range(frequency) {
                warn!("Frequency out of range (0-12.5MHz): {:.2} Hz", frequency);
                return Err(Error::FrequencyOutOfRange(frequency));
            }
        }

        let word0 = self.frequency_word(freq0);
        let word1 = self.frequency_word(freq1);
        let active = self.active_register;
        self.write_frequency_register(word0, FrequencyRegister::Freq0, active)?;
        self.write_frequency_register(word1, FrequencyRegister::Freq1, active)?;

        self.frequency = freq0;
        self.carrier = freq0;
        self.fsk = Some((freq0, freq1));
        info!("FSK frequencies set: {:.2} Hz / {:.2} Hz", freq0, freq1);
        Ok(())
    }

    /// Route FREQ1 (`true`) or FREQ0 (`false`) to the output.
    ///
    /// A single control register write; both registers keep their contents.
    pub fn set_fsk_active_state(&mut self, state: bool) -> Result<(), Error<SpiE, PinE>> {
        let active = if state { FrequencyRegister::Freq1 } else { FrequencyRegister::Freq0 };
        self.write_control(self.waveform, self.sleeping, active)?;
        self.active_register = active;
        trace!("FSK state: {}", state);
        Ok(())
    }

    /// Recompute sweep and modulation for the current time and push the results.
    ///
    /// Call this once per iteration of the main loop. The sweep is applied first, so
    /// FM deviates around the freshly swept frequency. Values the chip refuses (e.g.
    /// FM beyond 12.5 MHz) are skipped; only bus faults are returned.
    pub fn tick(&mut self) -> Result<(), Error<SpiE, PinE>> {
        let now = self.clock.now_ms();

        if let Some(sweep) = self.sweep {
            let (frequency, next) = sweep.compute(now);
            self.sweep = Some(next);
            skip_rejected(self.set_frequency(frequency))?;
        }

        if let Some(modulation) = self.modulation {
            let (output, next) = modulation.advance(now, self.carrier, self.digipot.is_some());
            self.modulation = Some(next);
            match output {
                Some(ModulationOutput::Frequency(frequency)) => skip_rejected(self.load_frequency(frequency))?,
                Some(ModulationOutput::Phase(phase_deg)) => self.set_phase(phase_deg)?,
                Some(ModulationOutput::Amplitude(percent)) => skip_rejected(self.set_amplitude_percent(percent))?,
                None => {}
            }
        }

        Ok(())
    }

    /// Current output frequency as last loaded into FREQ0 (Hz).
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Last phase offset written, in degrees.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Frequencies last loaded by [`set_fsk_frequencies`](Ad9833::set_fsk_frequencies).
    pub fn fsk_frequencies(&self) -> Option<(f32, f32)> {
        self.fsk
    }

    /// `true` while FREQ1 drives the output.
    pub fn fsk_active_state(&self) -> bool {
        self.active_register == FrequencyRegister::Freq1
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the driver state.
    pub fn status(&self) -> Status {
        Status {
            waveform: self.waveform,
            frequency: self.frequency,
            phase: self.phase,
            sleeping: self.sleeping,
            sweeping: self.is_sweeping(),
            modulation: self.modulation.map(|m| m.kind()),
            fsk: self.fsk,
            fsk_active: self.fsk_active_state(),
            amplitude: self.digipot.as_ref().map(Mcp41010::amplitude),
        }
    }

    /// Log the current state at info level.
    pub fn dump_config(&self) {
        info!("AD9833:");
        info!("  Master Clock: {:.0} Hz", self.config.master_clock);
        info!("  Waveform: {}", self.waveform);
        info!("  Current Frequency: {:.2} Hz", self.frequency);
        info!("  Phase: {:.2} degrees", self.phase);
        info!("  Sleeping: {}", if self.sleeping { "YES" } else { "NO" });
        info!("  Sweep Active: {}", if self.is_sweeping() { "YES" } else { "NO" });
        match &self.modulation {
            Some(modulation) => info!("  Modulation: {}", modulation.kind()),
            None => info!("  Modulation: NONE"),
        }
        if let Some((freq0, freq1)) = self.fsk {
            info!("  FSK Frequencies: {:.2} Hz / {:.2} Hz", freq0, freq1);
        }
        if let Some(digipot) = &self.digipot {
            info!("  Current Amplitude: {:.1}%", digipot.amplitude());
        }
    }

    /// Write a raw 16-bit word to the device.
    ///
    /// This is a low-level interface. See the `set_*` methods for a high-level wrapper.
    /// The word is sent MSB first with chip-select held low for the whole transfer.
    pub fn write_register(&mut self, word: u16) -> Result<(), Error<SpiE, PinE>> {
        self.cs.set_low().map_err(Error::Pin)?;
        let transfer = self.spi.write(&word.to_be_bytes()).map_err(Error::Spi);
        self.cs.set_high().map_err(Error::Pin)?;
        transfer
    }

    fn load_frequency(&mut self, frequency: f32) -> Result<(), Error<SpiE, PinE>> {
        if !in_range(frequency) {
            warn!("Frequency out of range (0-12.5MHz): {:.2} Hz", frequency);
            return Err(Error::FrequencyOutOfRange(frequency));
        }

        let word = self.frequency_word(frequency);
        self.write_frequency_register(word, FrequencyRegister::Freq0, FrequencyRegister::Freq0)?;
        self.frequency = frequency;
        self.active_register = FrequencyRegister::Freq0;
        trace!("Set frequency to {:.2} Hz (word: {:#010X})", frequency, word);
        Ok(())
    }

    fn frequency_word(&self, frequency: f32) -> u32 {
        util::frequency_to_word(frequency, self.config.master_clock, util::FREQUENCY_RESOLUTION_BITS)
    }

    // B28 control write followed by LSB then MSB, never interleaved with other writes.
    // The address tag picks `target`; `active` is what FSELECT routes to the output meanwhile.
    fn write_frequency_register(
        &mut self,
        word: u32,
        target: FrequencyRegister,
        active: FrequencyRegister,
    ) -> Result<(), Error<SpiE, PinE>> {
        let (lsb, msb) = util::split_word28(word);
        self.write_control(self.waveform, self.sleeping, active)?;
        self.write_register(register::frequency_half(target, lsb))?;
        self.write_register(register::frequency_half(target, msb))
    }

    fn write_control(&mut self, waveform: Waveform, sleeping: bool, active: FrequencyRegister) -> Result<(), Error<SpiE, PinE>> {
        let mut flags = control::B28 | waveform.control_bits() | active.select_bits();
        if sleeping {
            flags |= control::SLEEP12;
        }
        self.write_register(register::control_word(flags))
    }
}

fn in_range(frequency: f32) -> bool {
    (0.0..=MAX_FREQUENCY).contains(&frequency)
}

fn skip_rejected<SpiE, PinE>(result: Result<(), Error<SpiE, PinE>>) -> Result<(), Error<SpiE, PinE>> {
    match result {
        Err(e) if e.is_rejected() => Ok(()),
        other => other,
    }
}

/// Driver state as reported by [`Ad9833::status`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Status {
    pub waveform: Waveform,
    pub frequency: f32,
    pub phase: f32,
    pub sleeping: bool,
    pub sweeping: bool,
    pub modulation: Option<ModulationKind>,
    pub fsk: Option<(f32, f32)>,
    pub fsk_active: bool,
    /// `None` without a potentiometer.
    pub amplitude: Option<f32>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AD9833:")?;
        writeln!(f, "  Waveform: {}", self.waveform)?;
        writeln!(f, "  Frequency: {:.2} Hz", self.frequency)?;
        writeln!(f, "  Phase: {:.2} degrees", self.phase)?;
        writeln!(f, "  Sleeping: {}", if self.sleeping { "YES" } else { "NO" })?;
        writeln!(f, "  Sweep Active: {}", if self.sweeping { "YES" } else { "NO" })?;
        match self.modulation {
            Some(kind) => writeln!(f, "  Modulation: {}", kind)?,
            None => writeln!(f, "  Modulation: NONE")?,
        }
        if let Some((freq0, freq1)) = self.fsk {
            writeln!(
                f,
                "  FSK: {:.2} Hz / {:.2} Hz (active: FREQ{})",
                freq0,
                freq1,
                self.fsk_active as u8
            )?;
        }
        if let Some(amplitude) = self.amplitude {
            writeln!(f, "  Amplitude: {:.1}%", amplitude)?;
        }
        Ok(())
    }
}

/// Marker types for different modes.
///
/// These types are used for the `Mode` type parameter of [`Ad9833`].
pub mod mode {
    /// Initial mode. No communication has happened.
    pub struct Init;
    /// Device is reset and configured. Updates can happen.
    pub struct Ready;
}
