//! Utility functions
//!
//! Conversions between physical units and AD9833 register payloads. Nothing
//! in here touches the bus, so every function is a plain computation over its
//! arguments.
//!
//! Inputs are expected to be validated by the caller: the driver rejects
//! out-of-range frequencies before they ever reach [`frequency_to_word`].

/// Width of the AD9833 frequency registers, in bits.
pub const FREQUENCY_RESOLUTION_BITS: u8 = 28;

/// Number of steps in one full turn of the phase register.
pub const PHASE_STEPS: u16 = 4096;

const PAYLOAD_14_MASK: u32 = 0x3FFF;

/// Turns a frequency (in Hz) into a tuning word.
///
/// The result is $ \lfloor f \cdot 2^{bits} / f_{MCLK} \rfloor $. Truncation
/// matches the way the phase accumulator steps, so the produced output is
/// never above the requested frequency.
///
/// Example:
/// ```
/// # use ad9833::util::frequency_to_word;
/// assert_eq!(0x0000_0000, frequency_to_word(0.0, 25e6, 28));
/// assert_eq!(0x0800_0000, frequency_to_word(12.5e6, 25e6, 28));
/// ```
pub fn frequency_to_word(frequency: f32, master_clock: f32, resolution_bits: u8) -> u32 {
    let steps = (1u64 << resolution_bits) as f64;
    (frequency as f64 * steps / master_clock as f64) as u32
}

/// Inverse of [`frequency_to_word`]: the frequency actually produced by `word`.
pub fn word_to_frequency(word: u32, master_clock: f32, resolution_bits: u8) -> f32 {
    let steps = (1u64 << resolution_bits) as f64;
    (word as f64 * master_clock as f64 / steps) as f32
}

/// Turns a phase offset (in degrees) into a 12-bit phase register payload.
///
/// Phase is cyclic, so any input is accepted and wrapped into $[0, 360)$
/// first. Negative angles wrap to their positive equivalent.
///
/// ```
/// # use ad9833::util::phase_to_word;
/// assert_eq!(1024, phase_to_word(90.0));
/// assert_eq!(phase_to_word(-90.0), phase_to_word(270.0));
/// ```
pub fn phase_to_word(phase_deg: f32) -> u16 {
    let mut wrapped = phase_deg as f64 % 360.0;
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    ((wrapped / 360.0 * PHASE_STEPS as f64) as u16) % PHASE_STEPS
}

/// Splits a 28-bit tuning word into its `(lsb, msb)` 14-bit halves.
///
/// Bits above 28 are dropped.
pub fn split_word28(word: u32) -> (u16, u16) {
    let lsb = word & PAYLOAD_14_MASK;
    let msb = (word >> 14) & PAYLOAD_14_MASK;
    (lsb as u16, msb as u16)
}

/// Maps an amplitude in percent onto an 8-bit wiper code.
///
/// The input is clamped to $[0, 100]$ and rounded to the nearest code.
pub fn percent_to_wiper(percent: f32) -> u8 {
    let percent = percent.clamp(0.0, 100.0);
    libm::roundf(percent / 100.0 * 255.0) as u8
}

/// Maps an 8-bit wiper code back onto a percentage.
pub fn wiper_to_percent(code: u8) -> f32 {
    code as f32 / 255.0 * 100.0
}
