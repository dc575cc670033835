use thiserror::Error;

/// Errors reported by the driver.
///
/// `Spi` and `Pin` wrap faults of the underlying hardware and are the only
/// variants a caller typically has to act on. The remaining variants report
/// requests that were refused without touching the chip: the driver state is
/// exactly what it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error<SpiE, PinE> {
    /// The SPI transfer failed.
    #[error("SPI transfer failed: {0:?}")]
    Spi(SpiE),
    /// Driving a chip-select line failed.
    #[error("chip-select pin failed: {0:?}")]
    Pin(PinE),
    /// Requested frequency is outside 0 to 12.5 MHz.
    #[error("frequency out of range (0-12.5MHz): {0:.2} Hz")]
    FrequencyOutOfRange(f32),
    /// One or both sweep endpoints are outside 0 to 12.5 MHz.
    #[error("invalid sweep frequency range: {start:.2} Hz -> {end:.2} Hz")]
    SweepOutOfRange { start: f32, end: f32 },
    /// Sweep duration must be a positive number of milliseconds.
    #[error("invalid sweep duration: {0} ms")]
    InvalidSweepDuration(f32),
    /// Modulation rate must be a finite number of hertz.
    #[error("invalid modulation rate: {0} Hz")]
    InvalidModulationRate(f32),
    /// An amplitude operation was requested but no digital potentiometer is attached.
    #[error("digital potentiometer not configured")]
    AmplitudeNotConfigured,
}

impl<SpiE, PinE> Error<SpiE, PinE> {
    /// `true` for errors that mean the request was refused, as opposed to a bus fault.
    pub fn is_rejected(&self) -> bool {
        !matches!(self, Error::Spi(_) | Error::Pin(_))
    }
}
