//! Low-rate modulation of frequency, phase or amplitude.
//!
//! A [`Modulation`] carries its own sine oscillator. Each call to
//! [`Modulation::advance`] moves the oscillator forward by the time elapsed
//! since the previous call and derives the value to apply to the chip.

use core::f32::consts::TAU;
use core::fmt;

/// Which output parameter is modulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModulationKind {
    /// Amplitude modulation.
    Am,
    /// Frequency modulation around the current carrier.
    Fm,
    /// Frequency shift keying between the two frequency registers.
    ///
    /// Switching is driven by [`Ad9833::set_fsk_active_state`](crate::Ad9833::set_fsk_active_state);
    /// the oscillator produces no output for this kind.
    Fsk,
}

impl fmt::Display for ModulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModulationKind::Am => write!(f, "AM"),
            ModulationKind::Fm => write!(f, "FM"),
            ModulationKind::Fsk => write!(f, "FSK"),
        }
    }
}

/// Value to push to the chip after an oscillator step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModulationOutput {
    /// New amplitude in percent, for the digital potentiometer.
    Amplitude(f32),
    /// New phase offset in degrees.
    Phase(f32),
    /// New output frequency in Hz.
    Frequency(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modulation {
    kind: ModulationKind,
    rate_hz: f32,
    depth: f32,
    last_update: u32,
    phase: f32,
}

impl Modulation {
    /// Starts a modulation at `now` (milliseconds) with the oscillator at phase zero.
    ///
    /// `depth` is clamped to $[0, 1]$; NaN is treated as zero. `rate_hz` must be
    /// finite, otherwise the oscillator phase becomes NaN and stays there.
    pub fn new(kind: ModulationKind, rate_hz: f32, depth: f32, now: u32) -> Self {
        let depth = if depth.is_nan() { 0.0 } else { depth.clamp(0.0, 1.0) };
        Self { kind, rate_hz, depth, last_update: now, phase: 0.0 }
    }

    pub fn kind(&self) -> ModulationKind {
        self.kind
    }

    pub fn rate(&self) -> f32 {
        self.rate_hz
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Oscillator phase in radians, in $[0, 2\pi)$.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Steps the oscillator to `now` and computes the output.
    ///
    /// `carrier_hz` is the carrier FM deviates around. `amplitude_control`
    /// tells whether a digital potentiometer is attached: without one, AM is
    /// approximated by modulating the phase by up to ±180° times the depth.
    pub fn advance(&self, now: u32, carrier_hz: f32, amplitude_control: bool) -> (Option<ModulationOutput>, Modulation) {
        let dt = now.wrapping_sub(self.last_update) as f32 / 1000.0;

        let mut phase = libm::fmodf(self.phase + TAU * self.rate_hz * dt, TAU);
        if phase < 0.0 {
            phase += TAU;
        }
        let next = Modulation { last_update: now, phase, ..*self };

        let signal = libm::sinf(phase);
        let output = match self.kind {
            ModulationKind::Am if amplitude_control => {
                Some(ModulationOutput::Amplitude(50.0 + 50.0 * self.depth * signal))
            }
            ModulationKind::Am => Some(ModulationOutput::Phase(signal * self.depth * 180.0)),
            ModulationKind::Fm => {
                Some(ModulationOutput::Frequency(carrier_hz + carrier_hz * self.depth * signal))
            }
            ModulationKind::Fsk => None,
        };

        (output, next)
    }
}
