//! Periodic frequency sweeps.
//!
//! A [`Sweep`] describes a ramp from a start to an end frequency over a fixed
//! duration. The ramp repeats forever: once the duration has elapsed the
//! sweep restarts from the start frequency.
//!
//! Nothing in here reads a clock. [`Sweep::compute`] takes the current time
//! and returns the frequency together with the (possibly restarted) sweep,
//! which the driver stores for the next tick.

use core::fmt;

/// Shape of the ramp between start and end frequency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SweepCurve {
    /// Equal steps in Hz per unit of time.
    #[default]
    Linear,
    /// Equal steps in decades per unit of time.
    ///
    /// Both endpoints must be strictly positive. With a zero or negative
    /// endpoint the computed frequency is meaningless (zero, infinite or NaN)
    /// and will be refused by the driver's range check.
    Logarithmic,
}

impl fmt::Display for SweepCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepCurve::Linear => write!(f, "LINEAR"),
            SweepCurve::Logarithmic => write!(f, "LOGARITHMIC"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    start_hz: f32,
    end_hz: f32,
    duration_ms: f32,
    curve: SweepCurve,
    started_at: u32,
}

impl Sweep {
    /// Describes a sweep starting at `now` (milliseconds).
    ///
    /// Endpoints and duration are taken as given; range validation happens in
    /// [`Ad9833::start_sweep`](crate::Ad9833::start_sweep).
    pub fn new(start_hz: f32, end_hz: f32, duration_ms: f32, curve: SweepCurve, now: u32) -> Self {
        Self { start_hz, end_hz, duration_ms, curve, started_at: now }
    }

    pub fn start_frequency(&self) -> f32 {
        self.start_hz
    }

    pub fn end_frequency(&self) -> f32 {
        self.end_hz
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn curve(&self) -> SweepCurve {
        self.curve
    }

    /// Timestamp at which the current cycle began.
    pub fn started_at(&self) -> u32 {
        self.started_at
    }

    /// Computes the frequency at `now`.
    ///
    /// Returns the frequency and the sweep to use from here on. When a full
    /// duration has elapsed the returned sweep starts a new cycle at `now`
    /// and the frequency is the start frequency again.
    pub fn compute(&self, now: u32) -> (f32, Sweep) {
        let mut next = *self;
        let elapsed = now.wrapping_sub(self.started_at);
        let mut progress = elapsed as f32 / self.duration_ms;

        if progress >= 1.0 {
            next.started_at = now;
            progress = 0.0;
        }

        (self.interpolate(progress), next)
    }

    fn interpolate(&self, progress: f32) -> f32 {
        match self.curve {
            SweepCurve::Linear => self.start_hz + (self.end_hz - self.start_hz) * progress,
            SweepCurve::Logarithmic => {
                let log_start = libm::log10f(self.start_hz);
                let log_end = libm::log10f(self.end_hz);
                libm::powf(10.0, log_start + (log_end - log_start) * progress)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    const T0: u32 = 10_000;

    #[rstest]
    #[case(0, 1000.0)]
    #[case(250, 3250.0)]
    #[case(500, 5500.0)]
    #[case(999, 9991.0)]
    fn linear_ramp(#[case] offset: u32, #[case] expected: f32) {
        let sweep = Sweep::new(1000.0, 10_000.0, 1000.0, SweepCurve::Linear, T0);
        let (freq, next) = sweep.compute(T0 + offset);
        assert_abs_diff_eq!(expected, freq, epsilon = 0.01);
        assert_eq!(sweep, next);
    }

    #[test]
    fn linear_ramp_downwards() {
        let sweep = Sweep::new(10_000.0, 1000.0, 2000.0, SweepCurve::Linear, T0);
        assert_abs_diff_eq!(5500.0, sweep.compute(T0 + 1000).0, epsilon = 0.01);
    }

    #[test]
    fn loops_after_duration() {
        let sweep = Sweep::new(1000.0, 10_000.0, 1000.0, SweepCurve::Linear, T0);
        let (freq, next) = sweep.compute(T0 + 1100);

        assert_abs_diff_eq!(1000.0, freq);
        assert_eq!(T0 + 1100, next.started_at());

        let (freq, _) = next.compute(T0 + 1600);
        assert_abs_diff_eq!(5500.0, freq, epsilon = 0.01);
    }

    #[test]
    fn loops_at_exact_duration() {
        let sweep = Sweep::new(1000.0, 10_000.0, 1000.0, SweepCurve::Linear, T0);
        let (freq, next) = sweep.compute(T0 + 1000);
        assert_abs_diff_eq!(1000.0, freq);
        assert_eq!(T0 + 1000, next.started_at());
    }

    #[test]
    fn logarithmic_midpoint_is_geometric_mean() {
        let sweep = Sweep::new(100.0, 1000.0, 1000.0, SweepCurve::Logarithmic, T0);
        let (freq, _) = sweep.compute(T0 + 500);
        assert_abs_diff_eq!(316.227_77, freq, epsilon = 0.01);
    }

    #[test]
    fn logarithmic_endpoints() {
        let sweep = Sweep::new(100.0, 10_000.0, 1000.0, SweepCurve::Logarithmic, T0);
        assert_abs_diff_eq!(100.0, sweep.compute(T0).0, epsilon = 0.01);
        assert_abs_diff_eq!(1000.0, sweep.compute(T0 + 500).0, epsilon = 0.1);
    }

    #[test]
    fn survives_clock_wrap() {
        let start = u32::MAX - 99;
        let sweep = Sweep::new(0.0, 1000.0, 1000.0, SweepCurve::Linear, start);
        let (freq, next) = sweep.compute(start.wrapping_add(500));
        assert_abs_diff_eq!(500.0, freq, epsilon = 0.01);
        assert_eq!(start, next.started_at());
    }
}
