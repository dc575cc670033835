//! Drives the public control surface the way a host main loop would.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use ad9833::{Ad9833, Error, ModulationKind, SweepCurve, Waveform};
use approx::assert_abs_diff_eq;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

/// Records every 16-bit word sent while the AD9833 chip-select is low.
#[derive(Clone, Default)]
struct Bus {
    selected: Rc<Cell<bool>>,
    words: Rc<RefCell<Vec<u16>>>,
    digipot_bytes: Rc<RefCell<Vec<u8>>>,
}

struct Spi(Bus);

impl Write<u8> for Spi {
    type Error = Infallible;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        if self.0.selected.get() {
            self.0.words.borrow_mut().push(u16::from_be_bytes([bytes[0], bytes[1]]));
        } else {
            self.0.digipot_bytes.borrow_mut().extend_from_slice(bytes);
        }
        Ok(())
    }
}

struct ChipSelect(Bus);

impl OutputPin for ChipSelect {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.selected.set(true);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.selected.set(false);
        Ok(())
    }
}

struct DigipotSelect;

impl OutputPin for DigipotSelect {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

struct Delay;

impl DelayUs<u32> for Delay {
    fn delay_us(&mut self, _us: u32) {}
}

impl DelayMs<u32> for Delay {
    fn delay_ms(&mut self, _ms: u32) {}
}

#[test]
fn sweep_then_modulate_then_stop() {
    let bus = Bus::default();
    let now = Rc::new(Cell::new(0u32));
    let clock = {
        let now = now.clone();
        move || now.get()
    };

    let mut ad9833 = Ad9833::new(Spi(bus.clone()), ChipSelect(bus.clone()), Delay, clock)
        .init()
        .unwrap();
    assert_eq!(&[0x0100, 0x0000], &bus.words.borrow()[..2]);

    ad9833.set_waveform(Waveform::Square).unwrap();
    ad9833
        .start_sweep(100.0, 1000.0, 1000.0, SweepCurve::Logarithmic)
        .unwrap();

    now.set(500);
    ad9833.tick().unwrap();
    assert_abs_diff_eq!(316.23, ad9833.frequency(), epsilon = 0.01);
    // the square wave bits survive frequency loads
    assert_eq!(0x2028, bus.words.borrow()[bus.words.borrow().len() - 3]);

    ad9833.stop_sweep();
    ad9833.set_frequency(1000.0).unwrap();
    ad9833.set_modulation(ModulationKind::Fm, 1.0, 0.1).unwrap();

    now.set(750);
    ad9833.tick().unwrap();
    assert_abs_diff_eq!(1100.0, ad9833.frequency(), epsilon = 0.01);

    ad9833.stop_modulation();
    assert!(!ad9833.is_sweeping());
    assert!(!ad9833.is_modulating());
    assert_abs_diff_eq!(1100.0, ad9833.frequency(), epsilon = 0.01);
}

#[test]
fn rejected_requests_keep_running() {
    let bus = Bus::default();
    let mut ad9833 = Ad9833::new(Spi(bus.clone()), ChipSelect(bus.clone()), Delay, || 0u32)
        .init()
        .unwrap();
    let written = bus.words.borrow().len();

    let err = ad9833.set_frequency(13_000_000.0).unwrap_err();
    assert!(err.is_rejected());
    assert_eq!(Err(Error::AmplitudeNotConfigured), ad9833.set_amplitude_percent(10.0));
    assert_eq!(0.0, ad9833.get_amplitude_percent());
    assert_eq!(written, bus.words.borrow().len());

    ad9833.set_frequency(2000.0).unwrap();
    assert_eq!(2000.0, ad9833.frequency());
}

#[test]
fn digipot_tracks_amplitude() {
    let bus = Bus::default();
    let mut ad9833 = Ad9833::new(Spi(bus.clone()), ChipSelect(bus.clone()), Delay, || 0u32)
        .with_digipot(DigipotSelect)
        .init()
        .unwrap();

    ad9833.set_amplitude_percent(50.0).unwrap();
    assert_abs_diff_eq!(50.2, ad9833.get_amplitude_percent(), epsilon = 0.01);
    assert_eq!(Some(128), ad9833.amplitude_raw());
    assert_eq!(&[0x11, 128], &bus.digipot_bytes.borrow()[..2]);

    let status = ad9833.status();
    assert_eq!(Waveform::Sine, status.waveform);
    assert!(status.amplitude.is_some());
}
