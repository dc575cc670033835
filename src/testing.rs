//! Recording doubles for the embedded-hal traits used by the driver.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

pub const AD9833_CS: u8 = 0;
pub const DIGIPOT_CS: u8 = 1;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Low(u8),
    High(u8),
    Write(Vec<u8>),
    DelayUs(u32),
    DelayMs(u32),
}

/// Shared, ordered record of everything the doubles saw.
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// 16-bit words written while the AD9833 was selected.
    pub fn words(&self) -> Vec<u16> {
        self.bytes_while(AD9833_CS)
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect()
    }

    /// Bytes written while the potentiometer was selected.
    pub fn digipot_bytes(&self) -> Vec<u8> {
        self.bytes_while(DIGIPOT_CS)
    }

    fn bytes_while(&self, cs: u8) -> Vec<u8> {
        let mut selected = false;
        let mut bytes = Vec::new();
        for event in self.0.borrow().iter() {
            match event {
                Event::Low(id) if *id == cs => selected = true,
                Event::High(id) if *id == cs => selected = false,
                Event::Write(data) if selected => bytes.extend_from_slice(data),
                _ => {}
            }
        }
        bytes
    }
}

pub struct MockSpi {
    log: Log,
    fail: bool,
}

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone(), fail: false }
    }

    /// Makes the next write fail.
    pub fn fail_next(&mut self) {
        self.fail = true;
    }
}

impl Write<u8> for MockSpi {
    type Error = ();

    fn write(&mut self, words: &[u8]) -> Result<(), ()> {
        if core::mem::take(&mut self.fail) {
            return Err(());
        }
        self.log.push(Event::Write(words.to_vec()));
        Ok(())
    }
}

pub struct MockPin {
    log: Log,
    id: u8,
}

impl MockPin {
    pub fn new(log: &Log, id: u8) -> Self {
        Self { log: log.clone(), id }
    }
}

impl OutputPin for MockPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.push(Event::Low(self.id));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.push(Event::High(self.id));
        Ok(())
    }
}

pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayUs<u32> for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs(us));
    }
}

impl DelayMs<u32> for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}

/// Millisecond clock the test moves by hand.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<u32>>);

impl ManualClock {
    pub fn set(&self, now: u32) {
        self.0.set(now);
    }

    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
}

impl crate::Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}
