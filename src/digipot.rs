//! MCP41010 digital potentiometer used as an amplitude control element.
//!
//! The potentiometer sits behind the AD9833 output and shares its SPI bus,
//! but has a chip-select line of its own. It is write-only: the wiper
//! position reported by [`Mcp41010::wiper`] is the last value written, never
//! read back from the device.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

use crate::error::Error;
use crate::util;

/// Write data to potentiometer 0.
const CMD_WRITE: u8 = 0x11;
/// Shut down potentiometer 0.
const CMD_SHUTDOWN: u8 = 0x21;

/// Wiper position used after setup.
pub const MID_SCALE: u8 = 128;

/// Chip-select settle time around each transfer, in microseconds.
const CS_SETTLE_US: u32 = 1;

/// Connection to an MCP41010.
///
/// Holds only the chip-select line; the bus and delay provider are borrowed
/// from the AD9833 driver for the duration of each transfer.
pub struct Mcp41010<Cs> {
    cs: Cs,
    wiper: u8,
}

impl<Cs, PinE> Mcp41010<Cs>
where
    Cs: OutputPin<Error = PinE>,
{
    pub fn new(cs: Cs) -> Self {
        Self { cs, wiper: MID_SCALE }
    }

    /// Drives chip-select to idle and moves the wiper to mid-scale.
    pub fn setup<Spi, D, SpiE>(&mut self, spi: &mut Spi, delay: &mut D) -> Result<(), Error<SpiE, PinE>>
    where
        Spi: Write<u8, Error = SpiE>,
        D: DelayUs<u32>,
    {
        self.cs.set_high().map_err(Error::Pin)?;
        self.set_wiper(spi, delay, MID_SCALE)
    }

    /// Moves the wiper to `code` (0 = terminal B, 255 = terminal A).
    pub fn set_wiper<Spi, D, SpiE>(&mut self, spi: &mut Spi, delay: &mut D, code: u8) -> Result<(), Error<SpiE, PinE>>
    where
        Spi: Write<u8, Error = SpiE>,
        D: DelayUs<u32>,
    {
        self.command(spi, delay, CMD_WRITE, code)?;
        self.wiper = code;
        Ok(())
    }

    /// Sets the wiper from an amplitude in percent. Out of range values are clamped.
    pub fn set_amplitude<Spi, D, SpiE>(&mut self, spi: &mut Spi, delay: &mut D, percent: f32) -> Result<(), Error<SpiE, PinE>>
    where
        Spi: Write<u8, Error = SpiE>,
        D: DelayUs<u32>,
    {
        self.set_wiper(spi, delay, util::percent_to_wiper(percent))
    }

    /// Disconnects terminal A and shorts the wiper to terminal B.
    ///
    /// The wiper register is kept by the device, so the tracked code is left alone.
    pub fn shutdown<Spi, D, SpiE>(&mut self, spi: &mut Spi, delay: &mut D) -> Result<(), Error<SpiE, PinE>>
    where
        Spi: Write<u8, Error = SpiE>,
        D: DelayUs<u32>,
    {
        // the data byte is a don't-care for the shutdown command
        self.command(spi, delay, CMD_SHUTDOWN, 0)
    }

    /// Last wiper code written.
    pub fn wiper(&self) -> u8 {
        self.wiper
    }

    /// Last wiper code written, as a percentage of full scale.
    pub fn amplitude(&self) -> f32 {
        util::wiper_to_percent(self.wiper)
    }

    fn command<Spi, D, SpiE>(&mut self, spi: &mut Spi, delay: &mut D, command: u8, data: u8) -> Result<(), Error<SpiE, PinE>>
    where
        Spi: Write<u8, Error = SpiE>,
        D: DelayUs<u32>,
    {
        self.cs.set_low().map_err(Error::Pin)?;
        delay.delay_us(CS_SETTLE_US);

        let transfer = spi
            .write(&[command])
            .and_then(|_| spi.write(&[data]))
            .map_err(Error::Spi);

        delay.delay_us(CS_SETTLE_US);
        // release the line even if the transfer failed
        self.cs.set_high().map_err(Error::Pin)?;
        transfer
    }
}
