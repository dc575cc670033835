//! AD9833 register map.
//!
//! Every write to the AD9833 is a single 16-bit word. The top bits select the
//! target register, the remaining bits carry the payload:
//!
//! | D15 D14 | D13 | D12..D0            | Target                 |
//! |---------|-----|--------------------|------------------------|
//! |  0   0  |  -  | control flags      | control register       |
//! |  0   1  |  14-bit payload          | FREQ0 (one half)       |
//! |  1   0  |  14-bit payload          | FREQ1 (one half)       |
//! |  1   1  |  0  | 12-bit payload     | PHASE0                 |
//! |  1   1  |  1  | 12-bit payload     | PHASE1                 |
//!
//! Payloads are always masked to their field width before the address tag is
//! applied, so an oversized payload can never redirect a write.

/// Address tag of the control register.
pub const CONTROL: u16 = 0x0000;
/// Address tag of frequency register 0.
pub const FREQ0: u16 = 0x4000;
/// Address tag of frequency register 1.
pub const FREQ1: u16 = 0x8000;
/// Address tag of phase register 0.
pub const PHASE0: u16 = 0xC000;
/// Address tag of phase register 1.
pub const PHASE1: u16 = 0xE000;

const FREQUENCY_PAYLOAD_MASK: u16 = 0x3FFF;
const PHASE_PAYLOAD_MASK: u16 = 0x0FFF;

/// Control register flags.
pub mod control {
    /// Load frequency registers as two consecutive 14-bit writes.
    pub const B28: u16 = 0x2000;
    /// With B28 clear: selects which half a frequency write targets.
    pub const HLB: u16 = 0x1000;
    /// Output is driven from FREQ1 instead of FREQ0.
    pub const FSELECT: u16 = 0x0800;
    /// Output phase is taken from PHASE1 instead of PHASE0.
    pub const PSELECT: u16 = 0x0400;
    /// Holds the phase accumulator at zero.
    pub const RESET: u16 = 0x0100;
    /// Disables the internal MCLK.
    pub const SLEEP1: u16 = 0x0080;
    /// Powers down the on-chip DAC.
    pub const SLEEP12: u16 = 0x0040;
    /// Routes the comparator/MSB to VOUT instead of the DAC.
    pub const OPBITEN: u16 = 0x0020;
    /// MSB divider select, used together with OPBITEN.
    pub const DIV2: u16 = 0x0008;
    /// Bypass the sine ROM (triangle output).
    pub const MODE: u16 = 0x0002;
}

/// One of the two frequency registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrequencyRegister {
    Freq0,
    Freq1,
}

impl FrequencyRegister {
    /// Address tag selecting this register in a data word.
    pub fn address(self) -> u16 {
        match self {
            FrequencyRegister::Freq0 => FREQ0,
            FrequencyRegister::Freq1 => FREQ1,
        }
    }

    /// Control bits routing this register to the output.
    pub fn select_bits(self) -> u16 {
        match self {
            FrequencyRegister::Freq0 => 0,
            FrequencyRegister::Freq1 => control::FSELECT,
        }
    }
}

/// Builds a write of one 14-bit half into the given frequency register.
pub fn frequency_half(register: FrequencyRegister, payload: u16) -> u16 {
    register.address() | (payload & FREQUENCY_PAYLOAD_MASK)
}

/// Builds a write of a 12-bit payload into PHASE0.
pub fn phase0(payload: u16) -> u16 {
    PHASE0 | (payload & PHASE_PAYLOAD_MASK)
}

/// Builds a control register write. Only the flag bits are kept.
pub fn control_word(flags: u16) -> u16 {
    CONTROL | (flags & 0x3FFF)
}
