//! Port wiring of the TA-AX44 control board.
//!
//! The uCOM-4 MCU talks to its peripherals exclusively through 4-bit ports. Port A and B are
//! inputs, C through I are outputs:
//!
//! | Port | Role                                                            |
//! |------|-----------------------------------------------------------------|
//! | A    | Power key (bit 1), NVRAM serial output (bit 2)                  |
//! | B    | Key matrix return lines, row selected by the grid register      |
//! | C, D | VFD plate nibbles 0 and 1                                       |
//! | E    | Serial bus shared by the ASP and the NVRAM, relay drive         |
//! | F    | VFD plate lines 8..10 and grid line E                           |
//! | G    | VFD grid lines A..D, F                                          |
//! | H    | NVRAM address latch                                             |
//! | I    | NVRAM mode latch                                                |
use bilge::prelude::*;
use intbits::Bits;
use log::debug;
use log::info;
use log::trace;

use crate::common::bus::PortBus;
use crate::common::util::BoundedQueue;
use crate::components::asp::AspReceiver;
use crate::components::front_panel::FrontPanel;
use crate::components::front_panel::Key;
use crate::components::nvram::Nvram;
use crate::components::nvram::NvramStore;
use crate::components::vfd::DisplayComposer;
use crate::components::vfd::DisplayRegisters;

/// Number of received ASP frames kept until they are taken.
pub const ASP_FRAME_QUEUE_SIZE: usize = 64;

const NUM_PORTS: usize = 16;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
    I = 8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortRole {
    PowerAndNvramOutput,
    KeyMatrix,
    PlateNibble(usize),
    SerialBus,
    PlateGrid,
    Grid,
    NvramAddress,
    NvramMode,
}

impl Port {
    pub fn role(self) -> PortRole {
        match self {
            Port::A => PortRole::PowerAndNvramOutput,
            Port::B => PortRole::KeyMatrix,
            Port::C => PortRole::PlateNibble(0),
            Port::D => PortRole::PlateNibble(1),
            Port::E => PortRole::SerialBus,
            Port::F => PortRole::PlateGrid,
            Port::G => PortRole::Grid,
            Port::H => PortRole::NvramAddress,
            Port::I => PortRole::NvramMode,
        }
    }
}

/// Layout of port E.
///
/// ```text
/// 3  bit  0
/// ---------
/// RCDS
/// ||||
/// |||+- ASP strobe
/// ||+-- Serial data (ASP and NVRAM)
/// |+--- Serial clock (ASP and NVRAM)
/// +---- Relay drive
/// ```
#[bitsize(4)]
#[derive(Clone, Copy, DebugBits, FromBits, PartialEq)]
struct SerialLines {
    strobe: bool,
    data: bool,
    clock: bool,
    relay_drive: bool,
}

/// All peripheral state of one TA-AX44, addressed through the MCU ports.
pub struct Taax44Bus<ComposerT: DisplayComposer> {
    pub nvram: Nvram,
    pub asp: AspReceiver,
    pub display: DisplayRegisters,
    pub composer: ComposerT,
    pub front_panel: FrontPanel,
    asp_frames: BoundedQueue<u32, ASP_FRAME_QUEUE_SIZE>,
    relay_drive_active: bool,
    /// Last value written to each port.
    port_out: [u8; NUM_PORTS],
}

impl<ComposerT: DisplayComposer> Taax44Bus<ComposerT> {
    pub fn new(store: Box<dyn NvramStore>, composer: ComposerT) -> Self {
        Self {
            nvram: Nvram::new(store),
            asp: AspReceiver::new(),
            display: DisplayRegisters::new(),
            composer,
            front_panel: FrontPanel::new(),
            asp_frames: BoundedQueue::default(),
            relay_drive_active: false,
            port_out: [0; NUM_PORTS],
        }
    }

    /// Returns all ASP frames received since the last call, oldest first.
    pub fn take_asp_frames(&mut self) -> Vec<u32> {
        self.asp_frames.drain()
    }

    pub fn relay_drive_active(&self) -> bool {
        self.relay_drive_active
    }

    pub fn port_latch(&self, port: Port) -> u8 {
        self.port_out[port as usize]
    }

    pub fn bus_peek(&self, port: u8) -> Option<u8> {
        let index = port.bits(0..4);
        match Port::from_repr(index).map(Port::role) {
            Some(PortRole::PowerAndNvramOutput) => {
                Some(self.input_a(self.nvram.peek_output().unwrap_or(false)))
            }
            Some(PortRole::KeyMatrix) => Some(self.front_panel.scan(self.display.grid)),
            Some(_) => Some(self.port_out[index as usize]),
            None => None,
        }
    }

    pub fn bus_read(&mut self, port: u8) -> u8 {
        let index = port.bits(0..4);
        let value = match Port::from_repr(index).map(Port::role) {
            Some(PortRole::PowerAndNvramOutput) => {
                let nvram_bit = self.nvram.shift_out();
                self.input_a(nvram_bit)
            }
            Some(PortRole::KeyMatrix) => self.front_panel.scan(self.display.grid),
            _ => 0,
        };
        trace!(target: "ports", "read {} = {:X}", index, value);
        value.bits(0..4)
    }

    pub fn bus_write(&mut self, port: u8, value: u8) {
        let index = port.bits(0..4);
        let mut value = value.bits(0..4);
        trace!(target: "ports", "write {} = {:X}", index, value);

        match Port::from_repr(index).map(Port::role) {
            Some(PortRole::PlateNibble(nibble)) => {
                self.display.write_plate_nibble(nibble, value);
                self.update_display();
            }
            Some(PortRole::PlateGrid) => {
                self.display.write_plate_grid(value);
                self.update_display();
            }
            Some(PortRole::Grid) => {
                self.display.write_grid(value);
                self.update_display();
            }
            Some(PortRole::SerialBus) => self.write_serial_bus(value),
            Some(PortRole::NvramAddress) => self.nvram.set_address(value),
            Some(PortRole::NvramMode) => {
                value = value.bits(0..3);
                self.nvram.set_mode(value);
            }
            Some(PortRole::PowerAndNvramOutput) | Some(PortRole::KeyMatrix) | None => {
                debug!(target: "ports", "Write to unknown port: {}", index);
            }
        }
        self.port_out[index as usize] = value;
    }

    fn input_a(&self, nvram_bit: bool) -> u8 {
        ((self.front_panel.is_pressed(Key::Power) as u8) << 1) | ((nvram_bit as u8) << 2)
    }

    fn write_serial_bus(&mut self, value: u8) {
        let lines = SerialLines::from(u4::new(value));

        if lines.relay_drive() && !self.relay_drive_active {
            info!(target: "ports", "Relay drive activated");
            self.relay_drive_active = true;
        }

        self.asp.sample(lines.strobe(), lines.clock(), lines.data());
        if let Some(frame) = self.asp.take_frame() {
            info!(target: "asp", "ASP data received {:08X}", frame);
            self.asp_frames.push(frame);
        }

        self.nvram.clock_in(lines.clock(), lines.data());
    }

    fn update_display(&mut self) {
        self.composer.update(&self.display.frame());
    }
}

impl<ComposerT: DisplayComposer> PortBus for Taax44Bus<ComposerT> {
    fn peek(&self, port: u8) -> Option<u8> {
        self.bus_peek(port)
    }

    fn read(&mut self, port: u8) -> u8 {
        self.bus_read(port)
    }

    fn write(&mut self, port: u8, value: u8) {
        self.bus_write(port, value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::nvram::MemoryStore;
    use crate::components::nvram::NvramMode;
    use crate::components::vfd::DisplayMatrix;

    fn bus() -> Taax44Bus<DisplayMatrix> {
        Taax44Bus::new(Box::new(MemoryStore::new()), DisplayMatrix::new())
    }

    #[test]
    fn test_port_roles() {
        assert_eq!(Port::C.role(), PortRole::PlateNibble(0));
        assert_eq!(Port::D.role(), PortRole::PlateNibble(1));
        assert_eq!(Port::from_repr(8), Some(Port::I));
        assert_eq!(Port::from_repr(9), None);
        assert_eq!("g".parse::<Port>().unwrap(), Port::G);
    }

    #[test]
    fn test_serial_lines_layout() {
        let lines = SerialLines::from(u4::new(0b1010));
        assert!(!lines.strobe());
        assert!(lines.data());
        assert!(!lines.clock());
        assert!(lines.relay_drive());
    }

    #[test]
    fn test_mode_port_masks_three_bits() {
        let mut bus = bus();
        bus.bus_write(Port::I as u8, 0b1110);
        assert_eq!(bus.nvram.mode(), Some(NvramMode::Read));
        assert_eq!(bus.port_latch(Port::I), 0b110);
    }

    #[test]
    fn test_values_are_masked_to_a_nibble() {
        let mut bus = bus();
        bus.bus_write(0x10 | Port::H as u8, 0xF3);
        assert_eq!(bus.nvram.address(), 3);
        assert_eq!(bus.port_latch(Port::H), 3);
    }

    #[test]
    fn test_display_ports_notify_composer() {
        let mut bus = bus();
        bus.bus_write(Port::C as u8, 0x3);
        bus.bus_write(Port::F as u8, 0b1001);
        bus.bus_write(Port::G as u8, 0b0100);
        assert_eq!(bus.composer.update_count, 3);
        assert_eq!(bus.display.plate, 0x0103);
        assert_eq!(bus.display.grid, 0b11_0100);
        assert_eq!(bus.composer.row(2), 0x0103);
        assert_eq!(bus.composer.row(0), 0);

        // Non-display ports leave the composer alone.
        bus.bus_write(Port::H as u8, 1);
        bus.bus_write(Port::E as u8, 0);
        assert_eq!(bus.composer.update_count, 3);
    }

    #[test]
    fn test_relay_drive() {
        let mut bus = bus();
        bus.bus_write(Port::E as u8, 0b0000);
        assert!(!bus.relay_drive_active());
        bus.bus_write(Port::E as u8, 0b1000);
        assert!(bus.relay_drive_active());
        bus.bus_write(Port::E as u8, 0b0000);
        assert!(bus.relay_drive_active());
    }

    #[test]
    fn test_unknown_ports() {
        let mut bus = bus();
        bus.bus_write(0xC, 0x5);
        assert_eq!(bus.bus_peek(0xC), None);
        assert_eq!(bus.bus_read(0xC), 0);
        assert_eq!(bus.bus_read(Port::D as u8), 0);
    }
}
