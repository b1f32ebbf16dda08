//! Vacuum fluorescent display (VFD) drive registers.
//!
//! The VFD is multiplexed over 6 grid lines (rows) and 13 plate lines (columns). The MCU drives
//! both through several 4-bit ports which are assembled here into the 16-bit plate and grid
//! registers. Rendering is left to a [`DisplayComposer`], which is notified after every write.
pub mod legend;
mod matrix;

use bilge::prelude::*;
use intbits::Bits;
use log::trace;

pub use self::matrix::DisplayMatrix;

pub const PLATE_COLUMNS: usize = 13;
pub const GRID_ROWS: usize = 6;

/// Grid port value selecting grid line F instead of a nibble pattern.
const GRID_F_SENTINEL: u8 = 12;

/// Grid lines as labeled on the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum GridLine {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
}

impl GridLine {
    pub fn is_selected(self, grid: u16) -> bool {
        grid.bit(self as usize)
    }
}

/// Snapshot of the drive registers handed to the composer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayFrame {
    pub plate: u16,
    pub grid: u16,
    pub columns: usize,
    pub rows: usize,
}

/// Receives the drive registers after every write to a display port.
pub trait DisplayComposer {
    fn update(&mut self, frame: &DisplayFrame);
}

/// Composer discarding all updates.
#[derive(Default, Clone, Copy, Debug)]
pub struct NullComposer;

impl DisplayComposer for NullComposer {
    fn update(&mut self, _frame: &DisplayFrame) {}
}

/// Layout of the combined plate/grid port.
///
/// ```text
/// 3  bit  0
/// ---------
/// GPPP
/// ||||
/// |+++- Plate lines 8..10
/// +---- Grid line E
/// ```
#[bitsize(4)]
#[derive(Clone, Copy, DebugBits, FromBits, PartialEq)]
pub struct PlateGridLines {
    pub plate: u3,
    pub grid: bool,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayRegisters {
    pub plate: u16,
    pub grid: u16,
}

impl DisplayRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> DisplayFrame {
        DisplayFrame {
            plate: self.plate,
            grid: self.grid,
            columns: PLATE_COLUMNS,
            rows: GRID_ROWS,
        }
    }

    /// Replaces plate nibble `nibble` (0..=2), i.e. plate bits `4 * nibble` to `4 * nibble + 3`.
    pub fn write_plate_nibble(&mut self, nibble: usize, value: u8) {
        debug_assert!(nibble < 3, "plate nibble {nibble} out of range");
        let shift = nibble * 4;
        self.plate.set_bits(shift..shift + 4, value.bits(0..4) as u16);
        trace!(target: "vfd", "plate[{nibble}] = {value:X} -> {:04X}", self.plate);
    }

    /// Writes plate bits 8..10 and grid line E. Plate bit 11 is not touched.
    pub fn write_plate_grid(&mut self, value: u8) {
        let lines = PlateGridLines::from(u4::new(value.bits(0..4)));
        self.plate.set_bits(8..11, lines.plate().value() as u16);
        self.grid.set_bit(GridLine::E as usize, lines.grid());
        trace!(target: "vfd", "plate/grid = {:04X}/{:04X}", self.plate, self.grid);
    }

    /// Writes grid lines A..D.
    ///
    /// Grid line F has no bit of its own on this port. The value 12 selects it, setting grid
    /// bit 5 alone and clearing bits 6..8 while lines A..D keep their state. Any other value
    /// sets bit 5 and replaces lines A..D with the value.
    pub fn write_grid(&mut self, value: u8) {
        let value = value.bits(0..4);
        if value == GRID_F_SENTINEL {
            self.grid = (self.grid & !(0xF << 5)) | (1 << 5);
        } else {
            self.grid |= 1 << 5;
            self.grid = (self.grid & !0xF) | value as u16;
        }
        trace!(target: "vfd", "grid = {:04X}", self.grid);
    }
}
