//! Serial NVRAM controller.
//!
//! The controller holds 16 cells of 16 bits. Data moves between the MCU and the cells through a
//! 16-bit data register that is shifted one bit per rising edge of the serial clock. The
//! operation is selected by a 3-bit mode latch, the cell by a 4-bit address latch, each driven
//! by its own MCU port.
mod store;

use intbits::Bits;
use log::debug;
use log::error;
use log::info;

pub use self::store::decode_image;
pub use self::store::encode_image;
pub use self::store::FileStore;
pub use self::store::MemoryStore;
pub use self::store::NvramImage;
pub use self::store::NvramStore;
pub use self::store::DEFAULT_NVRAM_FILE;
pub use self::store::NVRAM_IMAGE_SIZE;
use crate::common::util::EdgeDetector;

pub const NUM_CELLS: usize = 16;

/// Operations selected through the mode latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::FromRepr)]
#[repr(u8)]
pub enum NvramMode {
    /// No operation. The clock line is ignored.
    #[strum(to_string = "SB: standby")]
    Standby = 0,
    /// Shift the data register out to the MCU, low bit first.
    #[strum(to_string = "RTNS: data register to output")]
    ReadToOutput = 1,
    /// Shift bits from the MCU into the low end of the data register.
    #[strum(to_string = "WTNS: input to data register")]
    WriteToRegister = 2,
    /// Memorize the data register in the addressed cell.
    #[strum(to_string = "WRT: memorize data register to address")]
    WriteToAddress = 3,
    #[strum(to_string = "MSTNS: station memory")]
    StationMemory = 4,
    /// Clear the addressed cell.
    #[strum(to_string = "ERS: erase address")]
    Erase = 5,
    /// Copy the addressed cell into the data register.
    #[strum(to_string = "READ: read address to data register")]
    Read = 6,
    #[strum(to_string = "MCTNS: last channel memory")]
    LastChannelMemory = 7,
}

pub struct Nvram {
    cells: NvramImage,
    /// Raw value of the mode latch. Values without an [`NvramMode`] are inert.
    mode: u8,
    address: u8,
    data: u16,
    /// A latched rising edge means one bit is waiting to be moved through the data register.
    clock: EdgeDetector,
    store: Box<dyn NvramStore>,
}

impl Nvram {
    /// Creates the controller and loads the cells from `store`.
    ///
    /// A store without data or failing to load leaves all cells zeroed.
    pub fn new(mut store: Box<dyn NvramStore>) -> Self {
        let cells = match store.load() {
            Ok(Some(cells)) => cells,
            Ok(None) => {
                info!(target: "nvram", "No stored NVRAM image, starting blank");
                [0; NUM_CELLS]
            }
            Err(err) => {
                error!(target: "nvram", "Loading NVRAM failed: {err:#}");
                [0; NUM_CELLS]
            }
        };
        Self {
            cells,
            mode: NvramMode::Standby as u8,
            address: 0,
            data: 0,
            clock: EdgeDetector::new(),
            store,
        }
    }

    pub fn cells(&self) -> &NvramImage {
        &self.cells
    }

    pub fn cell(&self, address: u8) -> u16 {
        self.cells[address.bits(0..4) as usize]
    }

    pub fn data_register(&self) -> u16 {
        self.data
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn mode(&self) -> Option<NvramMode> {
        NvramMode::from_repr(self.mode)
    }

    pub fn mode_value(&self) -> u8 {
        self.mode
    }

    pub fn is_transfer_pending(&self) -> bool {
        self.clock.rise_triggered
    }

    /// Mode latch
    ///
    /// ```text
    /// 2  bit  0
    /// ---------
    ///       MMM
    ///       |||
    ///       +++- NvramMode
    /// ```
    pub fn set_mode(&mut self, mode: u8) {
        if mode != self.mode {
            let name = NvramMode::from_repr(mode)
                .map(|mode| mode.to_string())
                .unwrap_or_else(|| "<INVALID>".to_string());
            info!(target: "nvram", "NVRAM mode {} ({})", mode, name);
            self.mode = mode;
        }
    }

    /// Address latch
    ///
    /// ```text
    /// 3  bit  0
    /// ---------
    ///      AAAA
    ///      ||||
    ///      ++++- Cell address
    /// ```
    pub fn set_address(&mut self, address: u8) {
        debug!(target: "nvram", "NVRAM address {}", address);
        self.address = address.bits(0..4);
    }

    /// Processes one sample of the serial clock and data lines driven by the MCU.
    ///
    /// Outside of standby every rising edge of `clock` latches one pending bit transfer, which
    /// is completed by this call (WTNS) or by the next [`Nvram::shift_out`] (RTNS).
    pub fn clock_in(&mut self, clock: bool, data: bool) {
        let mode = self.mode();
        if mode != Some(NvramMode::Standby) {
            self.clock.update_signal(clock);
        }

        match mode {
            Some(NvramMode::WriteToRegister) => {
                if self.clock.consume_rise() {
                    self.data = (self.data << 1) | data as u16;
                }
            }
            _ => self.execute_operation(),
        }
    }

    /// Processes a read of the serial output line by the MCU.
    ///
    /// In RTNS mode with a pending transfer this returns the low bit of the data register and
    /// shifts the register right. Returns `false` if no new bit is available this cycle.
    ///
    /// The clock line is not sampled, but operations that do not depend on it (WRT, ERS, READ)
    /// are executed just like in [`Nvram::clock_in`].
    pub fn shift_out(&mut self) -> bool {
        match self.mode() {
            Some(NvramMode::ReadToOutput) => {
                if !self.clock.consume_rise() {
                    return false;
                }
                let bit = self.data.bit(0);
                self.data >>= 1;
                bit
            }
            Some(NvramMode::WriteToRegister) => false,
            _ => {
                self.execute_operation();
                false
            }
        }
    }

    /// Returns the bit [`Nvram::shift_out`] would produce, or None if no bit is pending.
    pub fn peek_output(&self) -> Option<bool> {
        (self.mode() == Some(NvramMode::ReadToOutput) && self.clock.rise_triggered)
            .then(|| self.data.bit(0))
    }

    /// Saves all cells to the store. Failures are logged, the cells stay usable.
    pub fn flush(&mut self) {
        if let Err(err) = self.store.save(&self.cells) {
            error!(target: "nvram", "Writing NVRAM failed: {err:#}");
        }
    }

    /// Executes the operations of the current mode that do not move bits over the serial lines.
    fn execute_operation(&mut self) {
        match self.mode() {
            Some(NvramMode::Standby) => self.clock.force_low(),
            Some(NvramMode::WriteToAddress) => self.memorize(),
            Some(NvramMode::Erase) => self.cells[self.address as usize] = 0,
            Some(NvramMode::Read) => {
                self.data = self.cells[self.address as usize];
                debug!(target: "nvram", "read {:04X} from {}", self.data, self.address);
            }
            // Station and last channel memory banks are not wired on this device.
            Some(NvramMode::StationMemory) | Some(NvramMode::LastChannelMemory) | None => {}
            // Serial transfers are handled by clock_in and shift_out.
            Some(NvramMode::ReadToOutput) | Some(NvramMode::WriteToRegister) => {}
        }
    }

    /// Stores the data register in the addressed cell. The device memorizes the register in
    /// reversed bit order, while READ copies the cell back unchanged.
    fn memorize(&mut self) {
        debug!(target: "nvram", "write {:04X} to {}", self.data, self.address);
        self.cells[self.address as usize] = self.data.reverse_bits();
        self.flush();
    }
}
