//! Peripheral emulation for the Sony TA-AX44 amplifier control board.
//!
//! The board is driven by a NEC uCOM-4 MCU. This crate emulates everything behind the MCU ports:
//! the serial NVRAM, the audio signal processor (ASP) serial receiver, the VFD drive registers
//! and the front panel keys. The MCU core itself is not part of this crate, it accesses the
//! peripherals through [`common::bus::PortBus`].
pub mod common;
pub mod components;
pub mod ports;

use std::path::Path;

use components::front_panel::Key;
use components::nvram::FileStore;
use components::nvram::MemoryStore;
use components::nvram::NvramStore;
use components::vfd::DisplayComposer;
use components::vfd::DisplayMatrix;
use ports::Port;
use ports::Taax44Bus;

/// One emulated TA-AX44. Each instance owns its own peripheral state.
pub struct System<ComposerT: DisplayComposer = DisplayMatrix> {
    pub bus: Taax44Bus<ComposerT>,
}

impl System<DisplayMatrix> {
    /// Creates a system with blank, non-persistent NVRAM.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_parts(Box::new(MemoryStore::new()), DisplayMatrix::new())
    }

    /// Creates a system whose NVRAM is loaded from and saved to `path`.
    pub fn with_nvram_file(path: &Path) -> Self {
        Self::with_parts(Box::new(FileStore::new(path)), DisplayMatrix::new())
    }
}

impl<ComposerT: DisplayComposer> System<ComposerT> {
    pub fn with_parts(store: Box<dyn NvramStore>, composer: ComposerT) -> Self {
        Self {
            bus: Taax44Bus::new(store, composer),
        }
    }

    pub fn write_port(&mut self, port: Port, value: u8) {
        self.bus.bus_write(port as u8, value);
    }

    pub fn read_port(&mut self, port: Port) -> u8 {
        self.bus.bus_read(port as u8)
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        self.bus.front_panel.set(key, pressed);
    }

    pub fn composer(&self) -> &ComposerT {
        &self.bus.composer
    }

    pub fn take_asp_frames(&mut self) -> Vec<u32> {
        self.bus.take_asp_frames()
    }
}
