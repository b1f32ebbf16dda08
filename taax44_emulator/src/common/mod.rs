//! Traits and types shared by all components of the emulator.

pub mod bus;
pub mod logging;
pub mod util;
