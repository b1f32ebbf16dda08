//! Port bus interface between the CPU core and the peripherals.
//!
//! The uCOM-4 core accesses its I/O ports one 4-bit nibble at a time. Each port index and value
//! is masked to 4 bits by the implementation.

pub trait PortBus {
    /// Reads the port without side effects. Returns None if the port cannot be inspected.
    fn peek(&self, port: u8) -> Option<u8>;
    /// Reads the port as the CPU would, which may advance peripheral state.
    fn read(&mut self, port: u8) -> u8;
    fn write(&mut self, port: u8, value: u8);
}
