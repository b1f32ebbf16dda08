//! Drives the port E serial lines the way the MCU firmware does.
#![allow(dead_code)]

use taax44_emulator::components::vfd::DisplayComposer;
use taax44_emulator::ports::Port;
use taax44_emulator::System;

const STROBE: u8 = 0b0001;
const DATA: u8 = 0b0010;
const CLOCK: u8 = 0b0100;

/// Drives one bit with a low and a high clock sample.
pub fn clock_bit<C: DisplayComposer>(system: &mut System<C>, bit: bool) {
    let data = if bit { DATA } else { 0 };
    system.write_port(Port::E, data);
    system.write_port(Port::E, data | CLOCK);
}

/// Drives `count` bits of `word`, most significant bit first.
pub fn clock_bits<C: DisplayComposer>(system: &mut System<C>, word: u32, count: usize) {
    for i in (0..count).rev() {
        clock_bit(system, (word >> i) & 1 == 1);
    }
}

/// Raises the ASP strobe with the clock held low.
pub fn strobe<C: DisplayComposer>(system: &mut System<C>) {
    system.write_port(Port::E, STROBE);
    system.write_port(Port::E, 0);
}

/// Latches the NVRAM address and mode ports.
pub fn nvram_command<C: DisplayComposer>(system: &mut System<C>, address: u8, mode: u8) {
    system.write_port(Port::H, address);
    system.write_port(Port::I, mode);
}

/// Clocks 16 bits out of the NVRAM in RTNS mode. Bits arrive low bit first on port A bit 2.
pub fn read_nvram_output<C: DisplayComposer>(system: &mut System<C>) -> u16 {
    let mut word = 0;
    for i in 0..16 {
        system.write_port(Port::E, 0);
        system.write_port(Port::E, CLOCK);
        let input = system.read_port(Port::A);
        word |= (((input >> 2) & 1) as u16) << i;
    }
    word
}
