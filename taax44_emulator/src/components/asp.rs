//! Receiver for the audio signal processor (ASP) serial link.
//!
//! The ASP shares clock and data lines with the NVRAM. It shifts in one bit per rising clock
//! edge and uses a separate strobe line, not a fixed bit count, to mark the end of a frame.
use crate::common::util::EdgeDetector;

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct AspReceiver {
    clock: EdgeDetector,
    strobed: bool,
    data: u32,
}

impl AspReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one sample of the strobe, clock and data lines.
    pub fn sample(&mut self, strobe: bool, clock: bool, bit: bool) {
        self.clock.update_signal(clock);
        if self.clock.consume_rise() {
            self.data = (self.data << 1) | bit as u32;
        }
        self.strobed = strobe;
    }

    /// Returns the accumulated frame if the strobe line is asserted and resets the receiver.
    pub fn take_frame(&mut self) -> Option<u32> {
        if !self.strobed {
            return None;
        }
        let frame = self.data;
        self.strobed = false;
        self.data = 0;
        Some(frame)
    }

    pub fn accumulator(&self) -> u32 {
        self.data
    }

    pub fn is_strobed(&self) -> bool {
        self.strobed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_bits(asp: &mut AspReceiver, bits: &[bool]) {
        for &bit in bits {
            asp.sample(false, false, bit);
            asp.sample(false, true, bit);
        }
    }

    #[test]
    fn test_bits_accumulate_msb_first() {
        let mut asp = AspReceiver::new();
        clock_bits(&mut asp, &[true, false, true, true]);
        assert_eq!(asp.accumulator(), 0b1011);
        assert_eq!(asp.take_frame(), None);
    }

    #[test]
    fn test_holding_clock_high_samples_once() {
        let mut asp = AspReceiver::new();
        asp.sample(false, true, true);
        asp.sample(false, true, true);
        asp.sample(false, true, false);
        assert_eq!(asp.accumulator(), 1);
    }

    #[test]
    fn test_strobe_completes_frame() {
        let mut asp = AspReceiver::new();
        clock_bits(&mut asp, &[true, true, false]);
        asp.sample(true, false, false);
        assert!(asp.is_strobed());
        assert_eq!(asp.take_frame(), Some(0b110));
        assert_eq!(asp.accumulator(), 0);
        assert_eq!(asp.take_frame(), None);
    }

    #[test]
    fn test_long_frames_keep_low_32_bits() {
        let mut asp = AspReceiver::new();
        clock_bits(&mut asp, &[true; 33]);
        clock_bits(&mut asp, &[false]);
        assert_eq!(asp.accumulator(), 0xFFFF_FFFE);
    }
}
