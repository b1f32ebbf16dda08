//! General utility functions and types.
use std::collections::VecDeque;

/// FIFO holding at most `N` entries. Pushing onto a full queue drops the oldest entry.
#[derive(Clone)]
pub struct BoundedQueue<T, const N: usize> {
    entries: VecDeque<T>,
}

impl<T, const N: usize> BoundedQueue<T, N> {
    pub fn push(&mut self, value: T) {
        if self.entries.len() == N {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
    }

    pub fn drain(&mut self) -> Vec<T> {
        self.entries.drain(..).collect()
    }
}

impl<T, const N: usize> Default for BoundedQueue<T, N> {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(N),
        }
    }
}

/// Rising edge detector for a sampled clock line.
///
/// A rising edge is a sample of `true` following a sample of `false`. The edge stays latched
/// until it is consumed, so the synchronous logic listening to the line may act on it in a
/// later step than the one that observed it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EdgeDetector {
    /// Previous sample of the line.
    pub value: bool,
    pub rise_triggered: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_signal(&mut self, value: bool) {
        if value && !self.value {
            self.rise_triggered = true;
        }
        self.value = value;
    }

    /// Forces the previous sample low without touching a latched edge.
    pub fn force_low(&mut self) {
        self.value = false;
    }

    pub fn consume_rise(&mut self) -> bool {
        let rise_triggered = self.rise_triggered;
        self.rise_triggered = false;
        rise_triggered
    }
}
