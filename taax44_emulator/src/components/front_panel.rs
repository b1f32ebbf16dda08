//! Front panel keys and the key matrix scanned through the grid lines.
use std::collections::HashSet;

use crate::components::vfd::GridLine;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Key {
    Power,
    VolumeDown,
    VolumeUp,
    Muting,
    SubsonicFilter,
    HighFilter,
    BalanceRight,
    BalanceLeft,
    Tape1,
    Tape2,
    TapeCopy,
    Tuner1,
    Tuner2,
    DadAux,
    BassDown,
    BassUp,
    TrebleDown,
    TrebleUp,
}

/// Key matrix rows in scan priority order. When several grid lines are selected at once, the
/// first matching row is returned.
const MATRIX: &[(GridLine, &[Key])] = &[
    (GridLine::B, &[Key::VolumeDown, Key::VolumeUp, Key::Muting]),
    (
        GridLine::C,
        &[
            Key::SubsonicFilter,
            Key::HighFilter,
            Key::BalanceRight,
            Key::BalanceLeft,
        ],
    ),
    (GridLine::A, &[Key::Tape1, Key::Tape2, Key::TapeCopy]),
    (GridLine::E, &[Key::Tuner1, Key::Tuner2, Key::DadAux]),
    (
        GridLine::D,
        &[Key::BassDown, Key::BassUp, Key::TrebleDown, Key::TrebleUp],
    ),
];

#[derive(Default, Clone, Debug)]
pub struct FrontPanel {
    pressed: HashSet<Key>,
}

impl FrontPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Returns the key matrix return lines for the row selected by `grid`.
    pub fn scan(&self, grid: u16) -> u8 {
        MATRIX
            .iter()
            .find(|(line, _)| line.is_selected(grid))
            .map(|(_, keys)| {
                keys.iter()
                    .enumerate()
                    .filter(|(_, key)| self.is_pressed(**key))
                    .fold(0, |lines, (bit, _)| lines | (1 << bit))
            })
            .unwrap_or(0)
    }
}
