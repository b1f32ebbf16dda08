use std::fmt::Display;

use intbits::Bits;
use strum::IntoEnumIterator;

use super::DisplayComposer;
use super::DisplayFrame;
use super::GridLine;
use super::GRID_ROWS;
use super::PLATE_COLUMNS;

/// Reference composer tracking which elements of the matrix are lit.
///
/// A row holds the plate lines while its grid line is selected and is dark otherwise.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct DisplayMatrix {
    rows: [u16; GRID_ROWS],
    pub last_frame: Option<DisplayFrame>,
    pub update_count: u64,
}

impl DisplayMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lit plate lines of `row`. Rows outside the display are dark.
    pub fn row(&self, row: usize) -> u16 {
        self.rows.get(row).copied().unwrap_or(0)
    }

    pub fn is_lit(&self, row: usize, column: usize) -> bool {
        row < GRID_ROWS && column < PLATE_COLUMNS && self.rows[row].bit(column)
    }
}

impl DisplayComposer for DisplayMatrix {
    fn update(&mut self, frame: &DisplayFrame) {
        let columns = frame.columns.min(PLATE_COLUMNS);
        for (y, row) in self.rows.iter_mut().enumerate().take(frame.rows) {
            *row = if frame.grid.bit(y) {
                frame.plate.bits(0..columns)
            } else {
                0
            };
        }
        self.last_frame = Some(*frame);
        self.update_count += 1;
    }
}

impl Display for DisplayMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in GridLine::iter() {
            write!(f, "{line} ")?;
            for column in 0..PLATE_COLUMNS {
                let cell = if self.is_lit(line as usize, column) { '#' } else { '.' };
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_rows_follow_grid() {
        let mut matrix = DisplayMatrix::new();
        matrix.update(&DisplayFrame {
            plate: 0xF003,
            grid: 0b10_0100,
            columns: PLATE_COLUMNS,
            rows: GRID_ROWS,
        });
        assert_eq!(matrix.row(GridLine::C as usize), 0x1003);
        assert_eq!(matrix.row(GridLine::F as usize), 0x1003);
        assert_eq!(matrix.row(GridLine::A as usize), 0);
        assert!(matrix.is_lit(2, 0));
        assert!(matrix.is_lit(5, 12));
        assert!(!matrix.is_lit(5, 13));
        assert_eq!(matrix.row(GRID_ROWS), 0);
        assert!(!matrix.is_lit(GRID_ROWS, 0));
        assert_eq!(matrix.update_count, 1);
    }

    #[test]
    fn test_display_format() {
        let mut matrix = DisplayMatrix::new();
        matrix.update(&DisplayFrame {
            plate: 0b101,
            grid: 0b1,
            columns: PLATE_COLUMNS,
            rows: GRID_ROWS,
        });
        assert_eq!(
            matrix.to_string(),
            "A #.#..........\n\
             B .............\n\
             C .............\n\
             D .............\n\
             E .............\n\
             F .............\n"
        );
    }
}
