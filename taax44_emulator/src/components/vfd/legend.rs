//! Names of the display elements wired on the TA-AX44 front panel.
//!
//! The volume bar runs from left to right across grid C and continues on grid F and then grid D,
//! where the plate order is reversed.
use super::DisplayMatrix;
use super::GridLine;

/// Only plate lines 0..11 carry visible elements.
pub const RENDERED_COLUMNS: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: &'static str,
    pub grid: GridLine,
    pub plate: usize,
}

const fn element(name: &'static str, grid: GridLine, plate: usize) -> Element {
    Element { name, grid, plate }
}

pub const ELEMENTS: &[Element] = &[
    element("MUTING", GridLine::A, 10),
    element("VOLUME", GridLine::C, 0),
    element("VOLUME BAR 1", GridLine::C, 1),
    element("VOLUME BAR 2", GridLine::C, 2),
    element("VOLUME BAR 3", GridLine::C, 3),
    element("VOLUME BAR 4", GridLine::C, 4),
    element("VOLUME BAR 5", GridLine::C, 5),
    element("VOLUME BAR 6", GridLine::C, 6),
    element("VOLUME BAR 7", GridLine::C, 7),
    // TODO: Bars 8 and 9 are placed from a guess, confirm the grid/plate pair on hardware.
    element("VOLUME BAR 8", GridLine::F, 8),
    element("VOLUME BAR 9", GridLine::F, 9),
    element("VOLUME BAR 10", GridLine::D, 7),
    element("VOLUME BAR 11", GridLine::D, 6),
    element("VOLUME BAR 12", GridLine::D, 5),
    element("VOLUME BAR 13", GridLine::D, 4),
    element("VOLUME BAR 14", GridLine::D, 3),
    element("VOLUME BAR 15", GridLine::D, 2),
    element("VOLUME BAR 16", GridLine::D, 1),
    element("VOLUME BAR 17", GridLine::D, 0),
    element("BALANCE", GridLine::F, 10),
];

/// Returns the names of all lit elements in the order of [`ELEMENTS`].
pub fn lit_elements(matrix: &DisplayMatrix) -> Vec<&'static str> {
    ELEMENTS
        .iter()
        .filter(|element| element.plate < RENDERED_COLUMNS)
        .filter(|element| matrix.is_lit(element.grid as usize, element.plate))
        .map(|element| element.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::components::vfd::DisplayComposer;
    use crate::components::vfd::DisplayFrame;

    fn matrix_with(plate: u16, grid: u16) -> DisplayMatrix {
        let mut matrix = DisplayMatrix::new();
        matrix.update(&DisplayFrame {
            plate,
            grid,
            columns: 13,
            rows: 6,
        });
        matrix
    }

    #[test]
    fn test_elements_do_not_overlap() {
        let positions = ELEMENTS
            .iter()
            .map(|element| (element.grid as usize, element.plate))
            .collect_vec();
        assert_eq!(positions.iter().unique().count(), ELEMENTS.len());
    }

    #[test]
    fn test_volume_row() {
        let matrix = matrix_with(0b0000_0000_0111, 1 << GridLine::C as usize);
        assert_eq!(
            lit_elements(&matrix),
            vec!["VOLUME", "VOLUME BAR 1", "VOLUME BAR 2"]
        );
    }

    #[test]
    fn test_reversed_volume_row() {
        let matrix = matrix_with(0b1000_0001, 1 << GridLine::D as usize);
        assert_eq!(lit_elements(&matrix), vec!["VOLUME BAR 10", "VOLUME BAR 17"]);
    }

    #[test]
    fn test_unrendered_column_is_ignored() {
        let matrix = matrix_with(1 << 12, 0b11_1111);
        assert!(lit_elements(&matrix).is_empty());
    }
}
