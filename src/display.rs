//! Text rendering of a cube state as an unfolded net.
//!
//! The net puts the top face above, then left, front, right and back side by
//! side, with the bottom face below:
//!
//! ```text
//!          U
//!       L  F  R  B
//!          D
//! ```

use crate::state::CubeState;

/// Cells per net row (four faces side by side).
const NET_WIDTH: usize = 12;

/// Rows in the net (three faces stacked).
const NET_HEIGHT: usize = 9;

/// Width of one printed label.
const CELL_WIDTH: usize = 3;

/// Position shown in each net cell, or `None` for blank space.
const NET_LAYOUT: [[Option<u8>; NET_WIDTH]; NET_HEIGHT] = build_net_layout();

/// Builds the net layout from the face numbering.
///
/// Faces occupy 3x3 blocks; block column and row give where each face sits.
const fn build_net_layout() -> [[Option<u8>; NET_WIDTH]; NET_HEIGHT] {
    // (face, block row, block column) in the net
    const PLACEMENT: [(usize, usize, usize); 6] = [
        (0, 1, 1), // front
        (1, 1, 0), // left
        (2, 0, 1), // top
        (3, 1, 2), // right
        (4, 2, 1), // bottom
        (5, 1, 3), // back
    ];

    let mut layout = [[None; NET_WIDTH]; NET_HEIGHT];
    let mut i = 0;
    while i < PLACEMENT.len() {
        let (face, block_row, block_col) = PLACEMENT[i];
        let mut cell = 0;
        while cell < 9 {
            let row = block_row * 3 + cell / 3;
            let col = block_col * 3 + cell % 3;
            layout[row][col] = Some((face * 9 + cell) as u8);
            cell += 1;
        }
        i += 1;
    }
    layout
}

/// Renders the state as a 9-line net, one label per cell.
pub fn render(state: &CubeState) -> String {
    let mut output = String::new();
    for row in &NET_LAYOUT {
        let mut line = String::new();
        for cell in row {
            match cell {
                Some(position) => {
                    line.push_str(&format!(
                        "{:>width$}",
                        state[*position as usize],
                        width = CELL_WIDTH
                    ));
                }
                None => line.push_str(&" ".repeat(CELL_WIDTH)),
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}
