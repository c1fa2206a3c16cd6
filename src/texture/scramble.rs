/// Counters of the tile order recurrence.
///
/// Blocks are stored in 8x8 pixel groups of 2x2 blocks. The counters walk a
/// destination row two blocks at a time and hop between the upper and lower half
/// of each group row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ScrambleState {
    row_acc: usize,
    base: usize,
    base_acc: usize,
    row: usize,
}

impl ScrambleState {
    fn next_row(&mut self) {
        if self.row_acc < 1 {
            self.row_acc = 1;
            self.row += 2;
            self.base = self.row;
        } else {
            self.row_acc = 0;
            self.base -= 2;
            self.row = self.base;
        }
    }

    fn next_tile(&mut self) {
        if self.base_acc < 1 {
            self.base_acc = 1;
            self.base += 1;
        } else {
            self.base_acc = 0;
            self.base += 3;
        }
    }
}

/// Build the table mapping each destination tile (row-major) to the index of the
/// tile that holds its pixels in the encoded payload.
///
/// The result is always a permutation of `0..tiles_per_row * tile_rows`.
pub fn build_scramble_table(tiles_per_row: usize, tile_rows: usize) -> Vec<usize> {
    if tiles_per_row % 2 == 0 && tile_rows % 2 == 0 {
        scramble_by_recurrence(tiles_per_row, tile_rows)
    } else {
        scramble_by_groups(tiles_per_row, tile_rows)
    }
}

fn scramble_by_recurrence(tiles_per_row: usize, tile_rows: usize) -> Vec<usize> {
    let tile_count = tiles_per_row * tile_rows;
    let mut table = Vec::with_capacity(tile_count);
    let mut state = ScrambleState::default();

    for tile in 0..tile_count {
        if tile > 0 && tile % tiles_per_row == 0 {
            state.next_row();
        }

        table.push(state.base);
        state.next_tile();
    }

    table
}

/// Same order as the recurrence, but skips the parts of 2x2 groups that hang over
/// the right or bottom edge. The recurrence would address tiles past the end there.
fn scramble_by_groups(tiles_per_row: usize, tile_rows: usize) -> Vec<usize> {
    let mut table = vec![0; tiles_per_row * tile_rows];
    let mut source = 0;

    for group_y in (0..tile_rows).step_by(2) {
        for group_x in (0..tiles_per_row).step_by(2) {
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                let (x, y) = (group_x + dx, group_y + dy);
                if x < tiles_per_row && y < tile_rows {
                    table[y * tiles_per_row + x] = source;
                    source += 1;
                }
            }
        }
    }

    table
}
