//! Zhang–Suen thinning with a deterministic 2x2 block cleanup.

use mt_core::{Image, ImageView};

/// Thins a binary image to a one-pixel-wide skeleton.
///
/// Runs both Zhang–Suen sub-iterations until a full pass removes nothing,
/// then applies [`cleanup_blocks`] so no fully set 2x2 block survives where a
/// pixel can be dropped without changing topology.
pub fn thin_zhang_suen(src: &ImageView<'_, u8>) -> Image<u8> {
    let (w, h) = (src.width(), src.height());
    if w == 0 || h == 0 {
        return Image::new_fill(w, h, 0u8);
    }

    let mut grid = PaddedGrid::from_view(src);
    let mut marked = Vec::new();
    let mut passes = 0usize;

    loop {
        passes += 1;
        let mut removed = 0usize;
        for step in 0..2 {
            marked.clear();
            for y in 1..=h {
                for x in 1..=w {
                    let i = grid.index(x, y);
                    if grid.cells[i] != 0 {
                        let n = grid.clockwise_from_north(i);
                        if removable(&n, step) {
                            marked.push(i);
                        }
                    }
                }
            }

            for &i in &marked {
                grid.cells[i] = 0;
            }
            removed += marked.len();
        }

        if removed == 0 {
            break;
        }
    }

    let block_removed = cleanup_grid(&mut grid);
    log::debug!(
        "thinning converged after {passes} passes; {block_removed} block pixels removed"
    );

    grid.into_image()
}

/// Breaks up fully set 2x2 blocks in a thinned image.
///
/// Blocks are visited in raster order by their top-left pixel. Within a block
/// the first pixel (raster order) whose removal preserves both 4- and
/// 8-connectivity is dropped; failing that, the first pixel that preserves
/// 8-connectivity. End points are never dropped. Returns the number of
/// pixels removed.
pub fn cleanup_blocks(img: &mut Image<u8>) -> usize {
    let mut grid = PaddedGrid::from_view(&img.as_view());
    let removed = cleanup_grid(&mut grid);
    if removed > 0 {
        *img = grid.into_image();
    }
    removed
}

fn cleanup_grid(grid: &mut PaddedGrid) -> usize {
    let (w, h) = (grid.width, grid.height);
    let stride = grid.stride();
    let mut removed = 0usize;

    loop {
        let mut changed = false;
        for y in 1..h {
            for x in 1..w {
                let tl = grid.index(x, y);
                let block = [tl, tl + 1, tl + stride, tl + stride + 1];
                if block.iter().any(|&i| grid.cells[i] == 0) {
                    continue;
                }

                let pick = block
                    .iter()
                    .copied()
                    .find(|&i| grid.is_simple(i, true))
                    .or_else(|| block.iter().copied().find(|&i| grid.is_simple(i, false)));
                if let Some(i) = pick {
                    grid.cells[i] = 0;
                    removed += 1;
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }

    removed
}

/// Zhang–Suen deletion test. `n` holds P2..P9 (N, NE, E, SE, S, SW, W, NW).
fn removable(n: &[u8; 8], step: usize) -> bool {
    let b: u8 = n.iter().sum();
    if !(2..=6).contains(&b) {
        return false;
    }

    let transitions = (0..8).filter(|&k| n[k] == 0 && n[(k + 1) % 8] == 1).count();
    if transitions != 1 {
        return false;
    }

    let [p2, _, p4, _, p6, _, p8, _] = *n;
    if step == 0 {
        p2 * p4 * p6 == 0 && p4 * p6 * p8 == 0
    } else {
        p2 * p4 * p8 == 0 && p2 * p6 * p8 == 0
    }
}

/// Binary grid (`0`/`1`) with a one-pixel unset border so neighborhoods never
/// leave the buffer.
struct PaddedGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl PaddedGrid {
    fn from_view(src: &ImageView<'_, u8>) -> Self {
        let (w, h) = (src.width(), src.height());
        let mut cells = vec![0u8; (w + 2) * (h + 2)];
        for y in 0..h {
            for (x, &v) in src.row(y).iter().enumerate() {
                cells[(y + 1) * (w + 2) + x + 1] = u8::from(v != 0);
            }
        }

        Self {
            width: w,
            height: h,
            cells,
        }
    }

    fn stride(&self) -> usize {
        self.width + 2
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.stride() + x
    }

    fn clockwise_from_north(&self, i: usize) -> [u8; 8] {
        let s = self.stride();
        let c = &self.cells;
        [
            c[i - s],
            c[i - s + 1],
            c[i + 1],
            c[i + s + 1],
            c[i + s],
            c[i + s - 1],
            c[i - 1],
            c[i - s - 1],
        ]
    }

    /// Yokoi order x1..x8: E, NE, N, NW, W, SW, S, SE.
    fn counter_clockwise_from_east(&self, i: usize) -> [u8; 8] {
        let s = self.stride();
        let c = &self.cells;
        [
            c[i + 1],
            c[i - s + 1],
            c[i - s],
            c[i - s - 1],
            c[i - 1],
            c[i + s - 1],
            c[i + s],
            c[i + s + 1],
        ]
    }

    /// Whether pixel `i` can be removed without changing the 8-connected
    /// topology (and, with `strict`, the 4-connected one too). Pixels with
    /// fewer than two neighbors are never simple here.
    fn is_simple(&self, i: usize, strict: bool) -> bool {
        let x = self.counter_clockwise_from_east(i);
        if x.iter().map(|&v| v as u32).sum::<u32>() < 2 {
            return false;
        }

        let n8 = yokoi(&x.map(|v| 1 - v));
        if n8 != 1 {
            return false;
        }
        !strict || yokoi(&x) == 1
    }

    fn into_image(self) -> Image<u8> {
        let (w, h) = (self.width, self.height);
        let stride = self.stride();
        Image::from_fn(w, h, |x, y| {
            if self.cells[(y + 1) * stride + x + 1] != 0 {
                255
            } else {
                0
            }
        })
    }
}

/// Yokoi connectivity number over the four edge-adjacent positions.
fn yokoi(x: &[u8; 8]) -> i32 {
    [0usize, 2, 4, 6]
        .iter()
        .map(|&k| x[k] as i32 - (x[k] * x[k + 1] * x[(k + 2) % 8]) as i32)
        .sum()
}
