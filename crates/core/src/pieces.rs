//! Pieces module - piece catalog, masks and rotation
//!
//! Every kind has an immutable base mask (row-major, `true` = filled). A live
//! [`Piece`] carries its own copy of the mask, which only ever changes through
//! [`Piece::rotated_mask`]: a 90° clockwise turn of the current mask, with the
//! I piece additionally trimmed to its bounding box so it alternates between a
//! 1x4 and a 4x1 footprint.

use crate::types::{PieceKind, BOARD_WIDTH};

/// Largest mask side length in the catalog
pub const MAX_MASK_DIM: usize = 4;

/// Rectangular grid of filled/empty flags, at most 4x4.
///
/// Stored inline so copying a piece never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask {
    width: u8,
    height: u8,
    rows: [[bool; MAX_MASK_DIM]; MAX_MASK_DIM],
}

impl Mask {
    /// Build a mask from a `0`/`1` grid. Anything beyond 4x4 is dropped.
    pub fn from_grid<const W: usize, const H: usize>(grid: &[[u8; W]; H]) -> Self {
        let width = W.min(MAX_MASK_DIM);
        let height = H.min(MAX_MASK_DIM);
        let mut rows = [[false; MAX_MASK_DIM]; MAX_MASK_DIM];
        for (r, row) in grid.iter().take(height).enumerate() {
            for (c, &v) in row.iter().take(width).enumerate() {
                rows[r][c] = v != 0;
            }
        }
        Self {
            width: width as u8,
            height: height as u8,
            rows,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the cell at (row, col) is filled. Out of range reads as empty.
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.height as usize && col < self.width as usize && self.rows[row][col]
    }

    /// Iterate filled cells as (row, col), row-major
    pub fn filled(&self) -> impl Iterator<Item = (u8, u8)> {
        let mask = *self;
        (0..mask.height).flat_map(move |r| {
            (0..mask.width).filter_map(move |c| mask.rows[r as usize][c as usize].then_some((r, c)))
        })
    }

    pub fn filled_count(&self) -> usize {
        self.filled().count()
    }

    /// 90° clockwise rotation: `rotated[j][H-1-i] = mask[i][j]`.
    ///
    /// A HxW mask becomes WxH.
    pub fn rotate_cw(&self) -> Self {
        let h = self.height as usize;
        let w = self.width as usize;
        let mut rows = [[false; MAX_MASK_DIM]; MAX_MASK_DIM];
        for i in 0..h {
            for j in 0..w {
                rows[j][h - 1 - i] = self.rows[i][j];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            rows,
        }
    }

    /// Shrink to the minimal bounding box of the filled cells.
    ///
    /// An empty mask is returned unchanged.
    pub fn trimmed(&self) -> Self {
        let mut min_r = usize::MAX;
        let mut max_r = 0;
        let mut min_c = usize::MAX;
        let mut max_c = 0;
        for (r, c) in self.filled() {
            let (r, c) = (r as usize, c as usize);
            min_r = min_r.min(r);
            max_r = max_r.max(r);
            min_c = min_c.min(c);
            max_c = max_c.max(c);
        }
        if min_r == usize::MAX {
            return *self;
        }

        let mut rows = [[false; MAX_MASK_DIM]; MAX_MASK_DIM];
        for r in min_r..=max_r {
            for c in min_c..=max_c {
                rows[r - min_r][c - min_c] = self.rows[r][c];
            }
        }
        Self {
            width: (max_c - min_c + 1) as u8,
            height: (max_r - min_r + 1) as u8,
            rows,
        }
    }
}

/// Base mask for a piece kind
pub fn base_mask(kind: PieceKind) -> Mask {
    match kind {
        PieceKind::I => Mask::from_grid(&[[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
        PieceKind::J => Mask::from_grid(&[[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
        PieceKind::L => Mask::from_grid(&[[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
        PieceKind::O => Mask::from_grid(&[[1, 1], [1, 1]]),
        PieceKind::S => Mask::from_grid(&[[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
        PieceKind::T => Mask::from_grid(&[[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
        PieceKind::Z => Mask::from_grid(&[[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
    }
}

/// Candidate mask after one clockwise turn of `mask` for `kind`.
///
/// Pure: the caller validates it against the board before committing.
pub fn rotate(kind: PieceKind, mask: &Mask) -> Mask {
    let rotated = mask.rotate_cw();
    if kind == PieceKind::I {
        rotated.trimmed()
    } else {
        rotated
    }
}

/// Spawn column for a mask: horizontally centered
pub fn spawn_x(mask: &Mask) -> i8 {
    (BOARD_WIDTH / 2) as i8 - (mask.width() / 2) as i8
}

/// A positioned, rotatable instance of a catalog kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    mask: Mask,
    x: i8,
    y: i8,
}

impl Piece {
    /// Fresh piece in its base orientation at the spawn position
    pub fn new(kind: PieceKind) -> Self {
        let mask = base_mask(kind);
        Self {
            kind,
            mask,
            x: spawn_x(&mask),
            y: 0,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Column of the mask's top-left corner
    pub fn x(&self) -> i8 {
        self.x
    }

    /// Row of the mask's top-left corner
    pub fn y(&self) -> i8 {
        self.y
    }

    /// Candidate mask for a clockwise rotation (not applied)
    pub fn rotated_mask(&self) -> Mask {
        rotate(self.kind, &self.mask)
    }

    /// Move back to the spawn position for the current mask
    pub(crate) fn reset_to_spawn(&mut self) {
        self.x = spawn_x(&self.mask);
        self.y = 0;
    }

    pub(crate) fn set_position(&mut self, x: i8, y: i8) {
        self.x = x;
        self.y = y;
    }

    /// Commit a rotation. `mask` must come from [`Piece::rotated_mask`].
    pub(crate) fn apply_rotation(&mut self, mask: Mask, x: i8) {
        self.mask = mask;
        self.x = x;
    }
}
