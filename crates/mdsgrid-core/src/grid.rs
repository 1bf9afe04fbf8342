//! The static MDS logo: a 16×16 table of gray levels and the glyph tables
//! used to draw it in a text terminal.
//!
//! Every cell is drawn as a pair of identical block characters so that a
//! cell comes out roughly square on a typical terminal font.

/// Logo width in cells.
pub const GRID_WIDTH: usize = 16;
/// Logo height in cells.
pub const GRID_HEIGHT: usize = 16;
/// Total number of cells in the logo.
pub const CELL_COUNT: usize = GRID_WIDTH * GRID_HEIGHT;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// A 24-bit RGB color, stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

#[rustfmt::skip]
const MDS_LOGO: [u32; CELL_COUNT] = [
    0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x262626, 0x404040, 0x1d1d1d, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x262626, 0x0f0f0f, 0x404040, 0x171717, 0x2b2b2b, 0x3e3e3e, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x171717, 0x0f0f0f, 0x101010, 0x101010, 0x111111, 0x111111, 0x404040, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x151515, 0x3f3f3f, 0x111111, 0x101010, 0x111111, 0x111111, 0x1f1f1f, 0xc7c7c7, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x272727, 0x111111, 0x111111, 0x0f0f0f, 0x111111, 0x111111, 0x1f1f1f, 0x767676, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x1d1d1d, 0x929292, 0x404040, 0x262626, 0x111111, 0x111111, 0x121212, 0x767676, 0x1b1b1b, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x0f0f0f, 0x929292, 0x404040, 0x3a3a3a, 0x111111, 0x111111, 0x1d1d1d, 0xbbbbbb, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x1b1b1b, 0x5b5b5b, 0x232323, 0x111111, 0x111111, 0x111111, 0x3c3c3c, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x5e5e5e, 0x5e5e5e, 0x5e5e5e, 0x0f0f0f, 0x111111, 0x262626, 0x9b9b9b, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x5e5e5e, 0x111111, 0x1a1a1a, 0x0f0f0f, 0x111111, 0x1b1b1b, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x3e3e3e, 0x5e5e5e, 0x111111, 0x111111, 0x1b1b1b, 0x515151, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111,
    0x111111, 0x111111, 0x171717, 0x171717, 0x5e5e5e, 0x242424, 0x111111, 0x111111, 0x1b1b1b, 0xa2a2a2, 0x262626, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111,
    0x171717, 0x171717, 0x111111, 0x111111, 0x111111, 0x131313, 0x111111, 0x111111, 0x5d5d5d, 0x1a1a1a, 0x3a3a3a, 0x262626, 0x111111, 0x111111, 0x111111, 0x111111,
    0x171717, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x222222, 0x111111, 0x1a1a1a, 0x1a1a1a, 0x1a1a1a, 0x2b2b2b, 0x222222, 0x3a3a3a, 0x111111, 0x111111,
    0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x111111, 0x171717, 0x171717, 0x171717, 0x2b2b2b, 0x2b2b2b, 0x222222, 0x222222, 0x3a3a3a, 0x111111,
];

// ---------------------------------------------------------------------------
// Glyphs
// ---------------------------------------------------------------------------

/// One of the shade levels a cell can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// `█`
    Full,
    /// `▓`
    Dark,
    /// `▒`
    Medium,
    /// `░`
    Light,
    /// Two spaces.
    Blank,
}

impl Glyph {
    pub const fn as_char(self) -> char {
        match self {
            Self::Full => '█',
            Self::Dark => '▓',
            Self::Medium => '▒',
            Self::Light => '░',
            Self::Blank => ' ',
        }
    }

    /// Append the double-wide rendering of this glyph to `out`.
    pub fn push_to(self, out: &mut String) {
        let c = self.as_char();
        out.push(c);
        out.push(c);
    }

    /// Map a logo color to its glyph. Colors outside the table draw blank.
    pub fn from_color(color: Rgb) -> Self {
        match color.0 {
            0x111111 => Self::Blank,
            0x262626 => Self::Light,
            0x404040 => Self::Medium,
            0x767676 => Self::Dark,
            0xc7c7c7 | 0x929292 | 0xbbbbbb | 0x9b9b9b | 0xa2a2a2 => Self::Full,
            _ => Self::Blank,
        }
    }
}

/// Fade levels for trace marks, from fully lit to blank.
pub const FADE_TABLE: [Glyph; 6] = [
    Glyph::Full,
    Glyph::Dark,
    Glyph::Medium,
    Glyph::Light,
    Glyph::Blank,
    Glyph::Blank,
];

// ---------------------------------------------------------------------------
// ColorGrid
// ---------------------------------------------------------------------------

/// Immutable row-major grid of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGrid {
    width: usize,
    height: usize,
    cells: Vec<Rgb>,
}

impl ColorGrid {
    /// The built-in MDS logo.
    pub fn mds() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            cells: MDS_LOGO.iter().copied().map(Rgb).collect(),
        }
    }

    /// Build a grid from explicit cells. Returns `None` if `cells.len()`
    /// is not `width * height` or either dimension is zero.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Rgb>) -> Option<Self> {
        if width == 0 || height == 0 || cells.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// A grid where every cell has the same color.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            cells: vec![color; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Color at a flat index, if in range.
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Rgb] {
        &self.cells
    }
}

impl Default for ColorGrid {
    fn default() -> Self {
        Self::mds()
    }
}
