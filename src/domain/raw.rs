// ============================================================
// Layer 3 — Raw Image Domain Type
// ============================================================
// Represents a single image record exactly as it was read from
// an IDX file. This is a plain data struct with no behaviour
// beyond a size helper: one unnormalized pixel buffer plus the
// grid dimensions that shape it.
//
// Raw labels need no struct of their own. A raw label is one
// byte per record, so the loader hands them over as Vec<u8>.
//
// Reference: Rust Book §5 (Structs and Methods)

/// One raw image exactly as stored on disk: row-major pixel
/// bytes (0-255) and the grid dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    /// Row-major pixel intensities, `rows * cols` bytes long
    pub pixels: Vec<u8>,

    /// Number of pixel rows in the grid
    pub rows: usize,

    /// Number of pixel columns in the grid
    pub cols: usize,
}

impl RawImage {
    /// Create a raw image record from its pixel buffer and
    /// grid dimensions.
    pub fn new(pixels: Vec<u8>, rows: usize, cols: usize) -> Self {
        Self { pixels, rows, cols }
    }

    /// Number of pixels this record carries (`rows * cols`).
    pub fn pixel_count(&self) -> usize {
        self.rows * self.cols
    }
}
