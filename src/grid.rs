//! Row-major 2D buffers.
//!
//! [`Grid`] owns one contiguous `Vec<T>` and only hands out elements through
//! checked `(x, y)` accessors. The field buffer and the pixel buffer are both
//! grids.

use std::ops::{Index, IndexMut};

use crate::color::Rgba;

/// Static per-pixel field values for palette-indexed scenes.
pub type FieldBuffer = Grid<u32>;

/// Per-frame output pixels.
pub type PixelBuffer = Grid<Rgba>;

/// A `width * height` row-major buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid filled with `value`.
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Create a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self { width, height, cells }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of `(x, y)`, or `None` when out of range.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.offset(x, y).map(move |i| &mut self.cells[i])
    }

    /// Overwrite every cell with `f(x, y)`.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize, usize) -> T) {
        let width = self.width;
        for (row_index, row) in self.cells.chunks_exact_mut(width.max(1)).enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = f(x, row_index);
            }
        }
    }

    /// Iterate rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks_exact(self.width.max(1))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        match self.offset(x, y) {
            Some(i) => &self.cells[i],
            None => panic!(
                "grid index ({}, {}) out of range for {}x{}",
                x, y, self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        let (width, height) = (self.width, self.height);
        match self.offset(x, y) {
            Some(i) => &mut self.cells[i],
            None => panic!("grid index ({}, {}) out of range for {}x{}", x, y, width, height),
        }
    }
}

impl PixelBuffer {
    /// Raw RGBA8 bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }
}
