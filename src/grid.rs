// grid.rs - Square row-major cell grids
//
// Every per-cell map in the pipeline (brightness, foreground, height) is an
// R x R grid addressed either by (row, col) or by flat index r*R + c.

use std::ops::{Index, IndexMut};

#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

/// Per-cell luminance in [0, 1]
pub type BrightnessMap = Grid<f32>;
/// true = printable foreground
pub type Mask = Grid<bool>;
/// Per-cell height above Z=0
pub type HeightMap = Grid<f32>;

impl<T: Copy> Grid<T> {
    pub fn filled(size: usize, value: T) -> Self {
        Self { size, cells: vec![value; size * size] }
    }

    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for r in 0..size {
            for c in 0..size {
                cells.push(f(r, c));
            }
        }
        Self { size, cells }
    }

    /// Wrap existing row-major cells. Panics if `cells.len() != size * size`.
    pub fn from_cells(size: usize, cells: Vec<T>) -> Self {
        assert_eq!(cells.len(), size * size, "grid cell count must be size^2");
        Self { size, cells }
    }

    #[inline]
    pub fn size(&self) -> usize { self.size }

    #[inline]
    pub fn len(&self) -> usize { self.cells.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    #[inline]
    pub fn cells(&self) -> &[T] { &self.cells }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [T] { &mut self.cells }

    #[inline]
    pub fn index_of(&self, r: usize, c: usize) -> usize { r * self.size + c }

    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) { (idx / self.size, idx % self.size) }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> T { self.cells[r * self.size + c] }

    /// Cell at signed coordinates, None outside the grid
    #[inline]
    pub fn get_signed(&self, r: isize, c: isize) -> Option<T> {
        let n = self.size as isize;
        if r < 0 || c < 0 || r >= n || c >= n { return None; }
        Some(self.cells[r as usize * self.size + c as usize])
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: T) {
        let idx = self.index_of(r, c);
        self.cells[idx] = value;
    }

    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid { size: self.size, cells: self.cells.iter().copied().map(f).collect() }
    }

    /// Mirror left-right: cell (r, c) takes the value of (r, R-1-c)
    pub fn flip_horizontal(&self) -> Self {
        let n = self.size;
        Self::from_fn(n, |r, c| self.get(r, n - 1 - c))
    }
}

impl Mask {
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&fg| fg).count()
    }

    /// Every foreground cell of `self` is also foreground in `other`
    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.size == other.size
            && self.cells.iter().zip(&other.cells).all(|(&a, &b)| !a || b)
    }
}

impl<T> Index<usize> for Grid<T> {
    type Output = T;
    #[inline]
    fn index(&self, idx: usize) -> &T { &self.cells[idx] }
}

impl<T> IndexMut<usize> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut T { &mut self.cells[idx] }
}

/// 4-connected neighbours of `idx` in a `size` x `size` grid, bounds-checked.
/// Order: up, down, left, right.
#[inline]
pub fn neighbors4(size: usize, idx: usize) -> impl Iterator<Item = usize> {
    let (r, c) = (idx / size, idx % size);
    let up = (r > 0).then(|| idx - size);
    let down = (r + 1 < size).then(|| idx + size);
    let left = (c > 0).then(|| idx - 1);
    let right = (c + 1 < size).then(|| idx + 1);
    [up, down, left, right].into_iter().flatten()
}
