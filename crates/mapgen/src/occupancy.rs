/// Dense `(x, y) -> tile index` lookup used while a map is being grown.
///
/// Cells are stored row-major; lookups outside the grid report unoccupied.
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    size: u32,
    cells: Vec<Option<usize>>,
}

impl OccupancyIndex {
    /// Create an empty index for a `size x size` grid.
    pub fn new(size: u32) -> Self {
        let len = size as usize * size as usize;
        Self {
            size,
            cells: vec![None; len],
        }
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let size = i64::from(self.size);
        (0..size).contains(&x) && (0..size).contains(&y)
    }

    /// Index of the tile at `(x, y)`, if any.
    pub fn get(&self, x: u32, y: u32) -> Option<usize> {
        self.slot(x, y).and_then(|slot| self.cells[slot])
    }

    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.get(x, y).is_some()
    }

    /// Record `tile` at `(x, y)`. Returns false if the cell is outside the
    /// grid or already taken.
    pub fn insert(&mut self, x: u32, y: u32, tile: usize) -> bool {
        match self.slot(x, y) {
            Some(slot) if self.cells[slot].is_none() => {
                self.cells[slot] = Some(tile);
                true
            }
            _ => false,
        }
    }

    fn slot(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y as usize * self.size as usize + x as usize)
    }
}
