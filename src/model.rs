//! Landscape data types.

use std::fmt;

/// State of a single grid cell during one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// No fuel, cannot ignite.
    #[default]
    Empty,
    /// Flammable forest fuel.
    Tree,
    /// Flammable structure whose survival is measured.
    House,
    /// On fire for `stage` generations; stage 0 is ignition.
    Burning(u32),
}

/// Display category of a cell, merging every burn stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Empty,
    Tree,
    House,
    Burning,
}

impl Cell {
    pub fn category(self) -> Category {
        match self {
            Cell::Empty => Category::Empty,
            Cell::Tree => Category::Tree,
            Cell::House => Category::House,
            Cell::Burning(_) => Category::Burning,
        }
    }

    pub fn is_burning(self) -> bool {
        matches!(self, Cell::Burning(_))
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Tree => 'T',
            Cell::House => 'H',
            Cell::Burning(_) => '*',
        }
    }
}

/// Landscape at a given generation.
///
/// Cells are stored column by column; column `width - 1` is the settlement column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of empty cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Create a grid whose cell at `(x, y)` is `f(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Cell,
    {
        let mut cells = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Index of the settlement column; `None` for a grid without columns.
    pub fn settlement_x(&self) -> Option<usize> {
        self.width.checked_sub(1)
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.idx(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        let i = self.idx(x, y);
        self.cells[i] = cell;
    }

    /// States of the in-bounds 4-connected neighbors of `(x, y)`.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = Cell> + '_ {
        let left = x.checked_sub(1).map(|nx| (nx, y));
        let right = (x + 1 < self.width).then_some((x + 1, y));
        let down = y.checked_sub(1).map(|ny| (x, ny));
        let up = (y + 1 < self.height).then_some((x, y + 1));
        [left, right, down, up]
            .into_iter()
            .flatten()
            .map(move |(nx, ny)| self.get(nx, ny))
    }

    /// Whether any 4-connected neighbor of `(x, y)` is burning.
    pub fn neighbor_on_fire(&self, x: usize, y: usize) -> bool {
        self.neighbors(x, y).any(Cell::is_burning)
    }

    /// Number of cells in a display category.
    pub fn count(&self, category: Category) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.category() == category)
            .count()
    }

    /// Number of houses standing in the settlement column.
    pub fn house_count(&self) -> usize {
        let Some(x) = self.settlement_x() else {
            return 0;
        };
        (0..self.height)
            .filter(|&y| self.get(x, y) == Cell::House)
            .count()
    }

    /// Coordinates of the cells in a display category, as separate x and y lists.
    pub fn points(&self, category: Category) -> (Vec<usize>, Vec<usize>) {
        let mut xc = Vec::new();
        let mut yc = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                if self.get(x, y).category() == category {
                    xc.push(x);
                    yc.push(y);
                }
            }
        }
        (xc, yc)
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) is outside the {}x{} grid",
            self.width,
            self.height
        );
        x * self.height + y
    }
}

impl fmt::Display for Grid {
    /// Text map with the top row first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            let row: String = (0..self.width).map(|x| self.get(x, y).symbol()).collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Ordered sequence of generations produced by a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    generations: Vec<Grid>,
}

impl History {
    pub fn new(initial: Grid) -> Self {
        Self {
            generations: vec![initial],
        }
    }

    pub fn push(&mut self, grid: Grid) {
        self.generations.push(grid);
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn get(&self, i_gen: usize) -> Option<&Grid> {
        self.generations.get(i_gen)
    }

    pub fn last(&self) -> Option<&Grid> {
        self.generations.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grid> {
        self.generations.iter()
    }
}
