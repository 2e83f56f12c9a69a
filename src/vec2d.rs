use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::data::Pos;

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct Vec2d<T> {
    data: Vec<T>,
    rows: u8,
    cols: u8,
}

impl<T> Vec2d<T> {
    pub(crate) fn rows(&self) -> u8 {
        self.rows
    }

    pub(crate) fn cols(&self) -> u8 {
        self.cols
    }

    pub(crate) fn contains(&self, pos: Pos) -> bool {
        pos.r < self.rows && pos.c < self.cols
    }

    pub(crate) fn get(&self, pos: Pos) -> Option<&T> {
        if self.contains(pos) {
            Some(&self[pos])
        } else {
            None
        }
    }

    pub(crate) fn positions(&self) -> impl Iterator<Item = Pos> {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |r| (0..cols).map(move |c| Pos::new(r, c)))
    }

    pub(crate) fn scratchpad<U: Default + Clone>(&self) -> Vec2d<U> {
        self.scratchpad_with_default(U::default())
    }

    pub(crate) fn scratchpad_with_default<U: Clone>(&self, default: U) -> Vec2d<U> {
        Vec2d {
            data: vec![default; self.data.len()],
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Clone> Vec2d<T> {
    /// Pads shorter rows with `padding`. The caller checks the size fits into `u8`.
    pub(crate) fn new(grid: &[Vec<T>], padding: T) -> Self {
        let max_cols = grid.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut data = Vec::with_capacity(grid.len() * max_cols);
        for row in grid {
            data.extend_from_slice(row);
            for _ in row.len()..max_cols {
                data.push(padding.clone());
            }
        }
        Vec2d {
            data,
            rows: grid.len() as u8,
            cols: max_cols as u8,
        }
    }
}

impl Display for Vec2d<bool> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.cols == 0 {
            return Ok(());
        }
        for row in self.data.chunks(self.cols.into()) {
            for &cell in row {
                write!(f, "{}", if cell { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: Debug> Debug for Vec2d<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vec2d {}x{}", self.rows, self.cols)?;
        if self.cols == 0 {
            return Ok(());
        }
        for row in self.data.chunks(self.cols.into()) {
            writeln!(f, "{:?}", row)?;
        }
        Ok(())
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        // out of bounds here means a broken invariant, not bad input
        assert!(
            self.contains(index),
            "{:?} is outside the {}x{} grid",
            index,
            self.rows,
            self.cols
        );
        let index = usize::from(index.r) * usize::from(self.cols) + usize::from(index.c);
        &self.data[index]
    }
}

impl<T> IndexMut<Pos> for Vec2d<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        assert!(
            self.contains(index),
            "{:?} is outside the {}x{} grid",
            index,
            self.rows,
            self.cols
        );
        let index = usize::from(index.r) * usize::from(self.cols) + usize::from(index.c);
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_rows() {
        let grid = vec![vec![true, true, true], vec![true], vec![false, true]];
        let grid = Vec2d::new(&grid, false);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.to_string(), "111\n100\n010\n");
        assert_eq!(grid.positions().count(), 9);
    }

    #[test]
    fn bounds() {
        let grid = Vec2d::new(&[vec![1, 2], vec![3, 4]], 0);
        assert_eq!(grid[Pos::new(1, 0)], 3);
        assert_eq!(grid.get(Pos::new(2, 0)), None);
        assert_eq!(grid.get(Pos::new(0, 2)), None);
        let scratch: Vec2d<bool> = grid.scratchpad();
        assert_eq!(scratch.to_string(), "00\n00\n");
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_is_fatal() {
        let grid = Vec2d::new(&[vec![1, 2], vec![3, 4]], 0);
        let _ = grid[Pos::new(0, 2)];
    }
}
