//! Terrain grid and vegetation map
//!
//! The terrain grid holds the mutable cell states; the vegetation map holds the
//! per-cell vegetation label assigned when the terrain was generated. Both are
//! row-major [`Field`]s of the same shape.

use super::field::Field;
use crate::core_types::{CellState, VegetationType};
use crate::error::{FireSimError, Result};

/// Grid of cell states
pub type TerrainGrid = Field<CellState>;

/// Per-cell vegetation labels
pub type VegetationMap = Field<VegetationType>;

impl Field<CellState> {
    /// Build a grid from row-major integer cell codes
    pub fn from_codes(rows: usize, cols: usize, codes: &[u8]) -> Result<Self> {
        if codes.len() != rows * cols {
            return Err(FireSimError::BufferSizeMismatch {
                expected: rows * cols,
                found: codes.len(),
            });
        }
        let cells = codes
            .iter()
            .map(|&code| CellState::try_from(code))
            .collect::<Result<Vec<_>>>()?;
        Ok(Field::from_vec(rows, cols, cells))
    }

    /// Build a grid from nested rows of integer cell codes
    pub fn from_code_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let states = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&code| CellState::try_from(code))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Field::from_rows(states)
    }

    /// Integer codes as nested rows
    pub fn to_code_rows(&self) -> Vec<Vec<u8>> {
        self.map(|state| state.code()).to_rows()
    }

    /// Number of cells in `state`
    pub fn count(&self, state: CellState) -> usize {
        self.iter().filter(|&&s| s == state).count()
    }

    /// Flat indices of all cells in `state`, in row-major order
    pub fn indices_of(&self, state: CellState) -> Vec<usize> {
        self.iter()
            .enumerate()
            .filter_map(|(i, &s)| (s == state).then_some(i))
            .collect()
    }

    /// Whether any cell is burning
    pub fn has_fire(&self) -> bool {
        self.iter().any(|&s| s == CellState::Burning)
    }

    /// Number of cells that can still catch fire
    pub fn flammable_count(&self) -> usize {
        self.iter().filter(|s| s.is_flammable()).count()
    }
}

impl Field<VegetationType> {
    /// Build a vegetation map from nested rows of labels
    ///
    /// Unknown labels fail instead of falling back to bare ground.
    pub fn from_labels<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self> {
        let types = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|label| label.as_ref().parse::<VegetationType>())
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Field::from_rows(types)
    }

    /// Vegetation map matching a grid: bush cells get `bush`, everything else
    /// gets `fill`
    pub fn uniform_for(grid: &TerrainGrid, fill: VegetationType) -> Self {
        grid.map(|&state| match state {
            CellState::Bush => VegetationType::Bush,
            CellState::Vegetation | CellState::Burning | CellState::BurnedOut => fill,
            CellState::Empty | CellState::Water => VegetationType::Bare,
        })
    }
}

/// Check that a grid and a vegetation map describe the same cells
pub fn ensure_same_shape(grid: &TerrainGrid, vegetation: &VegetationMap) -> Result<()> {
    if grid.same_shape(vegetation) {
        Ok(())
    } else {
        Err(FireSimError::ShapeMismatch {
            grid: grid.shape(),
            vegetation: vegetation.shape(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_rows() {
        let grid = TerrainGrid::from_code_rows(&[vec![0, 3, 0], vec![0, 0, 2], vec![3, 0, 0]])
            .unwrap();
        assert_eq!(grid.shape(), (3, 3));
        assert_eq!(grid[(0, 1)], CellState::Water);
        assert_eq!(grid[(1, 2)], CellState::Burning);
        assert_eq!(grid.count(CellState::Water), 2);
        assert!(grid.has_fire());
        assert_eq!(grid.indices_of(CellState::Water), vec![1, 6]);
        assert_eq!(
            grid.to_code_rows(),
            vec![vec![0, 3, 0], vec![0, 0, 2], vec![3, 0, 0]]
        );
    }

    #[test]
    fn test_invalid_code_rejected() {
        let err = TerrainGrid::from_code_rows(&[vec![0, 7]]).unwrap_err();
        assert_eq!(err, FireSimError::InvalidCellCode(7));
        assert!(TerrainGrid::from_codes(2, 2, &[0, 1, 2]).is_err());
    }

    #[test]
    fn test_from_labels() {
        let map = VegetationMap::from_labels(&[vec!["pine", "None"], vec!["bush", "oak"]]).unwrap();
        assert_eq!(map[(0, 1)], VegetationType::Bare);
        assert_eq!(map[(1, 0)], VegetationType::Bush);

        let err = VegetationMap::from_labels(&[vec!["pine", "palm"]]).unwrap_err();
        assert_eq!(err, FireSimError::UnknownVegetationType("palm".to_string()));
    }

    #[test]
    fn test_uniform_for() {
        use VegetationType::{Bare, Bush, Oak};

        let grid = TerrainGrid::from_code_rows(&[vec![1, 5, 3], vec![0, 2, 4]]).unwrap();
        let map = VegetationMap::uniform_for(&grid, Oak);
        assert_eq!(
            map.to_rows(),
            vec![vec![Oak, Bush, Bare], vec![Bare, Oak, Oak]]
        );
    }

    #[test]
    fn test_shape_check() {
        let grid = TerrainGrid::new(3, 3);
        let map = VegetationMap::new(3, 4);
        assert!(ensure_same_shape(&grid, &map).is_err());
        assert!(ensure_same_shape(&grid, &VegetationMap::new(3, 3)).is_ok());
    }
}
