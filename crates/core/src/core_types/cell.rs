use crate::error::FireSimError;
use serde::{Deserialize, Serialize};

/// State of a single terrain cell
///
/// The integer codes are the ones used by the grid files produced for the
/// experiments (`0` empty through `5` bush).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Bare or unplanted ground, never burns
    #[default]
    Empty = 0,
    /// Tree cover
    Vegetation = 1,
    /// Actively burning
    Burning = 2,
    /// Water body, never burns and raises nearby humidity
    Water = 3,
    /// Already burned during this run (terminal)
    BurnedOut = 4,
    /// Dense, highly flammable undergrowth
    Bush = 5,
}

impl CellState {
    /// Integer code of this state
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether fire can spread into a cell in this state
    #[inline]
    pub fn is_flammable(self) -> bool {
        matches!(self, CellState::Vegetation | CellState::Bush)
    }

    /// Whether the state can never change during a run
    #[inline]
    pub fn is_inert(self) -> bool {
        matches!(self, CellState::Empty | CellState::Water)
    }
}

impl TryFrom<u8> for CellState {
    type Error = FireSimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CellState::Empty),
            1 => Ok(CellState::Vegetation),
            2 => Ok(CellState::Burning),
            3 => Ok(CellState::Water),
            4 => Ok(CellState::BurnedOut),
            5 => Ok(CellState::Bush),
            other => Err(FireSimError::InvalidCellCode(other)),
        }
    }
}

impl From<CellState> for u8 {
    fn from(state: CellState) -> Self {
        state.code()
    }
}
