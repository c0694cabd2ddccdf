use crate::geom::coord::Coord;
use crate::layout::grid::CellKind;
use thiserror::Error;

/// A router position that can never be stored in a `RouterSet`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("router position {coord} is outside the {height}x{width} grid")]
    OutOfBounds { coord: Coord, height: u32, width: u32 },

    #[error("router position {coord} is a {kind:?} cell, not a target")]
    NotTarget { coord: Coord, kind: CellKind },

    #[error("router at {from} cannot move past the top or left edge")]
    OffGrid { from: Coord },

    #[error("a router is already placed at {0}")]
    Duplicate(Coord),
}

/// Malformed building layout or instance parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("grid has no cells")]
    Empty,

    #[error("unknown cell symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { row: u32, col: u32, symbol: char },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: u32, expected: u32, found: u32 },

    #[error("expected {expected} cells, got {found}")]
    CellCount { expected: usize, found: usize },

    #[error("backbone origin {origin} is outside the {height}x{width} grid")]
    OriginOutOfBounds { origin: Coord, height: u32, width: u32 },
}
