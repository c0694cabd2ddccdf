use std::fmt;
use std::str::FromStr;
use wifiplan_common::geom::coord::Coord;
use wifiplan_common::layout::indices::RouterId;

/// Unit step of one router along a grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Probe order used by every scan.
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];

    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    /// Destination from `c`, or `None` past the top or left edge.
    #[inline]
    pub fn apply(self, c: Coord) -> Option<Coord> {
        let (dr, dc) = self.delta();
        c.offset(dr, dc)
    }

    pub fn opposite(self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }
}

/// How a scan picks among improving moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    /// First improving move in probe order.
    Greedy,
    /// Largest improvement; ties go to the first one found.
    Best,
}

impl FromStr for Policy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" | "first" => Ok(Policy::Greedy),
            "best" => Ok(Policy::Best),
            other => anyhow::bail!("unknown step policy '{}' (expected 'greedy' or 'best')", other),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Greedy => write!(f, "greedy"),
            Policy::Best => write!(f, "best"),
        }
    }
}

/// A scored candidate move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub router: RouterId,
    pub action: Action,
    pub delta: i64,
}
