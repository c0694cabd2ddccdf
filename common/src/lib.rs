pub mod error;
pub mod geom;
pub mod layout;
pub mod util;

pub use error::{LayoutError, PlacementError};
pub use geom::coord::Coord;
pub use layout::grid::{CellKind, Grid};
pub use layout::indices::{EntryId, RouterId};
pub use layout::instance::Instance;
pub use layout::routers::RouterSet;
