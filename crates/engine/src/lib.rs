//! AI and orchestration on top of the core rules.
//!
//! - [`features`]: board measurements for the placement heuristic
//! - [`search`]: exhaustive placement search (direct and hold swap)
//! - [`place`]: execute a placement on a live game in one call
//! - [`pilot`]: pace a placement into one intent per decision
//! - [`session`]: a game plus demo-mode switching and auto-restart

pub mod features;
pub mod pilot;
pub mod place;
pub mod search;
pub mod session;

pub use pilot::{DemoPilot, PilotPhase};
pub use place::{apply_place, apply_placement, PlaceError};
pub use search::{find_best_placement, Placement};
pub use session::{Session, SessionSnapshot};
