//! Pure analysis of study sessions.
//!  - [duration] and [classifier] derive everything a single row can tell.
//!  - [resolver] walks sessions in time order and assigns study sets.
//!  - [sets] sums resolved sessions per set, [weekly] sums sessions per calendar week.

pub mod classifier;
pub mod duration;
pub mod resolver;
pub mod session;
pub mod sets;
pub mod weekly;
