//! Text layout for the track listing
//!
//! Pure functions only: the caller supplies the width measurement, so the
//! same code runs against real font metrics and against test doubles.

pub mod lines;
pub mod normalize;

pub use lines::{layout_lines, FlushPolicy, LineOptions};
pub use normalize::{normalize_tracks, strip_featured};
