//! Common test infrastructure for album-poster integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod fixtures;
pub mod mock_spotify;

pub use assertions::*;
pub use fixtures::FixedMetrics;
pub use mock_spotify::MockSpotify;
