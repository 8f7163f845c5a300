//! cover-palette: colors and themes for album posters
//!
//! - [`Palette::extract`] finds the dominant colors of the artwork
//! - [`select_foreground`] picks black or white text for a background
//! - [`Theme`] pairs a background with its computed foreground
//! - [`all_candidates`] lists every background the multi-variant mode renders
//!
//! ```
//! use cover_palette::{select_foreground, Color, ForegroundName, Theme};
//!
//! assert_eq!(select_foreground(Color::BLACK).name, ForegroundName::White);
//!
//! let theme = Theme::from_background(Color::new(29, 185, 84));
//! assert_eq!(theme.foreground().name, ForegroundName::Black);
//! ```

pub mod color;
pub mod contrast;
pub mod error;
pub mod palette;
pub mod theme;

pub use color::Color;
pub use contrast::{relative_luminance, select_foreground, Foreground, ForegroundName};
pub use error::{PaletteError, ParseColorError};
pub use self::palette::Palette;
pub use theme::{all_candidates, Theme};
