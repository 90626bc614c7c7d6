//! viewmode CLI
//!
//! `viewmode <title-or-url>` prints the viewing mode, or the picture mode and
//! audio profile pair, for one video.

pub mod cli;

pub use cli::{load_config, render, Cli};
