//! HTTP Handlers

mod audio;
mod convert;
mod ping;
mod voice;

pub use audio::*;
pub use convert::*;
pub use ping::*;
pub use voice::*;
