//! SDL2 game controller backend for `padstate`.

mod command;
mod mapping;
mod source;

pub use command::SdlRumble;
pub use source::SdlSource;
