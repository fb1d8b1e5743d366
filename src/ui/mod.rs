pub mod braille;
pub mod overlay;
pub mod render;
pub mod terminal;

pub use overlay::{OverlayMessage, OverlayStyle};
pub use render::{render, BoardViewport};
pub use terminal::TerminalFrontend;
