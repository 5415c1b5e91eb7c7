pub mod hotkeys;
pub mod ring_buffer;

pub use hotkeys::{KeyAction, KeyEvent, interpret};
pub use ring_buffer::DetectionBuffer;
