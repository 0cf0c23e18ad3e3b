//! Interactive commit message selector.

pub mod render;
pub mod session;
pub mod terminal;

pub use render::render;
pub use session::{Decision, Key, Mode, SelectionSession};
pub use terminal::{map_key_event, run_selection};
