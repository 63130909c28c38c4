pub mod board;
pub mod column;
pub mod error;
pub mod id;
pub mod seed;
pub mod task;

pub use board::{Board, DragOutcome, DropTarget};
pub use column::Column;
pub use error::ZenboardError;
pub use task::{Status, SubTask, Task};
