pub mod card;
pub mod task_board;
