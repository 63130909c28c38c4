use crate::task::Status;

/// A fixed status bucket on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub id: Status,
    pub title: &'static str,
}

impl Column {
    pub const ALL: [Column; 3] = [
        Column {
            id: Status::Todo,
            title: "To Do",
        },
        Column {
            id: Status::InProgress,
            title: "In Progress",
        },
        Column {
            id: Status::Done,
            title: "Done",
        },
    ];

    pub fn for_status(status: Status) -> Column {
        Column::ALL[status.index()]
    }
}
