pub mod list_ops;
pub mod search;
pub mod task_ops;
pub mod view;

pub use list_ops::RemovedList;
pub use search::{SearchHit, TextQuery, search_tasks};
pub use task_ops::{RemovedTask, validate_task_text};
pub use view::{AllTasksGroups, Filter, Section, SectionCount};
