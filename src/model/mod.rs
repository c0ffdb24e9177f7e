pub mod config;
pub mod list;
pub mod store;
pub mod task;
pub mod theme;

pub use config::*;
pub use list::*;
pub use store::*;
pub use task::*;
pub use theme::*;
