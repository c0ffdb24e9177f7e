pub mod cli;
pub mod gesture;
pub mod io;
pub mod model;
pub mod ops;
pub mod util;
