pub mod file;
pub mod filter;
pub mod history;

pub use file::*;
pub use filter::*;
pub use history::*;
