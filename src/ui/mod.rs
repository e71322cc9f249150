pub mod console;
pub mod pages;

pub use console::Terminal;
