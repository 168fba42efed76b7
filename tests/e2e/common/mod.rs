pub mod containers;
pub mod logs;
