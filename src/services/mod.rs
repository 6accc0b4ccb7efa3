pub mod email;
pub mod sorter;
