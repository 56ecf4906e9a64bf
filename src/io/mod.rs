//! I/O helpers for reading binary file structure

pub mod seekable;
pub mod byte_order;
