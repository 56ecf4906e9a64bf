//! Seekable reader trait
//!
//! Files on disk and in-memory cursors are read the same way.

use std::io::{Read, Seek};

/// A reader that can also seek
pub trait SeekableReader: Read + Seek {}

impl<T: Read + Seek> SeekableReader for T {}
