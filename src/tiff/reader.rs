//! TIFF/BigTIFF structure reader
//!
//! Reads the header and walks the IFD chain. Pixel data is never touched.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, SeekFrom};
use std::path::Path;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_type_size, field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::tiff::types::TIFF;

/// Upper bound on directories followed in one file
const MAX_IFDS: usize = 1024;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    byte_order: ByteOrder,
    handler: Box<dyn ByteOrderHandler>,
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    pub fn new() -> Self {
        TiffReader {
            byte_order: ByteOrder::LittleEndian,
            handler: ByteOrder::LittleEndian.create_handler(),
            is_big_tiff: false,
        }
    }

    /// Loads the structure of the TIFF file at `path`
    pub fn load(&mut self, path: &Path) -> TiffResult<TIFF> {
        info!("Reading TIFF structure of {}", path.display());
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(64 * 1024, file);
        self.read(&mut reader)
    }

    /// Reads the header and every IFD reachable from it
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        self.byte_order = ByteOrder::detect(reader)?;
        self.handler = self.byte_order.create_handler();
        debug!("Detected byte order: {}", self.byte_order.name());

        let version = self.handler.read_u16(reader)?;
        self.is_big_tiff = match version {
            header::BIG_TIFF_VERSION => {
                let offset_size = self.handler.read_u16(reader)?;
                let _reserved = self.handler.read_u16(reader)?;
                if offset_size != header::BIGTIFF_OFFSET_SIZE {
                    return Err(TiffError::InvalidBigTIFFHeader(offset_size));
                }
                true
            }
            header::TIFF_VERSION => false,
            other => return Err(TiffError::UnsupportedVersion(other)),
        };

        let first_offset = self.read_offset(reader)?;
        if first_offset < 8 || first_offset >= file_size {
            return Err(TiffError::InvalidOffset { offset: first_offset, file_size });
        }

        let mut tiff = TIFF::new(self.is_big_tiff, self.byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_offset, file_size)?;
        if tiff.ifds.is_empty() {
            return Err(TiffError::NoImage);
        }

        debug!("Read {} IFDs", tiff.ifds.len());
        Ok(tiff)
    }

    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_offset: u64, file_size: u64) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut offset = first_offset;

        while offset != 0 && ifds.len() < MAX_IFDS {
            if offset < 8 || offset >= file_size {
                warn!("IFD offset {} lies outside the file, stopping", offset);
                break;
            }
            if !visited.insert(offset) {
                warn!("IFD chain loops back to offset {}, stopping", offset);
                break;
            }

            let (ifd, next) = self.read_ifd(reader, offset, ifds.len(), file_size)?;
            ifds.push(ifd);
            offset = next;
        }

        Ok(ifds)
    }

    /// Reads one IFD and the offset of the next one
    fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize, file_size: u64) -> TiffResult<(IFD, u64)> {
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = if self.is_big_tiff {
            self.handler.read_u64(reader)?
        } else {
            self.handler.read_u16(reader)? as u64
        };

        let entry_size: u64 = if self.is_big_tiff { 20 } else { 12 };
        let end = entry_count
            .checked_mul(entry_size)
            .and_then(|size| size.checked_add(offset));
        match end {
            Some(end) if end <= file_size => {}
            _ => return Err(TiffError::InvalidOffset { offset, file_size }),
        }

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            ifd.add_entry(self.read_entry(reader)?);
        }

        let next = self.read_offset(reader)?;
        debug!("IFD #{} at {}: {} entries, next at {}", number, offset, entry_count, next);
        Ok((ifd, next))
    }

    fn read_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let tag = self.handler.read_u16(reader)?;
        let field_type = self.handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            self.handler.read_u64(reader)?
        } else {
            self.handler.read_u32(reader)? as u64
        };

        let mut field = [0u8; 8];
        let field_len = if self.is_big_tiff { 8 } else { 4 };
        reader.read_exact(&mut field[..field_len])?;

        Ok(IFDEntry::new(tag, field_type, count, self.decode_value(field_type, count, &field[..field_len])))
    }

    /// First value when stored inline, value-array offset otherwise
    fn decode_value(&self, field_type: u16, count: u64, field: &[u8]) -> u64 {
        let inline = (field_type_size(field_type) as u64).saturating_mul(count) <= field.len() as u64;
        if inline {
            match field_type {
                field_types::BYTE | field_types::SBYTE | field_types::UNDEFINED => return field[0] as u64,
                field_types::SHORT | field_types::SSHORT => return self.handler.u16_from(field) as u64,
                field_types::LONG | field_types::SLONG => return self.handler.u32_from(field) as u64,
                field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 if field.len() == 8 => {
                    return self.handler.u64_from(field)
                }
                _ => {}
            }
        }

        if field.len() == 8 {
            self.handler.u64_from(field)
        } else {
            self.handler.u32_from(field) as u64
        }
    }

    fn read_offset(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        if self.is_big_tiff {
            Ok(self.handler.read_u64(reader)?)
        } else {
            Ok(self.handler.read_u32(reader)? as u64)
        }
    }
}
