//! Minimal zip writer for Open Packaging Convention files.
//!
//! Entries are deflated in memory and the whole archive is returned as one
//! buffer, so a failed export never leaves a partial file behind.

use std::io::{self, Write};

use chrono::{Datelike, NaiveDateTime, Timelike};

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;
const VERSION: u16 = 20;
const METHOD_DEFLATE: u16 = 8;
/// Bit 11: file names are UTF-8.
const FLAG_UTF8: u16 = 1 << 11;
const COMPRESSION_LEVEL: u8 = 6;

struct CentralEntry {
    name: String,
    crc: u32,
    compressed_size: u32,
    size: u32,
    offset: u32,
}

pub struct PackageWriter {
    buf: Vec<u8>,
    entries: Vec<CentralEntry>,
    dos_time: u16,
    dos_date: u16,
}

impl PackageWriter {
    /// Every entry is stamped with `modified`.
    pub fn new(modified: NaiveDateTime) -> Self {
        let (dos_time, dos_date) = dos_timestamp(modified);
        Self {
            buf: Vec::new(),
            entries: Vec::new(),
            dos_time,
            dos_date,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("duplicate package entry {}", name),
            ));
        }

        let compressed = miniz_oxide::deflate::compress_to_vec(data, COMPRESSION_LEVEL);
        let entry = CentralEntry {
            name: name.to_string(),
            crc: crc32fast::hash(data),
            compressed_size: to_u32(compressed.len())?,
            size: to_u32(data.len())?,
            offset: to_u32(self.buf.len())?,
        };

        let name_len = to_u16(name.len())?;
        let w = &mut self.buf;
        w.write_all(&LOCAL_HEADER_SIG.to_le_bytes())?;
        w.write_all(&VERSION.to_le_bytes())?;
        w.write_all(&FLAG_UTF8.to_le_bytes())?;
        w.write_all(&METHOD_DEFLATE.to_le_bytes())?;
        w.write_all(&self.dos_time.to_le_bytes())?;
        w.write_all(&self.dos_date.to_le_bytes())?;
        w.write_all(&entry.crc.to_le_bytes())?;
        w.write_all(&entry.compressed_size.to_le_bytes())?;
        w.write_all(&entry.size.to_le_bytes())?;
        w.write_all(&name_len.to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?;
        w.write_all(name.as_bytes())?;
        w.write_all(&compressed)?;

        self.entries.push(entry);
        Ok(())
    }

    /// Append the central directory and return the finished archive.
    pub fn finish(mut self) -> io::Result<Vec<u8>> {
        let directory_offset = to_u32(self.buf.len())?;
        let count = to_u16(self.entries.len())?;

        let w = &mut self.buf;
        for entry in &self.entries {
            w.write_all(&CENTRAL_HEADER_SIG.to_le_bytes())?;
            w.write_all(&VERSION.to_le_bytes())?; // made by
            w.write_all(&VERSION.to_le_bytes())?; // needed to extract
            w.write_all(&FLAG_UTF8.to_le_bytes())?;
            w.write_all(&METHOD_DEFLATE.to_le_bytes())?;
            w.write_all(&self.dos_time.to_le_bytes())?;
            w.write_all(&self.dos_date.to_le_bytes())?;
            w.write_all(&entry.crc.to_le_bytes())?;
            w.write_all(&entry.compressed_size.to_le_bytes())?;
            w.write_all(&entry.size.to_le_bytes())?;
            w.write_all(&to_u16(entry.name.len())?.to_le_bytes())?;
            w.write_all(&0u16.to_le_bytes())?; // extra
            w.write_all(&0u16.to_le_bytes())?; // comment
            w.write_all(&0u16.to_le_bytes())?; // disk
            w.write_all(&0u16.to_le_bytes())?; // internal attrs
            w.write_all(&0u32.to_le_bytes())?; // external attrs
            w.write_all(&entry.offset.to_le_bytes())?;
            w.write_all(entry.name.as_bytes())?;
        }
        let directory_size = to_u32(w.len())? - directory_offset;

        w.write_all(&END_OF_CENTRAL_DIR_SIG.to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?;
        w.write_all(&count.to_le_bytes())?;
        w.write_all(&count.to_le_bytes())?;
        w.write_all(&directory_size.to_le_bytes())?;
        w.write_all(&directory_offset.to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?;

        Ok(self.buf)
    }
}

/// MS-DOS time and date words. Dates before 1980 clamp to 1980-01-01.
fn dos_timestamp(ts: NaiveDateTime) -> (u16, u16) {
    if ts.year() < 1980 {
        return (0, (1 << 5) | 1);
    }
    let time = (ts.hour() << 11) | (ts.minute() << 5) | (ts.second() / 2);
    let year = (ts.year() - 1980).min(127) as u32;
    let date = (year << 9) | (ts.month() << 5) | ts.day();
    (time as u16, date as u16)
}

fn to_u32(n: usize) -> io::Result<u32> {
    u32::try_from(n).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "package exceeds zip32 limits"))
}

fn to_u16(n: usize) -> io::Result<u16> {
    u16::try_from(n).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "package exceeds zip32 limits"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 42)
            .unwrap()
    }

    fn u16_at(buf: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([buf[at], buf[at + 1]])
    }

    fn u32_at(buf: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
    }

    #[test]
    fn dos_timestamp_packs_fields() {
        let (time, date) = dos_timestamp(timestamp());
        assert_eq!(time, (10 << 11) | (30 << 5) | 21);
        assert_eq!(date, (44 << 9) | (3 << 5) | 15);
    }

    #[test]
    fn entry_round_trips_through_inflate() {
        let mut writer = PackageWriter::new(timestamp());
        let body = b"<xml>hello hello hello</xml>";
        writer.add("a.xml", body).unwrap();
        let bytes = writer.finish().unwrap();

        assert_eq!(u32_at(&bytes, 0), LOCAL_HEADER_SIG);
        assert_eq!(u16_at(&bytes, 8), METHOD_DEFLATE);
        assert_eq!(u32_at(&bytes, 14), crc32fast::hash(body));
        let compressed_len = u32_at(&bytes, 18) as usize;
        let name_len = u16_at(&bytes, 26) as usize;
        let data_start = 30 + name_len;
        assert_eq!(&bytes[30..data_start], b"a.xml");
        let inflated =
            miniz_oxide::inflate::decompress_to_vec(&bytes[data_start..data_start + compressed_len])
                .unwrap();
        assert_eq!(inflated, body);
    }

    #[test]
    fn end_record_counts_entries() {
        let mut writer = PackageWriter::new(timestamp());
        writer.add("one", b"1").unwrap();
        writer.add("two", b"2").unwrap();
        let bytes = writer.finish().unwrap();
        let eocd = bytes.len() - 22;
        assert_eq!(u32_at(&bytes, eocd), END_OF_CENTRAL_DIR_SIG);
        assert_eq!(u16_at(&bytes, eocd + 10), 2);
        let directory_offset = u32_at(&bytes, eocd + 16) as usize;
        assert_eq!(u32_at(&bytes, directory_offset), CENTRAL_HEADER_SIG);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut writer = PackageWriter::new(timestamp());
        writer.add("one", b"1").unwrap();
        assert!(writer.add("one", b"again").is_err());
    }
}
