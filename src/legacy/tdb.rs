//! Read-only access to the legacy Tokyo Cabinet table database (`tempus.tdb`).
//!
//! A table database is a hash database whose values are column maps. Only what
//! is needed to walk every live record is decoded: the file header, record and
//! free-block headers, and the NUL-separated column map. The bucket array and
//! the index files next to the database are never read.

use crate::errors::{AppError, AppResult};
use crate::legacy::RecordSource;
use crate::models::LegacyRecord;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MAGIC: &[u8] = b"ToKyO CaBiNeT";
const HEADER_SIZE: usize = 256;
const TYPE_OFF: usize = 32;
const OPTS_OFF: usize = 36;
const RNUM_OFF: usize = 48;
const FSIZ_OFF: usize = 56;
const FREC_OFF: usize = 64;

const TYPE_TABLE: u8 = 3;
const OPT_LARGE: u8 = 1 << 0;
// deflate, bzip2, tcbs and external codec
const OPT_CODECS: u8 = 0b1_1110;

const REC_MAGIC: u8 = 0xc8;
const FREE_MAGIC: u8 = 0xb0;

// magic, hash, two 64-bit child offsets, padding size, two 5-byte varints
const REC_HEADER_MAX: usize = 1 + 1 + 8 + 8 + 2 + 5 + 5;

enum Block {
    Record {
        key: Vec<u8>,
        value: Vec<u8>,
        size: u64,
    },
    Free {
        size: u64,
    },
}

/// An open legacy store. Holds a read-only file handle.
pub struct TableDb {
    path: PathBuf,
    file: BufReader<File>,
    large: bool,
    first_record: u64,
    end: u64,
    record_count: u64,
}

impl TableDb {
    /// Open the store at `path`. A missing file is `Ok(None)`: nothing to
    /// migrate.
    pub fn open(path: &Path) -> AppResult<Option<Self>> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::filesystem("open", path, e)),
        };
        let file_len = file.metadata()?.len();

        let mut file = BufReader::new(file);
        let mut header = [0u8; HEADER_SIZE];
        file.read_exact(&mut header)
            .map_err(|_| corrupt(path, "truncated header"))?;

        if !header.starts_with(MAGIC) {
            return Err(corrupt(path, "not a Tokyo Cabinet database"));
        }
        if header[TYPE_OFF] != TYPE_TABLE {
            warn!(path = %path.display(), kind = header[TYPE_OFF], "legacy store is not flagged as a table database");
        }

        let opts = header[OPTS_OFF];
        if opts & OPT_CODECS != 0 {
            return Err(corrupt(path, "compressed records are not supported"));
        }

        let end = le_u64(&header, FSIZ_OFF).min(file_len);
        let first_record = le_u64(&header, FREC_OFF);
        if first_record < HEADER_SIZE as u64 || first_record > end {
            return Err(corrupt(path, "first record offset out of range"));
        }

        let db = Self {
            path: path.to_path_buf(),
            file,
            large: opts & OPT_LARGE != 0,
            first_record,
            end,
            record_count: le_u64(&header, RNUM_OFF),
        };
        debug!(
            path = %db.path.display(),
            records = db.record_count,
            large = db.large,
            "opened legacy store"
        );
        Ok(Some(db))
    }

    /// Number of records the header claims the store holds.
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Index every live record by its `date` column and hand back a cursor
    /// that yields them in ascending date order. Records sharing a date keep
    /// their on-disk order.
    pub fn scan_ordered_by_date(mut self) -> AppResult<DateOrderedScan> {
        let mut index = Vec::with_capacity(self.record_count.min(1 << 16) as usize);
        let mut offset = self.first_record;

        while offset < self.end {
            match self.read_block(offset)? {
                Block::Free { size } => offset += size,
                Block::Record { value, size, .. } => {
                    let date = columns(&value)
                        .find(|(name, _)| *name == b"date")
                        .map(|(_, v)| v.to_vec())
                        .unwrap_or_default();
                    index.push((date, offset));
                    offset += size;
                }
            }
        }

        index.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(records = index.len(), "indexed legacy store by date");

        Ok(DateOrderedScan {
            db: self,
            order: index.into_iter(),
        })
    }

    fn read_block(&mut self, offset: u64) -> AppResult<Block> {
        let avail = (self.end - offset).min(REC_HEADER_MAX as u64) as usize;
        let mut head = [0u8; REC_HEADER_MAX];
        self.read_at(offset, &mut head[..avail])?;
        let head = &head[..avail];

        match head.first() {
            Some(&FREE_MAGIC) => {
                let size = head
                    .get(1..5)
                    .map(|b| u64::from(u32::from_le_bytes([b[0], b[1], b[2], b[3]])))
                    .filter(|s| *s > 0 && offset + s <= self.end)
                    .ok_or_else(|| self.corrupt_at(offset, "bad free block"))?;
                Ok(Block::Free { size })
            }
            Some(&REC_MAGIC) => {
                let width = if self.large { 8 } else { 4 };
                let mut pos = 2 + 2 * width;

                let psiz = head
                    .get(pos..pos + 2)
                    .map(|b| u64::from(u16::from_le_bytes([b[0], b[1]])))
                    .ok_or_else(|| self.corrupt_at(offset, "truncated record header"))?;
                pos += 2;

                let (ksiz, step) = head
                    .get(pos..)
                    .and_then(read_varint)
                    .ok_or_else(|| self.corrupt_at(offset, "bad key size"))?;
                pos += step;
                let (vsiz, step) = head
                    .get(pos..)
                    .and_then(read_varint)
                    .ok_or_else(|| self.corrupt_at(offset, "bad value size"))?;
                pos += step;

                let size = pos as u64 + ksiz + vsiz + psiz;
                if offset + size > self.end {
                    return Err(self.corrupt_at(offset, "record runs past end of file"));
                }

                let mut key = vec![0u8; ksiz as usize];
                let mut value = vec![0u8; vsiz as usize];
                self.read_at(offset + pos as u64, &mut key)?;
                self.read_at(offset + pos as u64 + ksiz, &mut value)?;

                Ok(Block::Record { key, value, size })
            }
            _ => Err(self.corrupt_at(offset, "unknown block magic")),
        }
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> AppResult<()> {
        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.read_exact(buf))
            .map_err(|e| AppError::LegacyStore(format!("{}: read at {offset}: {e}", self.path.display())))
    }

    fn corrupt_at(&self, offset: u64, what: &str) -> AppError {
        AppError::LegacyStore(format!("{}: {what} at offset {offset}", self.path.display()))
    }
}

/// Date-ordered cursor over a [`TableDb`]. Each step decodes one record;
/// the cursor cannot be rewound.
pub struct DateOrderedScan {
    db: TableDb,
    order: std::vec::IntoIter<(Vec<u8>, u64)>,
}

impl DateOrderedScan {
    pub fn remaining(&self) -> usize {
        self.order.len()
    }
}

impl RecordSource for DateOrderedScan {
    fn next_record(&mut self) -> AppResult<Option<LegacyRecord>> {
        let Some((_, offset)) = self.order.next() else {
            return Ok(None);
        };

        match self.db.read_block(offset)? {
            Block::Record { key, value, .. } => Ok(Some(decode_record(&key, &value))),
            Block::Free { .. } => Err(self.db.corrupt_at(offset, "record turned into a free block")),
        }
    }
}

fn decode_record(key: &[u8], value: &[u8]) -> LegacyRecord {
    let mut rec = LegacyRecord {
        key: String::from_utf8_lossy(key).into_owned(),
        ..Default::default()
    };

    for (name, val) in columns(value) {
        let slot = match name {
            b"date" => &mut rec.date,
            b"company" => &mut rec.company,
            b"project" => &mut rec.project,
            b"sub_project" => &mut rec.sub_project,
            b"hours" => &mut rec.hours,
            b"description" => &mut rec.description,
            _ => continue,
        };
        *slot = String::from_utf8_lossy(val).into_owned();
    }
    rec
}

/// Column map stored as `name\0value\0name\0value\0...`.
fn columns(value: &[u8]) -> impl Iterator<Item = (&[u8], &[u8])> {
    let mut parts = value.split(|b| *b == 0);
    std::iter::from_fn(move || {
        let name = parts.next()?;
        let val = parts.next()?;
        Some((name, val))
    })
}

/// Tokyo Cabinet variable-length number: little-endian base-128 groups where
/// every byte but the last is stored bitwise-negated (high bit set).
fn read_varint(buf: &[u8]) -> Option<(u64, usize)> {
    let mut num: u64 = 0;
    let mut base: u64 = 1;

    for (i, &byte) in buf.iter().enumerate() {
        if byte < 0x80 {
            return Some((num.checked_add(u64::from(byte).checked_mul(base)?)?, i + 1));
        }
        num = num.checked_add(u64::from(!byte).checked_mul(base)?)?;
        base = base.checked_mul(128)?;
    }
    None
}

fn le_u64(buf: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(raw)
}

fn corrupt(path: &Path, what: &str) -> AppError {
    AppError::LegacyStore(format!("{}: {what}", path.display()))
}
