#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tempus::models::{LegacyRecord, TimeEntry};

pub fn tempus_cmd(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("tempus");
    // keep the user's real config file out of the picture
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

/// A scratch data directory, removed when dropped.
pub fn data_dir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

pub fn record(key: &str, date: &str, company: &str, project: &str, sub: &str, hours: &str) -> LegacyRecord {
    LegacyRecord {
        key: key.to_string(),
        date: date.to_string(),
        company: company.to_string(),
        project: project.to_string(),
        sub_project: sub.to_string(),
        hours: hours.to_string(),
        description: format!("work on {project}/{sub}"),
    }
}

pub fn entry(entity: &str, project: &str, sub: &str, date: &str, duration: i64) -> TimeEntry {
    TimeEntry::new(date, entity, project, sub, duration)
}

/// Ten well-formed records spread over ten days, written out of date order.
pub fn ten_records() -> Vec<LegacyRecord> {
    let mut out = Vec::new();
    for day in (1..=10).rev() {
        out.push(record(
            &format!("c0ffee00-0000-4000-8000-{day:012}"),
            &format!("2020-03-{day:02}"),
            if day % 2 == 0 { "Acme" } else { "Initech" },
            "Web",
            if day % 3 == 0 { "BE" } else { "FE" },
            &format!("{:02}:{:02}:{:02}", day % 9, (day * 7) % 60, (day * 13) % 60),
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Legacy store writer (Tokyo Cabinet table database layout)
// ---------------------------------------------------------------------------

const APOW: u64 = 4;

pub struct RawRecord {
    pub key: String,
    pub columns: Vec<(String, String)>,
}

impl From<&LegacyRecord> for RawRecord {
    fn from(r: &LegacyRecord) -> Self {
        let columns = [
            ("date", &r.date),
            ("company", &r.company),
            ("project", &r.project),
            ("sub_project", &r.sub_project),
            ("hours", &r.hours),
            ("description", &r.description),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();

        Self {
            key: r.key.clone(),
            columns,
        }
    }
}

/// Write `records` as a legacy store at `dir/tempus.tdb`.
pub fn write_legacy_store(dir: &Path, records: &[LegacyRecord]) -> PathBuf {
    let raw: Vec<RawRecord> = records.iter().map(RawRecord::from).collect();
    let path = dir.join("tempus.tdb");
    fs::write(&path, encode_tdb(&raw, false, 0)).expect("write legacy store");
    path
}

/// Encode a table database. A free block follows the first record so
/// readers have to skip it.
pub fn encode_tdb(records: &[RawRecord], large: bool, opts_extra: u8) -> Vec<u8> {
    let width: u64 = if large { 8 } else { 4 };
    let bnum: u64 = 31;
    let frec = align(256 + bnum * width);

    let mut body = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        body.extend(encode_record(rec, width as usize));
        if i == 0 {
            body.extend(free_block(48));
        }
    }

    let fsiz = frec + body.len() as u64;

    let mut out = vec![0u8; frec as usize];
    let magic = b"ToKyO CaBiNeT\n1.0:911\n";
    out[..magic.len()].copy_from_slice(magic);
    out[32] = 3; // table database
    out[34] = APOW as u8;
    out[35] = 10;
    out[36] = u8::from(large) | opts_extra;
    out[40..48].copy_from_slice(&bnum.to_le_bytes());
    out[48..56].copy_from_slice(&(records.len() as u64).to_le_bytes());
    out[56..64].copy_from_slice(&fsiz.to_le_bytes());
    out[64..72].copy_from_slice(&frec.to_le_bytes());

    out.extend(body);
    out
}

fn encode_record(rec: &RawRecord, width: usize) -> Vec<u8> {
    let key = rec.key.as_bytes();
    let mut value = Vec::new();
    for (name, v) in &rec.columns {
        value.extend_from_slice(name.as_bytes());
        value.push(0);
        value.extend_from_slice(v.as_bytes());
        value.push(0);
    }

    let mut out = vec![0xc8, 0x5a];
    out.extend(vec![0u8; 2 * width]);
    let psiz_at = out.len();
    out.extend([0u8, 0u8]);
    out.extend(varint(key.len()));
    out.extend(varint(value.len()));
    out.extend_from_slice(key);
    out.extend(value);

    let pad = align(out.len() as u64) as usize - out.len();
    out[psiz_at..psiz_at + 2].copy_from_slice(&(pad as u16).to_le_bytes());
    out.extend(vec![0u8; pad]);
    out
}

fn free_block(size: u32) -> Vec<u8> {
    let mut b = vec![0u8; size as usize];
    b[0] = 0xb0;
    b[1..5].copy_from_slice(&size.to_le_bytes());
    b
}

fn varint(mut n: usize) -> Vec<u8> {
    if n == 0 {
        return vec![0];
    }
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n & 0x7f) as u8;
        n >>= 7;
        out.push(if n > 0 { !rem } else { rem });
    }
    out
}

fn align(n: u64) -> u64 {
    let unit = 1 << APOW;
    n.div_ceil(unit) * unit
}

/// Names of every file in `dir`, sorted.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
