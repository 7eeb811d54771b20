//! Add a column to a file, by looking up one of its columns in a mapping file

use crate::util::{get_reader, write_row, Reader, TextLine};
use crate::{err, Result};
use fnv::FnvHashMap;
use std::io::{BufRead, Write};

/// Key to value lookup, read from a two column, tab separated file.
/// Lines without a tab are ignored. Later lines replace earlier lines with
/// the same key.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    map: FnvHashMap<Vec<u8>, Vec<u8>>,
}

impl MappingTable {
    /// new, empty
    pub fn new() -> Self {
        Self::default()
    }
    /// read a mapping file, "-" is stdin
    pub fn load(name: &str) -> Result<Self> {
        let mut f = get_reader(name)?;
        let table = Self::read(&mut *f, name)?;
        tracing::info!(file = name, keys = table.len(), "loaded mapping");
        Ok(table)
    }
    /// read mapping lines from an open file. `name` is used in error messages.
    pub fn read(f: &mut impl BufRead, name: &str) -> Result<Self> {
        let mut table = Self::new();
        let mut line = TextLine::new();
        let mut line_num = 0;
        while !line.read(f)? {
            line_num += 1;
            if !line.content().contains(&b'\t') {
                tracing::debug!(file = name, line = line_num, "no tab, skipping");
                continue;
            }
            line.split(b'\t')?;
            if line.len() != 2 {
                return err!(
                    "Line {} of mapping file {} has {} columns, it should have 2",
                    line_num,
                    name,
                    line.len()
                );
            }
            table.insert(line.get(0), line.get(1));
        }
        Ok(table)
    }
    /// add or replace one mapping
    pub fn insert(&mut self, key: &[u8], value: &[u8]) {
        self.map.insert(key.to_vec(), value.to_vec());
    }
    /// look up a key
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.map.get(key).map(|v| &v[..])
    }
    /// number of keys
    pub fn len(&self) -> usize {
        self.map.len()
    }
    /// is empty?
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// strip surrounding quotes, and any stray newline, from a key
fn clean_key(mut key: &[u8]) -> &[u8] {
    const JUNK: &[u8] = b"\"'\n";
    while let Some((first, rest)) = key.split_first() {
        if !JUNK.contains(first) {
            break;
        }
        key = rest;
    }
    while let Some((last, rest)) = key.split_last() {
        if !JUNK.contains(last) {
            break;
        }
        key = rest;
    }
    key
}

/// The column `col` of a row with `len` columns, if there is one.
/// Negative columns count back from the end, so -1 is the last column.
fn key_column(col: isize, len: usize) -> Option<usize> {
    match usize::try_from(col) {
        Ok(c) => (c < len).then_some(c),
        Err(_) => len.checked_sub(col.unsigned_abs()),
    }
}

/// Where to insert a new column into a row with `len` columns.
/// Negative positions count back from the end. Out of range positions
/// go to the nearest end of the row.
fn insert_position(pos: isize, len: usize) -> usize {
    match usize::try_from(pos) {
        Ok(p) => p.min(len),
        Err(_) => len.saturating_sub(pos.unsigned_abs()),
    }
}

/// All the settings needed to add mapped values to a file
#[derive(Debug, Clone)]
pub struct AddMapping {
    /// the lookup table
    pub table: MappingTable,
    /// zero based column holding the key, negative counts from the end. Default 0.
    pub key_col: isize,
    /// zero based position of the new column, negative counts from the end.
    /// Default 1. Past the end of a line means append.
    pub insert_at: isize,
    /// value for keys not in the table. If `None` or empty, the key itself.
    pub na: Option<String>,
    /// input and output delimiter, default tab
    pub delim: u8,
}

impl AddMapping {
    /// new, with default settings
    pub fn new(table: MappingTable) -> Self {
        Self {
            table,
            key_col: 0,
            insert_at: 1,
            na: None,
            delim: b'\t',
        }
    }
    /// the value to add for a given key
    pub fn lookup<'a>(&'a self, key: &'a [u8]) -> &'a [u8] {
        let key = clean_key(key);
        match self.table.get(key) {
            Some(v) => v,
            None => match &self.na {
                Some(na) if !na.is_empty() => na.as_bytes(),
                _ => key,
            },
        }
    }
    /// write one line, with the mapped value added.
    /// `line_num` and `name` are for error messages.
    pub fn write_line(
        &self,
        w: &mut impl Write,
        line: &TextLine,
        line_num: usize,
        name: &str,
    ) -> Result<()> {
        let Some(key_col) = key_column(self.key_col, line.len()) else {
            return err!(
                "Line {} of {} has {} columns, but key column {} was requested",
                line_num,
                name,
                line.len(),
                self.key_col
            );
        };
        let mut cols = line.vec();
        let value = self.lookup(line.get(key_col));
        cols.insert(insert_position(self.insert_at, cols.len()), value);
        write_row(w, &cols, self.delim)
    }
    /// process every remaining line of an open file. Return the number of lines.
    pub fn add(&self, f: &mut Reader, w: &mut impl Write) -> Result<usize> {
        let mut lines = 0;
        while !f.getline()? {
            self.write_line(w, f.curr(), f.line_number(), f.name())?;
            lines += 1;
        }
        Ok(lines)
    }
    /// process a named file, "-" is stdin. Return the number of lines.
    ///```
    ///    use coltools::mapping::{AddMapping, MappingTable};
    ///    let table = MappingTable::load("<<g1\tTP53\n").unwrap();
    ///    let config = AddMapping::new(table);
    ///    let mut out = Vec::new();
    ///    config.add_file("<<g1\t7\ng2\t8\n", &mut out).unwrap();
    ///    assert_eq!(out, b"g1\tTP53\t7\ng2\tg2\t8\n");
    ///```
    pub fn add_file(&self, name: &str, w: &mut impl Write) -> Result<usize> {
        let mut f = Reader::new_open(name, self.delim)?;
        let lines = self.add(&mut f, w)?;
        tracing::info!(file = name, lines, "lines in total");
        Ok(lines)
    }
}
