//! Misc utility stuff : errors, opening files, splitting lines into columns

use flate2::read::MultiGzDecoder;
use fs_err as fs;
use memchr::memchr_iter;
use std::error;
use std::io::{self, BufRead, Read, Write};
use std::ops::{Deref, DerefMut};
use std::fmt;

/// Shorthand for returning an error Result
#[macro_export]
macro_rules! err {
    ($e:literal) => {Err($crate::Error::Error($e.to_string()))};
    ($e:expr) => {Err($crate::Error::Error($e))};
    ($($e:expr),+) => {Err($crate::Error::Error(format!($($e),+)))}
}
pub use err;
// Shorthand for implementing a pass-through error
macro_rules! err_type {
    ($x:path, $i:path) => {
        impl From<$x> for Error {
            fn from(kind: $x) -> Error {
                $i(kind)
            }
        }
    };
}

/// Various errors
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Custom coltools error
    Error(String),
    /// A column specification could not be parsed
    InvalidSpec {
        /// the comma separated piece that was rejected
        token: String,
        /// the whole specification, whitespace removed
        spec: String,
    },
    /// pass through ParseIntError
    ParseIntError(std::num::ParseIntError),
    /// pass through io::Error
    IoError(std::io::Error),
}
/// Result type for coltools
pub type Result<T> = core::result::Result<T, Error>;
impl error::Error for Error {}

impl Error {
    /// return true if this error should be treated as not an error
    pub fn suppress(&self) -> bool {
        match self {
            Error::IoError(err) => err.kind() == io::ErrorKind::BrokenPipe,
            _ => false,
        }
    }
}

err_type!(std::io::Error, Error::IoError);
err_type!(std::num::ParseIntError, Error::ParseIntError);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Error(s) => write!(f, "{}", s)?,
            Error::InvalidSpec { token, spec } => {
                write!(f, "Invalid fields : '{}' in '{}'", token, spec)?
            }
            Error::ParseIntError(s) => write!(f, "ParseIntError : {}", s)?,
            Error::IoError(s) => write!(f, "IoError : {}", s)?,
        }
        Ok(())
    }
}

/// parse a whole string as a possibly negative number, naming `what` in the error
pub fn parse_isize(text: &str, what: &str) -> Result<isize> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|ch| ch.is_ascii_digit()) {
        return err!("Malformed integer '{}' trying to make '{}'", text, what);
    }
    Ok(text.parse::<isize>()?)
}

/// pointers into a vector, simulating a slice without the ownership issues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FakeSlice {
    begin: u32,
    end: u32,
}

/// A line of a text file, broken into fields.
/// The stored text includes the trailing newline, but no field contains it.
/// An empty line contains one empty field.
///```
/// let data = b"one\ttwo\tthree\n";
/// let mut dp = &data[..];
/// let mut line = coltools::util::TextLine::new();
/// let eof = line.read(&mut dp).unwrap();
/// assert_eq!(eof, false);
/// line.split(b'\t').unwrap();
/// assert_eq!(line.len(), 3);
/// assert_eq!(line.get(1), b"two");
/// assert_eq!(line.get(7), b"");
///```
#[derive(Debug, Clone, Default)]
pub struct TextLine {
    line: Vec<u8>,
    parts: Vec<FakeSlice>,
}

/// byte offset into a line, which must fit in a u32
fn offset(pos: usize) -> Result<u32> {
    u32::try_from(pos).or_else(|_| err!("Line is too long, more than {} bytes", u32::MAX))
}

impl TextLine {
    /// make a new TextLine
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            parts: Vec::new(),
        }
    }
    /// make a TextLine from some text, already split on `delim`
    pub fn from_text(text: &[u8], delim: u8) -> Result<Self> {
        let mut ret = Self::new();
        ret.line.extend_from_slice(text);
        if ret.line.last() != Some(&b'\n') {
            ret.line.push(b'\n');
        }
        ret.split(delim)?;
        Ok(ret)
    }
    /// Iterator over columns in the line
    pub const fn iter(&self) -> TextLineIter<'_> {
        TextLineIter {
            line: self,
            index: 0,
        }
    }
    fn clear(&mut self) {
        self.parts.clear();
        self.line.clear();
    }
    /// How many columns in the line
    pub fn len(&self) -> usize {
        self.parts.len()
    }
    /// true if the line has not been split
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
    /// the text of the line, without the line terminator
    pub fn content(&self) -> &[u8] {
        let mut x = &self.line[..];
        if let Some(stripped) = x.strip_suffix(b"\n") {
            x = stripped;
        }
        if let Some(stripped) = x.strip_suffix(b"\r") {
            x = stripped;
        }
        x
    }
    /// Get one column. Return an empty column if index is too big.
    pub fn get(&self, index: usize) -> &[u8] {
        match self.parts.get(index) {
            None => &self.line[0..0],
            Some(p) => &self.line[p.begin as usize..p.end as usize],
        }
    }
    /// Read a new line from a file, should generally be followed by `split`.
    /// Return true at end of file.
    pub fn read<T: BufRead>(&mut self, f: &mut T) -> Result<bool> {
        self.clear();
        let sz = f.read_until(b'\n', &mut self.line)?;
        if sz == 0 {
            Ok(true)
        } else {
            if self.line.last() != Some(&b'\n') {
                self.line.push(b'\n');
            }
            Ok(false)
        }
    }
    /// split the line into columns.
    /// Fails for a line too long to be indexed with a u32.
    pub fn split(&mut self, delim: u8) -> Result<()> {
        self.parts.clear();
        let len = self.content().len();
        let end = offset(len)?;
        let mut begin: u32 = 0;
        for pos in memchr_iter(delim, &self.line[..len]) {
            let pos = offset(pos)?;
            self.parts.push(FakeSlice { begin, end: pos });
            begin = pos + 1;
        }
        self.parts.push(FakeSlice { begin, end });
        Ok(())
    }
    /// return all parts as a vector
    pub fn vec(&self) -> Vec<&[u8]> {
        self.iter().collect()
    }
}

/// Iterator over the columns in a TextLine
#[derive(Debug, Clone)]
pub struct TextLineIter<'a> {
    line: &'a TextLine,
    index: usize,
}

impl<'a> Iterator for TextLineIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.line.len() {
            None
        } else {
            self.index += 1;
            Some(self.line.get(self.index - 1))
        }
    }
}

/// Input file. Wrapped in a type so I can 'impl Debug'
pub struct Infile(
    /// The file being read
    pub io::BufReader<Box<dyn Read>>,
);

impl Infile {
    /// create a new input file
    pub fn new(f: io::BufReader<Box<dyn Read>>) -> Self {
        Self(f)
    }
}

impl fmt::Debug for Infile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Infile")
    }
}

impl Deref for Infile {
    type Target = io::BufReader<Box<dyn Read>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Infile {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// output file type
pub type Outfile = io::BufWriter<Box<dyn Write>>;

/// Make an Outfile from a file name.
/// "-" is stdout, anything else is created or truncated.
pub fn get_writer(name: &str) -> Result<Outfile> {
    let inner: Box<dyn Write> = if name == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(name)?)
    };
    Ok(io::BufWriter::new(inner))
}

// should return Cow<>
fn unescape_vec(data: &[u8]) -> Vec<u8> {
    let mut ret: Vec<u8> = Vec::with_capacity(data.len());
    let mut last_was_slash = false;
    for x in data {
        if last_was_slash {
            ret.push(match x {
                b'n' => b'\n',
                b't' => b'\t',
                b's' => b' ',
                ch => *ch,
            });
            last_was_slash = false;
        } else if x == &b'\\' {
            last_was_slash = true;
        } else {
            ret.push(*x);
        }
    }
    if last_was_slash {
        ret.push(b'\\');
    }
    ret
}

/// Turn a delimiter argument into a single byte.
/// Backslash escapes are allowed, e.g. `\t` for tab or `\s` for space.
///```
/// use coltools::util::parse_delimiter;
/// assert_eq!(parse_delimiter(",").unwrap(), b',');
/// assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
/// assert!(parse_delimiter("ab").is_err());
///```
pub fn parse_delimiter(spec: &str) -> Result<u8> {
    let bytes = unescape_vec(spec.as_bytes());
    if bytes.len() != 1 {
        return err!("Delimiter must be a single character, not '{}'", spec);
    }
    if bytes[0] == b'\n' {
        return err!("Delimiter can't be a newline");
    }
    Ok(bytes[0])
}

/// Make an Infile from a file name.
/// "-" is stdin. A name starting with "<<" is the literal text that follows,
/// with backslash escapes. Gzipped input is decompressed transparently.
pub fn get_reader(name: &str) -> Result<Infile> {
    let inner: Box<dyn Read> = {
        if name == "-" {
            Box::new(io::stdin())
        } else if let Some(stripped) = name.strip_prefix("<<") {
            Box::new(io::Cursor::new(unescape_vec(stripped.as_bytes())))
        } else {
            Box::new(fs::File::open(name)?)
        }
    };
    let mut outer = io::BufReader::new(inner);
    let start = outer.fill_buf()?;
    if start.starts_with(&[0x1fu8, 0x8bu8, 0x08u8]) {
        tracing::debug!(file = name, "reading gzipped input");
        outer = io::BufReader::new(Box::new(MultiGzDecoder::new(outer)));
    }
    Ok(Infile::new(outer))
}

/// Write a row of fields joined by `delim`, followed by a newline
///```
/// let mut out = Vec::new();
/// coltools::util::write_row(&mut out, &["a", "", "c"], b',').unwrap();
/// assert_eq!(out, b"a,,c\n");
///```
pub fn write_row<T: AsRef<[u8]>>(w: &mut impl Write, fields: &[T], delim: u8) -> Result<()> {
    let mut iter = fields.iter();
    if let Some(first) = iter.next() {
        w.write_all(first.as_ref())?;
        for x in iter {
            w.write_all(&[delim])?;
            w.write_all(x.as_ref())?;
        }
    }
    w.write_all(b"\n")?;
    Ok(())
}

/// File reader for text file broken into lines with columns
#[derive(Debug)]
pub struct Reader {
    file: Infile,
    line: TextLine,
    delim: u8,
    name: String,
    line_num: usize,
    is_done: bool,
}

impl Reader {
    /// open a file for reading, splitting lines on `delim`
    pub fn new_open(name: &str, delim: u8) -> Result<Self> {
        tracing::debug!(file = name, "opening input");
        Ok(Self {
            file: get_reader(name)?,
            line: TextLine::new(),
            delim,
            name: name.to_string(),
            line_num: 0,
            is_done: false,
        })
    }
    /// name of the file being read
    pub fn name(&self) -> &str {
        &self.name
    }
    /// have we hit EOF?
    pub const fn is_done(&self) -> bool {
        self.is_done
    }
    /// line number of `curr`, starting at one
    pub const fn line_number(&self) -> usize {
        self.line_num
    }
    /// get next line of text. Return true at end of file.
    pub fn getline(&mut self) -> Result<bool> {
        if self.is_done {
            return Ok(true);
        }
        if self.line.read(&mut *self.file)? {
            self.is_done = true;
        } else {
            self.line_num += 1;
            self.line.split(self.delim)?;
        }
        Ok(self.is_done)
    }
    /// get current line of text
    pub const fn curr(&self) -> &TextLine {
        &self.line
    }
}
