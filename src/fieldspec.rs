//! Parse a list of column numbers and ranges, like "3,2,5-8,-3",
//! and use it to pick fields out of a row.
//!
//! Unlike `cut`, the columns come out in the order they were asked for,
//! repeated columns are repeated, and a single column that a row does not
//! have comes out as an empty field.
//!
//! ```
//!    use coltools::fieldspec::FieldSpec;
//!    let spec = FieldSpec::new("3,1,1,5").unwrap();
//!    assert_eq!(spec.project(&["a", "b", "c"]), ["c", "a", "a", ""]);
//!
//!    let spec = FieldSpec::new(" -2, 4-").unwrap();
//!    assert_eq!(spec.project(&["a", "b", "c", "d", "e"]), ["a", "b", "d", "e"]);
//! ```

use crate::{Error, Result};
use std::ops::Range;
use std::str::FromStr;
use std::{fmt, slice};

/// One comma separated piece of a `FieldSpec`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// a single column, zero based. Always produces exactly one field.
    Index(usize),
    /// a run of columns, zero based, `stop` exclusive.
    /// `None` for `stop` means the end of the row.
    /// Produces as many fields as the row has in that window, possibly none.
    Range {
        /// first column
        start: usize,
        /// one past the last column
        stop: Option<usize>,
    },
}

fn invalid(token: &str, spec: &str) -> Error {
    Error::InvalidSpec {
        token: token.to_string(),
        spec: spec.to_string(),
    }
}

/// a one based column number, digits only.
/// Numbers too big for a usize are past the end of any row, so saturate.
fn column_number(text: &str, token: &str, spec: &str) -> Result<usize> {
    if text.is_empty() || !text.bytes().all(|ch| ch.is_ascii_digit()) {
        return Err(invalid(token, spec));
    }
    Ok(text.parse::<usize>().unwrap_or(usize::MAX))
}

impl Selector {
    /// Parse one piece, e.g. "3" or "2-5" or "-4" or "7-".
    /// `spec` is the whole specification, for error messages.
    pub fn parse(token: &str, spec: &str) -> Result<Self> {
        if !token.is_empty() && token.bytes().all(|ch| ch.is_ascii_digit()) {
            let num = column_number(token, token, spec)?;
            if num == 0 {
                return Err(invalid(token, spec));
            }
            return Ok(Self::Index(num - 1));
        }
        if token.matches('-').count() != 1 {
            return Err(invalid(token, spec));
        }
        let (start, stop) = token.split_once('-').ok_or_else(|| invalid(token, spec))?;
        if start.is_empty() && stop.is_empty() {
            return Err(invalid(token, spec));
        }
        // a start of 0 is clamped to the first column
        let start = if start.is_empty() {
            0
        } else {
            column_number(start, token, spec)?.saturating_sub(1)
        };
        let stop = if stop.is_empty() {
            None
        } else {
            Some(column_number(stop, token, spec)?)
        };
        Ok(Self::Range { start, stop })
    }

    /// The columns of a row of length `len` covered by this selector.
    /// For an `Index` past the end of the row, the window is empty.
    pub fn window(&self, len: usize) -> Range<usize> {
        match *self {
            Self::Index(i) if i < len => i..i + 1,
            Self::Index(_) => len..len,
            Self::Range { start, stop } => {
                let end = stop.map_or(len, |s| s.min(len));
                start.min(end)..end
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i + 1),
            Self::Range { start, stop: None } => write!(f, "{}-", start + 1),
            Self::Range {
                start,
                stop: Some(stop),
            } => write!(f, "{}-{}", start + 1, stop),
        }
    }
}

/// A parsed column specification, e.g. "3,2,5-8,-3".
///
/// Column numbers are one based. Whitespace anywhere in the specification
/// is ignored, so " -3,5,2" is the same as "-3,5,2".
/// Once built, a `FieldSpec` never changes, and can be applied to any
/// number of rows, from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    selectors: Vec<Selector>,
}

impl FieldSpec {
    /// Parse a specification. Fails with `Error::InvalidSpec` naming the first
    /// bad piece, e.g. for "0", "-", "2,,3", "1-2-3" or "x".
    pub fn new(spec: &str) -> Result<Self> {
        let spec: String = spec.chars().filter(|ch| !ch.is_whitespace()).collect();
        let mut selectors = Vec::new();
        for token in spec.split(',') {
            selectors.push(Selector::parse(token, &spec)?);
        }
        Ok(Self { selectors })
    }
    /// the selectors, in order
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }
    /// number of selectors
    pub fn len(&self) -> usize {
        self.selectors.len()
    }
    /// always false for a parsed spec, but required by clippy
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
    /// The source columns for a row of length `len`, in output order.
    /// `None` is a padding field, for an `Index` past the end of the row.
    ///```
    ///    use coltools::fieldspec::FieldSpec;
    ///    let spec = FieldSpec::new("4,2-").unwrap();
    ///    let v: Vec<Option<usize>> = spec.positions(3).collect();
    ///    assert_eq!(v, [None, Some(1), Some(2)]);
    ///```
    pub fn positions(&self, len: usize) -> Positions<'_> {
        Positions {
            selectors: self.selectors.iter(),
            len,
            window: 0..0,
        }
    }
    /// Select fields from `row`, appending them to `out`.
    /// Padding fields are `T::default()`, i.e. empty for strings and slices.
    pub fn project_into<T: Clone + Default>(&self, row: &[T], out: &mut Vec<T>) {
        out.extend(
            self.positions(row.len())
                .map(|pos| pos.map_or_else(T::default, |i| row[i].clone())),
        );
    }
    /// Select fields from `row`, returning a new row
    pub fn project<T: Clone + Default>(&self, row: &[T]) -> Vec<T> {
        let mut out = Vec::with_capacity(self.selectors.len());
        self.project_into(row, &mut out);
        out
    }
}

impl FromStr for FieldSpec {
    type Err = Error;
    fn from_str(spec: &str) -> Result<Self> {
        Self::new(spec)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for x in &self.selectors {
            if !first {
                write!(f, ",")?;
            }
            first = false;
            write!(f, "{}", x)?;
        }
        Ok(())
    }
}

/// Iterator over the source columns for one row, see `FieldSpec::positions`
#[derive(Debug, Clone)]
pub struct Positions<'a> {
    selectors: slice::Iter<'a, Selector>,
    len: usize,
    window: Range<usize>,
}

impl Iterator for Positions<'_> {
    type Item = Option<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(i) = self.window.next() {
                return Some(Some(i));
            }
            let sel = self.selectors.next()?;
            match sel {
                Selector::Index(i) => return Some((*i < self.len).then_some(*i)),
                Selector::Range { .. } => self.window = sel.window(self.len),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_err {
	($expression:expr, $($pattern:tt)+) => {
            match $expression {
		$($pattern)+ => (),
		ref e => panic!("expected `{}` but got `{:?}`", stringify!($($pattern)+), e),
            }
	}
    }

    const ABC: [&str; 3] = ["a", "b", "c"];
    const ABCD: [&str; 4] = ["a", "b", "c", "d"];

    fn proj(spec: &str, row: &[&'static str]) -> Result<Vec<&'static str>> {
        Ok(FieldSpec::new(spec)?.project(row))
    }

    #[test]
    fn parse() -> Result<()> {
        let s = FieldSpec::new("2,3-4,6-")?;
        assert_eq!(
            s.selectors(),
            [
                Selector::Index(1),
                Selector::Range {
                    start: 2,
                    stop: Some(4)
                },
                Selector::Range {
                    start: 5,
                    stop: None
                },
            ]
        );
        assert_eq!(
            FieldSpec::new(" -3,5,2")?.selectors(),
            [
                Selector::Range {
                    start: 0,
                    stop: Some(3)
                },
                Selector::Index(4),
                Selector::Index(1),
            ]
        );
        assert_eq!(FieldSpec::new("5, 2 ,1\t")?, FieldSpec::new("5,2,1")?);
        Ok(())
    }

    #[test]
    fn bad_specs() {
        for bad in ["", " ", "0", "-", "2,,3", ",1", "1,", "1-2-3", "x", "1a", "a-3", "3-b", "+3", "--", "1e3"] {
            assert_err!(FieldSpec::new(bad), Err(Error::InvalidSpec { .. }));
        }
    }

    #[test]
    fn error_names_token() {
        match FieldSpec::new("1, 2-x ,3") {
            Err(Error::InvalidSpec { token, spec }) => {
                assert_eq!(token, "2-x");
                assert_eq!(spec, "1,2-x,3");
            }
            other => panic!("unexpected {:?}", other),
        }
        let e = FieldSpec::new("2,,3").unwrap_err();
        assert_eq!(e.to_string(), "Invalid fields : '' in '2,,3'");
    }

    #[test]
    fn order_and_duplicates() -> Result<()> {
        assert_eq!(proj("3,1,2", &ABC)?, ["c", "a", "b"]);
        assert_eq!(proj("2,2", &ABC)?, ["b", "b"]);
        assert_eq!(proj("1-2,1-2", &ABC)?, ["a", "b", "a", "b"]);
        Ok(())
    }

    #[test]
    fn index_pads_range_does_not() -> Result<()> {
        assert_eq!(proj("5", &ABC)?, [""]);
        assert_eq!(proj("2-8", &ABC)?, ["b", "c"]);
        assert_eq!(proj("3,2,5-8", &ABC)?, ["c", "b"]);
        assert_eq!(proj("4,5-,6", &ABC)?, ["", ""]);
        assert_eq!(proj("1,3", &[])?, ["", ""]);
        assert!(proj("1-", &[])?.is_empty());
        Ok(())
    }

    #[test]
    fn huge_columns() -> Result<()> {
        assert_eq!(proj("99999999999999999999999", &["a"])?, [""]);
        assert_eq!(proj("1-99999999999999999999999", &ABC)?, ABC);
        assert!(proj("99999999999999999999999-", &ABC)?.is_empty());
        assert_eq!(
            FieldSpec::new("99999999999999999999999")?.selectors(),
            [Selector::Index(usize::MAX - 1)]
        );
        Ok(())
    }

    #[test]
    fn range_from_zero() -> Result<()> {
        assert_eq!(proj("0-3", &ABCD)?, ["a", "b", "c"]);
        assert_eq!(proj("0-", &ABC)?, ABC);
        assert_eq!(FieldSpec::new("0-3")?, FieldSpec::new("-3")?);
        Ok(())
    }

    #[test]
    fn open_ranges() -> Result<()> {
        assert_eq!(proj("3-", &ABCD)?, ["c", "d"]);
        assert_eq!(proj("-2", &ABCD)?, ["a", "b"]);
        assert_eq!(proj("1-", &ABCD)?, ABCD);
        assert_eq!(proj("2,-3", &ABCD)?, ["b", "a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn empty_ranges() -> Result<()> {
        assert!(proj("3-2", &ABCD)?.is_empty());
        assert!(proj("3-3", &ABCD)?.is_empty());
        assert!(proj("-0", &ABCD)?.is_empty());
        assert_eq!(proj("3-3,1", &ABCD)?, ["a"]);
        Ok(())
    }

    #[test]
    fn same_spec_same_answer() -> Result<()> {
        let a = FieldSpec::new("4,1-2,3-")?;
        let b: FieldSpec = "4,1-2,3-".parse()?;
        assert_eq!(a, b);
        for row in [&ABC[..], &ABCD[..], &[][..]] {
            assert_eq!(a.project(row), b.project(row));
        }
        Ok(())
    }

    #[test]
    fn display() -> Result<()> {
        assert_eq!(FieldSpec::new("3, 1-2 ,4-,-5")?.to_string(), "3,1-2,4-,1-5");
        let s = FieldSpec::new("2,-3,7-")?;
        assert_eq!(FieldSpec::new(&s.to_string())?, s);
        Ok(())
    }

    #[test]
    fn project_into_appends() -> Result<()> {
        let s = FieldSpec::new("2,9")?;
        let row: [&[u8]; 2] = [b"x", b"y"];
        let mut out: Vec<&[u8]> = vec![&b"keep"[..]];
        s.project_into(&row, &mut out);
        assert_eq!(out, [&b"keep"[..], b"y", b""]);
        let owned = vec!["p".to_string(), "q".to_string()];
        assert_eq!(s.project(&owned), ["q".to_string(), String::new()]);
        Ok(())
    }

    #[test]
    fn shared_across_threads() -> Result<()> {
        let s = std::sync::Arc::new(FieldSpec::new("2,1")?);
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let s = s.clone();
                std::thread::spawn(move || {
                    let row = [n.to_string(), (n + 1).to_string()];
                    s.project(&row)
                })
            })
            .collect();
        for (n, h) in handles.into_iter().enumerate() {
            assert_eq!(h.join().unwrap(), [(n + 1).to_string(), n.to_string()]);
        }
        Ok(())
    }
}
