//! Select columns from delimited text, in any order

use crate::fieldspec::FieldSpec;
use crate::util::{Reader, TextLine};
use crate::Result;
use std::io::Write;

/// All the settings needed to cut some files
#[derive(Debug, Clone)]
pub struct CutConfig {
    /// which columns to write, and in what order
    pub fields: FieldSpec,
    /// input and output delimiter, default tab
    pub delim: u8,
}

impl CutConfig {
    /// new, with tab delimiter
    pub fn new(fields: FieldSpec) -> Self {
        Self {
            fields,
            delim: b'\t',
        }
    }
    /// new from a spec string, e.g. "3,1,5-"
    pub fn from_spec(spec: &str) -> Result<Self> {
        Ok(Self::new(FieldSpec::new(spec)?))
    }
    /// set the delimiter
    pub fn with_delim(mut self, delim: u8) -> Self {
        self.delim = delim;
        self
    }
    /// write the selected columns of one line, with newline
    pub fn write_line(&self, w: &mut impl Write, line: &TextLine) -> Result<()> {
        let mut first = true;
        for pos in self.fields.positions(line.len()) {
            if !first {
                w.write_all(&[self.delim])?;
            }
            first = false;
            if let Some(i) = pos {
                w.write_all(line.get(i))?;
            }
        }
        w.write_all(b"\n")?;
        Ok(())
    }
    /// cut every remaining line of an open file. Return the number of lines.
    pub fn cut(&self, f: &mut Reader, w: &mut impl Write) -> Result<usize> {
        let mut lines = 0;
        while !f.getline()? {
            self.write_line(w, f.curr())?;
            lines += 1;
        }
        Ok(lines)
    }
    /// cut each named file in turn, "-" is stdin. Return the total number of lines.
    ///```
    ///    use coltools::cut::CutConfig;
    ///    let config = CutConfig::from_spec("3,1,5").unwrap().with_delim(b',');
    ///    let mut out = Vec::new();
    ///    config.cut_files(&["<<a,b,c\nd,e\n"], &mut out).unwrap();
    ///    assert_eq!(out, b"c,a,\n,d,\n");
    ///```
    pub fn cut_files<S: AsRef<str>>(&self, files: &[S], w: &mut impl Write) -> Result<usize> {
        tracing::debug!(fields = %self.fields, "cutting");
        let mut total = 0;
        for x in files {
            let name = x.as_ref();
            let mut f = Reader::new_open(name, self.delim)?;
            let lines = self.cut(&mut f, w)?;
            tracing::info!(file = name, lines, "lines in total");
            total += lines;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn run(spec: &str, delim: u8, files: &[&str]) -> Result<String> {
        let config = CutConfig::from_spec(spec)?.with_delim(delim);
        let mut out = Vec::new();
        config.cut_files(files, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn reorder_and_pad() -> Result<()> {
        assert_eq!(
            run("3,2,5-8", b'\t', &["<<a\tb\tc\nd\te\tf\tg\th\ti\n"])?,
            "c\tb\nf\te\th\ti\n"
        );
        assert_eq!(run("2,2,4", b'\t', &["<<a\tb\tc\n"])?, "b\tb\t\n");
        assert_eq!(run("1", b'\t', &["<<\n\nx\n"])?, "\n\nx\n");
        Ok(())
    }

    #[test]
    fn ranges() -> Result<()> {
        assert_eq!(run(" -2,4-", b',', &["<<1,2,3,4,5\n1\n"])?, "1,2,4,5\n1\n");
        assert_eq!(run("3-", b',', &["<<1,2\n"])?, "\n");
        Ok(())
    }

    #[test]
    fn many_files() -> Result<()> {
        let config = CutConfig::from_spec("2")?;
        let mut out = Vec::new();
        let n = config.cut_files(&["<<a\tb\n", "<<c\td\ne\tf\n"], &mut out)?;
        assert_eq!(n, 3);
        assert_eq!(out, b"b\nd\nf\n");
        Ok(())
    }

    #[test]
    fn windows_newlines() -> Result<()> {
        assert_eq!(run("2,1", b',', &["<<a,b\r\nc,d\r\n"])?, "b,a\nd,c\n");
        Ok(())
    }

    #[test]
    fn bad_spec_writes_nothing() {
        for bad in ["0", "-", "2,,3"] {
            let res = run(bad, b'\t', &["<<a\tb\n"]);
            assert!(matches!(res, Err(Error::InvalidSpec { .. })));
        }
    }

    #[test]
    fn missing_input() {
        let config = CutConfig::from_spec("1").unwrap();
        let mut out = Vec::new();
        let res = config.cut_files(&["<<x\n", "/no/such/file/here"], &mut out);
        assert!(matches!(res, Err(Error::IoError(_))));
        assert_eq!(out, b"x\n");
    }
}
