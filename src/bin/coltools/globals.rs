//! global settings and command line arguments available to all tools

use crate::args::Parsed;
use crate::prelude::*;
use coltools::prelude::*;

const A: [ArgSpec; 4] = [
    arg! {"delimiter", "d", "Char", "Field delimiter, default tab. Escapes like '\\t' are allowed."},
    arg! {"output", "o", "File", "Output file, default '-' for stdout"},
    arg! {"verbose", "v", "", "More messages on stderr, repeat for even more"},
    arg! {"quiet", "q", "", "Only report errors"},
];

pub fn global_args() -> &'static [ArgSpec] {
    &A
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// column delimiter for input and output
    pub delim: u8,
    /// output file name
    pub output: String,
    /// zero is warnings only, negative is quieter, positive is louder
    pub verbosity: i8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delim: b'\t',
            output: "-".to_string(),
            verbosity: 0,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }
    /// take the global options out of a parsed command line, and start logging.
    /// `--quiet` wins over any number of `--verbose`.
    pub fn consume(&mut self, args: &Parsed) -> Result<()> {
        self.verbosity = if args.count("quiet") > 0 {
            -1
        } else {
            i8::try_from(args.count("verbose")).unwrap_or(i8::MAX)
        };
        logging::init(self.verbosity);
        if let Some(delim) = args.value("delimiter") {
            self.delim = parse_delimiter(&delim)?;
        }
        if let Some(output) = args.value("output") {
            self.output = output;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{self, FileCount};

    fn settings(argv: &[&str]) -> Result<Settings> {
        let argv: Vec<String> = argv.iter().map(|x| x.to_string()).collect();
        let mut s = Settings::new();
        args::parse("test", FileCount::Many, &[], &argv, &mut s)?;
        Ok(s)
    }

    #[test]
    fn quiet_wins() -> Result<()> {
        assert_eq!(settings(&["t"])?.verbosity, 0);
        assert_eq!(settings(&["t", "-vv"])?.verbosity, 2);
        assert_eq!(settings(&["t", "-q", "-v"])?.verbosity, -1);
        assert_eq!(settings(&["t", "-v", "-q", "-v"])?.verbosity, -1);
        Ok(())
    }

    #[test]
    fn delimiter_and_output() -> Result<()> {
        let s = settings(&["t", "-d", ",", "-d", "\\s", "-o", "out.txt"])?;
        assert_eq!(s.delim, b' ');
        assert_eq!(s.output, "out.txt");
        assert!(settings(&["t", "-d", "ab"]).is_err());
        Ok(())
    }
}
