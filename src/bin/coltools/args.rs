//! Turn a table of `ArgSpec`s into a `clap::Command`, and read the answers

use crate::globals;
use clap::error::ErrorKind;
use clap::ArgAction;
use coltools::prelude::*;

#[macro_export]
macro_rules! arg {
    ($a:expr,$b:expr,$c:expr,$d:expr) => {
        args::ArgSpec { name: $a, short: $b, value: $c, help: $d, positional: false }
    };
}

#[macro_export]
macro_rules! arg_pos {
    ($a:expr,$c:expr,$d:expr) => {
        args::ArgSpec { name: $a, short: "", value: $c, help: $d, positional: true }
    };
}

/// how many input files a command reads
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileCount {
    One,
    Many,
}

/// One command line argument. An empty `value` makes a flag, which may be repeated.
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    pub name: &'static str,
    pub short: &'static str,
    pub value: &'static str,
    pub help: &'static str,
    pub positional: bool,
}

impl ArgSpec {
    fn to_arg(self) -> clap::Arg {
        let b = clap::Arg::new(self.name).help(self.help);
        if self.positional {
            return b.value_name(self.value).required(true);
        }
        let mut b = b.long(self.name);
        if let Some(ch) = self.short.chars().next() {
            b = b.short(ch);
        }
        if self.value.is_empty() {
            b.action(ArgAction::Count)
        } else {
            // column lists like "-3" are values, not options
            b.value_name(self.value).action(ArgAction::Append).allow_hyphen_values(true)
        }
    }
}

/// The command line, after parsing
#[derive(Debug)]
pub struct Parsed {
    matches: clap::ArgMatches,
    /// input files, "-" if none were given
    pub files: Vec<String>,
}

impl Parsed {
    /// every value given for an option, in order
    pub fn values(&self, name: &str) -> Vec<String> {
        self.matches
            .get_many::<String>(name)
            .map(|v| v.cloned().collect())
            .unwrap_or_default()
    }
    /// the last value given for an option
    pub fn value(&self, name: &str) -> Option<String> {
        self.values(name).pop()
    }
    /// how many times a flag was given
    pub fn count(&self, name: &str) -> u8 {
        self.matches.get_count(name)
    }
}

/// Parse `argv` for a command that takes the options in `spec` plus the
/// global options, which are consumed into `settings`.
pub fn parse(
    about: &'static str,
    files: FileCount,
    spec: &[ArgSpec],
    argv: &[String],
    settings: &mut globals::Settings,
) -> Result<Parsed> {
    let inputs = clap::Arg::new("input_files");
    let inputs = match files {
        FileCount::One => inputs.help("input file, '-' for stdin"),
        FileCount::Many => inputs.help("input files, '-' for stdin").action(ArgAction::Append),
    };
    let cmd = spec
        .iter()
        .chain(globals::global_args())
        .fold(clap::Command::new("coltools").version(env!("CARGO_PKG_VERSION")).about(about), |c, x| {
            c.arg(x.to_arg())
        })
        .arg(inputs);

    let matches = match cmd.try_get_matches_from(argv) {
        Ok(m) => m,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => return err!("{}", e.to_string().trim_end()),
    };
    let mut parsed = Parsed { matches, files: Vec::new() };
    parsed.files = parsed.values("input_files");
    if parsed.files.is_empty() {
        parsed.files.push("-".to_string());
    }
    settings.consume(&parsed)?;
    Ok(parsed)
}
