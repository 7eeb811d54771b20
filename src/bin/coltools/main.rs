use coltools::{err, Result};
use std::env;

pub mod args;
mod cut_main;
pub mod globals;
mod join_main;
pub mod logging;
pub mod prelude;
use crate::globals::Settings;

/// a subcommand : name, one line of help, entry point
type Tool = (&'static str, &'static str, fn(&[String], &mut Settings) -> Result<()>);

const TOOLS: [Tool; 2] = [
    ("cut", "Select columns, in any order, padding short lines.", cut_main::main),
    ("join", "Add a column by looking up a key in a mapping file.", join_main::main),
];

fn main() {
    let argv: Vec<String> = env::args().collect();
    let mut settings = Settings::new();
    if let Err(e) = run(argv.clone(), &mut settings) {
        if e.suppress() {
            std::process::exit(0);
        }
        // no-op if the command got far enough to set up logging itself
        logging::init(settings.verbosity);
        tracing::error!(command = %argv.join(" "), "{}", e);
        std::process::exit(1);
    }
}

fn usage() -> String {
    let mut text = String::from("USAGE : coltools <command> [options...]\nCommands are :\n");
    for (name, help, _) in TOOLS {
        text += &format!("{:8} : {}\n", name, help);
    }
    text
}

/// run the subcommand named by `args[1]`
fn run(mut args: Vec<String>, settings: &mut Settings) -> Result<()> {
    let Some(command) = args.get(1).cloned() else {
        return err!("{}", usage().trim_end());
    };
    match command.as_str() {
        "help" | "--help" => {
            print!("{}", usage());
            Ok(())
        }
        "version" | "--version" => {
            println!("coltools version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => {
            let Some((_, _, tool)) = TOOLS.iter().find(|(name, _, _)| *name == command) else {
                return err!("Unknown command '{}'\n{}", command, usage().trim_end());
            };
            // "coltools cut" is the program name that clap reports
            args.remove(1);
            args[0] = format!("{} {}", args[0], command);
            tool(&args, settings)
        }
    }
}
