use crate::prelude::*;
use coltools::prelude::*;

pub fn main(argv: &[String], settings: &mut Settings) -> Result<()> {
    const A: [ArgSpec; 1] = [
        arg! {"fields", "f", "Columns", "the columns to select, counting from 1. e.g. '2', '3,2,5-8', '3-', '2,-3'"},
    ];
    let args = args::parse(
        "Select columns. Unlike cut, columns are written in the order given, \
         repeated columns are repeated, and a blank column is written for \
         a single column that a line does not have.",
        args::FileCount::Many,
        &A,
        argv,
        settings,
    )?;

    let specs = args.values("fields");
    if specs.is_empty() {
        return err!("cut requires at least one --fields");
    }
    // parse before anything is opened, so a bad spec writes nothing
    let config = CutConfig::from_spec(&specs.join(","))?.with_delim(settings.delim);

    let mut w = get_writer(&settings.output)?;
    config.cut_files(&args.files, &mut w)?;
    w.flush()?;
    Ok(())
}
