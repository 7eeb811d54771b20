use crate::prelude::*;
use coltools::prelude::*;

pub fn main(argv: &[String], settings: &mut Settings) -> Result<()> {
    const A: [ArgSpec; 4] = [
        arg_pos! {"mapping", "MappingFile", "two tab separated columns, key then value"},
        arg! {"key", "a", "Column", "column of the input holding the key, counting from 0, negative from the end. Default 0"},
        arg! {"insert", "b", "Column", "position of the new column in the output, counting from 0, negative from the end. Default 1"},
        arg! {"na", "N", "Text", "value for keys not in the mapping. Default is the key itself"},
    ];
    let args = args::parse(
        "Add a column to a file, by looking up one of its columns in a mapping file.",
        args::FileCount::One,
        &A,
        argv,
        settings,
    )?;

    let Some(mapping) = args.value("mapping") else {
        return err!("join requires a mapping file");
    };
    let mut config = AddMapping::new(MappingTable::load(&mapping)?);
    if let Some(key) = args.value("key") {
        config.key_col = parse_isize(&key, "key column")?;
    }
    if let Some(insert) = args.value("insert") {
        config.insert_at = parse_isize(&insert, "insert column")?;
    }
    config.na = args.value("na");
    config.delim = settings.delim;

    let mut w = get_writer(&settings.output)?;
    config.add_file(&args.files[0], &mut w)?;
    w.flush()?;
    Ok(())
}
