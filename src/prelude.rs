//! The prelude

#[doc(inline)]
pub use crate::cut::CutConfig;
#[doc(inline)]
pub use crate::fieldspec::{FieldSpec, Selector};
#[doc(inline)]
pub use crate::mapping::{AddMapping, MappingTable};
#[doc(inline)]
pub use crate::util::{
    err, get_reader, get_writer, parse_delimiter, parse_isize, write_row, Error, Reader, Result,
    TextLine,
};

#[doc(inline)]
pub use std::io::{BufRead, Read, Write};
