pub mod header;
pub mod reader;

pub use header::{
    closest_header, locate_header, map_columns, ColumnBinding, ColumnMapping, HeaderSpec,
    MappingError, PartialHeader,
};
pub use reader::{category_name, read_raw_sheet, Cell, RawSheet};
