pub mod photo;
pub mod rows;
pub mod workbook;

pub use photo::{PhotoData, PhotoLoader, PhotoSource};
pub use rows::{is_workbook, load_rows, read_rows, rows_from_value, SourceError, SourceErrorKind};
pub use workbook::{load_workbook, read_workbook};
