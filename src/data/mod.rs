pub mod table;
pub mod value;

pub use table::{Row, RowTable, TableError, SECONDS_COLUMN, TIME_COLUMN};
pub use value::Value;
