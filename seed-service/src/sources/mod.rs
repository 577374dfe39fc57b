pub mod student_year;

pub use student_year::{StudentYearSource, YearDriver};
