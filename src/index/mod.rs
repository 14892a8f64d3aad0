pub mod builder;
pub mod model;
pub mod sort;

pub use builder::IndexBuilder;
pub use model::{ExamTypeGroup, FileEntry, Language, SubjectData, YearGroup};
