pub mod comment;
pub mod diff_types;
pub mod review;

pub use comment::{Comment, CommentLine, LineRange};
pub use diff_types::{DiffChunk, DiffFile, DiffLine, DiffModel, FileStatus, LineOrigin};
pub use review::ReviewedFiles;
