pub mod escape;
pub mod name;
pub mod tree;

pub use escape::{DEFAULT_DELIMITER, ESCAPE_CHARACTER};
pub use name::{ArrayName, Name, NameError, StringName};
pub use tree::{FileState, FsTree, NodeId, TreeError};
