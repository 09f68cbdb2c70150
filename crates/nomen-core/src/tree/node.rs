//! Node identity and per-node state

use std::collections::BTreeSet;
use std::fmt;

use crate::tree::TreeError;

/// Handle identifying one node inside its [`FsTree`](crate::tree::FsTree).
///
/// Ids are plain copyable values; the tree owns every node, and all
/// cross-node references (parent links, directory children, link targets)
/// are ids rather than owning edges, keeping the ownership graph acyclic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a file node.
///
/// `Deleted` is a declared marker with no transitions into or out of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileState {
    Closed,
    Open,
    Deleted,
}

/// What a node is, plus its kind-specific state.
#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    Directory { children: BTreeSet<NodeId> },
    File { state: FileState },
    Link { target: Option<NodeId> },
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub base_name: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// Base names must be non-blank and free of the path separator and NUL.
/// Only the root carries an empty base name, and it is created with the
/// tree rather than through this check.
pub(crate) fn check_base_name(bn: &str) -> Result<(), TreeError> {
    let reason = if bn.trim().is_empty() {
        Some("must not be blank")
    } else if bn.contains('/') {
        Some("must not contain the path separator")
    } else if bn.contains('\0') {
        Some("must not contain NUL")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(TreeError::InvalidBaseName {
            name: bn.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_base_name() {
        assert!(check_base_name("ls").is_ok());
        assert!(check_base_name(".bashrc").is_ok());
        assert!(check_base_name("wallpaper.jpg").is_ok());
        assert!(check_base_name("").is_err());
        assert!(check_base_name("   ").is_err());
        assert!(check_base_name("usr/bin").is_err());
        assert!(check_base_name("nul\0byte").is_err());
    }
}
