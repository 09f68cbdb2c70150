//! In-memory filesystem tree addressed by compound names
//!
//! An arena-owned hierarchy of directories, files and links. The tree owns
//! every node in an id-keyed table; directories list their children as a
//! set of ids and every node holds a non-owning id reference back to its
//! parent. Full paths are composed by walking parent references and
//! appending base names onto a [`StringName`].

mod node;

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::escape::{self, DEFAULT_DELIMITER};
use crate::name::{Name, NameError, StringName};

pub use node::{FileState, NodeId};
use node::{NodeData, NodeKind, check_base_name};

/// Errors raised by tree construction, mutation and traversal.
#[derive(Error, Debug)]
pub enum TreeError {
    // =========================================================================
    // CALLER ERRORS - recoverable by correcting the input
    // =========================================================================
    /// A base name violating the non-blank / no-separator / no-NUL rules.
    #[error("invalid base name {name:?}: {reason}")]
    InvalidBaseName { name: String, reason: &'static str },

    /// An id that does not resolve to a node of this tree.
    #[error("node {0} is not part of this tree")]
    UnknownNode(NodeId),

    /// A directory operation aimed at a file or link.
    #[error("node {0} is not a directory")]
    NotADirectory(NodeId),

    /// A file operation aimed at a directory or link.
    #[error("node {0} is not a file")]
    NotAFile(NodeId),

    /// A link operation aimed at a directory or file.
    #[error("node {0} is not a link")]
    NotALink(NodeId),

    /// Rename or move aimed at the root node.
    #[error("cannot {0} the root node")]
    RootImmutable(&'static str),

    /// Moving a directory underneath itself.
    #[error("cannot move a directory into its own subtree")]
    SubtreeCycle,

    /// A file lifecycle method called outside its required state.
    #[error("file is {actual:?} but the operation requires {required:?}")]
    InvalidFileState {
        required: FileState,
        actual: FileState,
    },

    // =========================================================================
    // INTERNAL DEFECTS - invariant violations, not caller mistakes
    // =========================================================================
    /// A link with no target where one is required.
    #[error("link {0} has no target")]
    DanglingLink(NodeId),

    /// A chain of links that never reaches a non-link node.
    #[error("link chain starting at {0} does not terminate")]
    LinkCycle(NodeId),

    /// A node violating a structural invariant of the tree.
    #[error("node {id} violates a tree invariant: {detail}")]
    CorruptNode { id: NodeId, detail: String },

    // =========================================================================
    // COMPOSITE
    // =========================================================================
    /// A name-layer failure surfacing through a tree operation.
    #[error(transparent)]
    Name(#[from] NameError),

    /// A failure encountered somewhere inside a recursive subtree
    /// operation, wrapped so the caller sees one failure kind with the
    /// original cause attached.
    #[error("subtree search under {context:?} failed")]
    ServiceFailure {
        context: String,
        #[source]
        trigger: Box<TreeError>,
    },
}

impl TreeError {
    /// The wrapped cause, if this is a [`TreeError::ServiceFailure`].
    pub fn trigger(&self) -> Option<&TreeError> {
        match self {
            TreeError::ServiceFailure { trigger, .. } => Some(trigger),
            _ => None,
        }
    }
}

/// The arena owning a whole node hierarchy.
///
/// Created with its root already in place: the unique node with an empty
/// base name and no parent. All operations address nodes by [`NodeId`].
/// The tree assumes exclusive access per mutation; sharing it across
/// threads requires external synchronization.
#[derive(Debug)]
pub struct FsTree {
    nodes: HashMap<NodeId, NodeData>,
    root: NodeId,
    next_id: u64,
}

impl Default for FsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FsTree {
    /// A tree holding only its root directory.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            NodeData {
                base_name: String::new(),
                parent: None,
                kind: NodeKind::Directory {
                    children: BTreeSet::new(),
                },
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    /// The root directory's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` resolves to a node of this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    // ==================== Construction ====================

    /// Create a directory under `parent`. The new node is registered in
    /// the parent's child set as part of construction.
    pub fn add_directory(&mut self, parent: NodeId, bn: &str) -> Result<NodeId, TreeError> {
        self.attach(
            parent,
            bn,
            NodeKind::Directory {
                children: BTreeSet::new(),
            },
        )
    }

    /// Create a file under `parent`, initially closed.
    pub fn add_file(&mut self, parent: NodeId, bn: &str) -> Result<NodeId, TreeError> {
        self.attach(
            parent,
            bn,
            NodeKind::File {
                state: FileState::Closed,
            },
        )
    }

    /// Create a link under `parent`, optionally aimed at `target`. The
    /// link references its target without owning it.
    pub fn add_link(
        &mut self,
        parent: NodeId,
        bn: &str,
        target: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        if let Some(target) = target {
            self.node(target)?;
        }
        self.attach(parent, bn, NodeKind::Link { target })
    }

    fn attach(&mut self, parent: NodeId, bn: &str, kind: NodeKind) -> Result<NodeId, TreeError> {
        check_base_name(bn)?;
        match &self.node(parent)?.kind {
            NodeKind::Directory { .. } => {}
            _ => return Err(TreeError::NotADirectory(parent)),
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeData {
                base_name: bn.to_owned(),
                parent: Some(parent),
                kind,
            },
        );
        if let Some(NodeData {
            kind: NodeKind::Directory { children },
            ..
        }) = self.nodes.get_mut(&parent)
        {
            children.insert(id);
        }
        debug!(%id, %parent, base_name = bn, "attach node");
        Ok(id)
    }

    // ==================== Accessors ====================

    /// The node's base name. For a link this delegates to the target's
    /// base name, failing on a dangling link or a non-terminating chain.
    pub fn base_name(&self, id: NodeId) -> Result<&str, TreeError> {
        let node = self.node(self.resolve_link(id)?)?;
        Ok(&node.base_name)
    }

    /// The node's parent id; `None` only for the root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.parent)
    }

    /// A directory's children, in id order.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        match &self.node(id)?.kind {
            NodeKind::Directory { children } => Ok(children.iter().copied().collect()),
            _ => Err(TreeError::NotADirectory(id)),
        }
    }

    /// A link's target, if set.
    pub fn link_target(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        match &self.node(id)?.kind {
            NodeKind::Link { target } => Ok(*target),
            _ => Err(TreeError::NotALink(id)),
        }
    }

    /// Repoint a link at `target`.
    pub fn set_link_target(&mut self, id: NodeId, target: NodeId) -> Result<(), TreeError> {
        self.node(target)?;
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::Link { target: slot }) => {
                *slot = Some(target);
                Ok(())
            }
            Some(_) => Err(TreeError::NotALink(id)),
            None => Err(TreeError::UnknownNode(id)),
        }
    }

    // ==================== Mutation ====================

    /// Replace the node's base name, re-validated. Renaming a link
    /// renames its target; the root cannot be renamed.
    pub fn rename(&mut self, id: NodeId, bn: &str) -> Result<(), TreeError> {
        check_base_name(bn)?;
        let terminal = self.resolve_link(id)?;
        if terminal == self.root {
            return Err(TreeError::RootImmutable("rename"));
        }
        if let Some(node) = self.nodes.get_mut(&terminal) {
            debug!(%terminal, from = %node.base_name, to = bn, "rename node");
            node.base_name = bn.to_owned();
        }
        Ok(())
    }

    /// Re-parent `id` under `to`: remove it from the old parent's child
    /// set, add it to the new one's, repoint the parent reference.
    ///
    /// The root cannot move, and a directory cannot move into its own
    /// subtree.
    pub fn move_node(&mut self, id: NodeId, to: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmutable("move"));
        }
        match &self.node(to)?.kind {
            NodeKind::Directory { .. } => {}
            _ => return Err(TreeError::NotADirectory(to)),
        }
        let mut cursor = Some(to);
        while let Some(ancestor) = cursor {
            if ancestor == id {
                return Err(TreeError::SubtreeCycle);
            }
            cursor = self.node(ancestor)?.parent;
        }

        let old_parent = self.node(id)?.parent;
        if let Some(old_parent) = old_parent {
            if let Some(NodeKind::Directory { children }) =
                self.nodes.get_mut(&old_parent).map(|n| &mut n.kind)
            {
                children.remove(&id);
            }
        }
        if let Some(NodeKind::Directory { children }) =
            self.nodes.get_mut(&to).map(|n| &mut n.kind)
        {
            children.insert(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(to);
        }
        debug!(%id, %to, "move node");
        Ok(())
    }

    // ==================== Path composition ====================

    /// The node's full name: the parent's full name with this node's
    /// base name appended. The root yields the empty name. Linear in
    /// depth, not memoized.
    ///
    /// Base names are masked before appending, so names containing the
    /// default delimiter survive the round trip.
    pub fn full_name(&self, id: NodeId) -> Result<StringName, TreeError> {
        let node = self.node(id)?;
        match node.parent {
            None => Ok(StringName::empty(DEFAULT_DELIMITER)?),
            Some(parent) => {
                let prefix = self.full_name(parent)?;
                let masked = escape::mask(self.base_name(id)?, DEFAULT_DELIMITER);
                Ok(prefix.append(&masked)?)
            }
        }
    }

    // ==================== Search ====================

    /// Every node in the subtree rooted at `start` (including `start`
    /// itself) whose base name equals `bn`.
    ///
    /// Any failure inside the recursion - a dangling link, a corrupted
    /// node, a violated invariant - aborts the search and surfaces as one
    /// [`TreeError::ServiceFailure`] carrying the original error, so
    /// callers can tell an empty result from a failed subsystem.
    #[instrument(level = "debug", skip(self))]
    pub fn find_nodes(&self, start: NodeId, bn: &str) -> Result<BTreeSet<NodeId>, TreeError> {
        self.collect_matches(start, bn).map_err(|trigger| {
            let context = self.describe(start);
            TreeError::ServiceFailure {
                context,
                trigger: Box::new(trigger),
            }
        })
    }

    fn collect_matches(&self, id: NodeId, bn: &str) -> Result<BTreeSet<NodeId>, TreeError> {
        self.check_node_invariants(id)?;
        let mut matches = BTreeSet::new();
        if self.base_name(id)? == bn {
            matches.insert(id);
        }
        if let NodeKind::Directory { children } = &self.node(id)?.kind {
            for &child in children {
                matches.extend(self.collect_matches(child, bn)?);
            }
        }
        Ok(matches)
    }

    // ==================== File lifecycle ====================

    /// The file's lifecycle state.
    pub fn file_state(&self, id: NodeId) -> Result<FileState, TreeError> {
        match &self.node(id)?.kind {
            NodeKind::File { state } => Ok(*state),
            _ => Err(TreeError::NotAFile(id)),
        }
    }

    /// Open a closed file.
    pub fn open_file(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.transition_file(id, FileState::Closed, FileState::Open)
    }

    /// Close an open file.
    pub fn close_file(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.transition_file(id, FileState::Open, FileState::Closed)
    }

    /// Read up to `count` bytes from an open file.
    ///
    /// The byte store itself is an external collaborator; this fills from
    /// a stub source.
    pub fn read_file(&self, id: NodeId, count: usize) -> Result<Vec<u8>, TreeError> {
        let state = self.file_state(id)?;
        if state != FileState::Open {
            return Err(TreeError::InvalidFileState {
                required: FileState::Open,
                actual: state,
            });
        }
        let mut buffer = Vec::with_capacity(count);
        for _ in 0..count {
            buffer.push(self.read_next_byte(id)?);
        }
        Ok(buffer)
    }

    fn read_next_byte(&self, _id: NodeId) -> Result<u8, TreeError> {
        Ok(0)
    }

    fn transition_file(
        &mut self,
        id: NodeId,
        required: FileState,
        next: FileState,
    ) -> Result<(), TreeError> {
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::File { state }) => {
                if *state != required {
                    return Err(TreeError::InvalidFileState {
                        required,
                        actual: *state,
                    });
                }
                *state = next;
                Ok(())
            }
            Some(_) => Err(TreeError::NotAFile(id)),
            None => Err(TreeError::UnknownNode(id)),
        }
    }

    // ==================== Internals ====================

    fn node(&self, id: NodeId) -> Result<&NodeData, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::UnknownNode(id))
    }

    /// Follow link targets until a non-link node, bounded by the node
    /// count so a target cycle cannot loop forever.
    fn resolve_link(&self, id: NodeId) -> Result<NodeId, TreeError> {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            match &self.node(current)?.kind {
                NodeKind::Link { target } => {
                    current = (*target).ok_or(TreeError::DanglingLink(current))?;
                }
                _ => return Ok(current),
            }
        }
        Err(TreeError::LinkCycle(id))
    }

    fn check_node_invariants(&self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        if id == self.root {
            if !node.base_name.is_empty() {
                return Err(TreeError::CorruptNode {
                    id,
                    detail: "root must carry the empty base name".to_owned(),
                });
            }
        } else {
            check_base_name(&node.base_name).map_err(|e| TreeError::CorruptNode {
                id,
                detail: e.to_string(),
            })?;
            let Some(parent) = node.parent else {
                return Err(TreeError::CorruptNode {
                    id,
                    detail: "non-root node without a parent".to_owned(),
                });
            };
            match self.nodes.get(&parent).map(|p| &p.kind) {
                Some(NodeKind::Directory { children }) if children.contains(&id) => {}
                _ => {
                    return Err(TreeError::CorruptNode {
                        id,
                        detail: "parent does not list this node as a child".to_owned(),
                    });
                }
            }
        }
        if let NodeKind::Link { target: Some(target) } = &node.kind {
            if !self.nodes.contains_key(target) {
                return Err(TreeError::CorruptNode {
                    id,
                    detail: "link target is not part of the tree".to_owned(),
                });
            }
        }
        Ok(())
    }

    fn describe(&self, id: NodeId) -> String {
        self.full_name(id)
            .map(|n| n.as_string())
            .unwrap_or_else(|_| format!("node {id}"))
    }

    /// Overwrite a node's base name with no validation, to provoke
    /// invariant failures in tests.
    #[cfg(any(test, feature = "debug-tools"))]
    pub fn debug_set_base_name(&mut self, id: NodeId, bn: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.base_name = bn.to_owned();
        }
    }
}
