//! Block tree assembly.
//!
//! Fetches paginated children for every block that declares them,
//! depth-first, and enforces the structural guards: a depth ceiling, a
//! node-count ceiling, and cycle detection over the active ancestor
//! path. The renderer downstream can assume an acyclic tree.

use std::collections::HashSet;

use futures::future::BoxFuture;

use crate::error::{Error, Result};
use crate::model::Block;
use crate::notion::{ChildrenPage, DocumentSource};

/// Ceilings for one document's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLimits {
    /// Maximum nesting depth (top-level blocks are depth 1).
    pub max_depth: usize,
    /// Maximum total number of blocks in the tree.
    pub max_nodes: usize,
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self {
            max_depth: 50,
            max_nodes: 5000,
        }
    }
}

/// Loads complete block trees from a [`DocumentSource`].
///
/// One loader serves a whole run; each `load` call carries its own
/// traversal state, so concurrent loads over shared `&self` are fine.
pub struct TreeLoader<'a, S: DocumentSource> {
    source: &'a S,
    limits: TreeLimits,
}

struct LoadState {
    source_id: String,
    nodes: usize,
    active_path: HashSet<String>,
}

impl<'a, S: DocumentSource> TreeLoader<'a, S> {
    #[must_use]
    pub fn new(source: &'a S, limits: TreeLimits) -> Self {
        Self { source, limits }
    }

    /// Load the full ordered block tree for one document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TreeTooLarge`] when the tree exceeds the depth or
    /// node ceiling, [`Error::MalformedTree`] when a block id repeats on
    /// its own ancestor path, and [`Error::Fetch`] when the source fails.
    pub async fn load(&self, source_id: &str) -> Result<Vec<Block>> {
        let mut state = LoadState {
            source_id: source_id.to_string(),
            nodes: 0,
            active_path: HashSet::from([source_id.to_string()]),
        };
        self.load_level(source_id, 1, &mut state).await
    }

    fn load_level<'b>(
        &'b self,
        parent_id: &'b str,
        depth: usize,
        state: &'b mut LoadState,
    ) -> BoxFuture<'b, Result<Vec<Block>>> {
        Box::pin(async move {
            if depth > self.limits.max_depth {
                return Err(Error::TreeTooLarge {
                    source_id: state.source_id.clone(),
                    detail: format!("nesting deeper than {} levels", self.limits.max_depth),
                });
            }

            let mut blocks = Vec::new();
            let mut cursor: Option<String> = None;

            loop {
                let ChildrenPage {
                    blocks: fetched,
                    next_cursor,
                } = self
                    .source
                    .block_children(parent_id, cursor.as_deref())
                    .await?;

                for item in fetched {
                    state.nodes += 1;
                    if state.nodes > self.limits.max_nodes {
                        return Err(Error::TreeTooLarge {
                            source_id: state.source_id.clone(),
                            detail: format!("more than {} blocks", self.limits.max_nodes),
                        });
                    }

                    let mut block = item.block;
                    if item.has_children {
                        if !state.active_path.insert(block.id.clone()) {
                            return Err(Error::MalformedTree {
                                source_id: state.source_id.clone(),
                                detail: format!("block {} repeats on its ancestor path", block.id),
                            });
                        }
                        let parent = block.id.clone();
                        block.children = self.load_level(&parent, depth + 1, state).await?;
                        state.active_path.remove(&parent);
                    }
                    blocks.push(block);
                }

                match next_cursor {
                    Some(next) => cursor = Some(next),
                    None => break,
                }
            }

            Ok(blocks)
        })
    }
}
