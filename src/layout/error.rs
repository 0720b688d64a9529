use thiserror::Error;

use crate::ir::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("node {id} depends on {dependency}, which is not in the dependency map")]
    UnknownDependency { id: NodeId, dependency: NodeId },
    #[error("dependency cycle through node {id}")]
    CyclicDependency { id: NodeId },
    #[error("invalid node id {0:?}")]
    InvalidNodeId(String),
}
