#[cfg(feature = "cli")]
pub mod cli;
pub mod align;
pub mod config;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;

pub use align::{AlignOutcome, Grid, GridCell, auto_align};
pub use config::{AlignConfig, Config, PlacementConfig, TreeConfig, load_config};
pub use geometry::{BoundingBox, BoundingBoxProvider, MeasuredBy, Unmeasured, check_overlap};
pub use ir::{DependencyMap, FsmState, FsmStates, NodeId, Position};
pub use layout::{LayoutError, LayoutNode, TreeLayout, compute_tree_layout};
