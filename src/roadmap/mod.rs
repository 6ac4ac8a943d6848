//! Roadmap model, diffing, conversion, and the client-side store.
//!
//! This module provides:
//! - [`RoadmapSnapshot`]: one roadmap as sent by the server, flat or nested
//! - [`DiffTracker`]: which node ids are new since the last snapshot
//! - [`convert`]: snapshot to display nodes and edges
//! - [`RoadmapStore`]: the current snapshot, graph view, and detail lookup

mod convert;
mod diff;
mod reconcile;
mod store;
mod types;

pub use convert::{
    convert, style_for, GraphData, GraphEdge, GraphNode, NodeColor, NodeShape, NodeStyle,
    HIGHLIGHT_BORDER,
};
pub use diff::DiffTracker;
pub use store::{GraphView, RequestTicket, RoadmapStore, RoadmapUpdate};
pub use types::{
    Book, Listing, NodeCategory, NodeDetail, Project, Resource, ResourceLink, RoadmapNode,
    RoadmapSnapshot, TextBlock, DEFAULT_ROOT_LABEL, ROOT_ID,
};
