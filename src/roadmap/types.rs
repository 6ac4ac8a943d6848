use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

use crate::error::{RoadmapError, RoadmapResult};

/// Id of the distinguished root node.
pub const ROOT_ID: &str = "root";

/// Label used when a root node has to be synthesized.
pub const DEFAULT_ROOT_LABEL: &str = "Your Career Path";

/// A node of a roadmap snapshot.
///
/// Covers both wire shapes: flat nodes carry a `parent` reference, nested
/// nodes carry their `children`. Fields the client does not interpret are
/// kept in `extra` so the node can be handed back to a renderer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireNode")]
pub struct RoadmapNode {
    /// Unique id within a snapshot.
    pub id: String,
    /// Display string (`label` in flat payloads, `title` in nested ones).
    pub label: String,
    /// Raw category string (`type` or `category` on the wire).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Parent id for flat payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Ordered children for nested payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RoadmapNode>>,
    /// Every other field of the source node.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node as it appears on the wire, with both naming schemes kept apart.
///
/// `label` wins over `title` and `type` wins over `category`. Null or
/// mistyped values count as absent.
#[derive(Deserialize)]
struct WireNode {
    id: String,
    #[serde(default, deserialize_with = "lenient")]
    label: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    parent: Option<String>,
    #[serde(default)]
    children: Option<Vec<RoadmapNode>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<WireNode> for RoadmapNode {
    fn from(wire: WireNode) -> Self {
        let label = wire
            .label
            .filter(|l| !l.is_empty())
            .or(wire.title)
            .unwrap_or_default();
        Self {
            id: wire.id,
            label,
            category: wire.kind.or(wire.category),
            parent: wire.parent,
            children: wire.children,
            extra: wire.extra,
        }
    }
}

impl RoadmapNode {
    /// Create a node with an id and a label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: None,
            parent: None,
            children: None,
            extra: Map::new(),
        }
    }

    /// Set the raw category string.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the parent id.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the children.
    pub fn with_children(mut self, children: Vec<RoadmapNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Parsed category.
    pub fn category(&self) -> NodeCategory {
        self.category
            .as_deref()
            .map(NodeCategory::parse)
            .unwrap_or(NodeCategory::Other)
    }

    /// Children in their given order; empty for leaves.
    pub fn children(&self) -> &[RoadmapNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Parent id, treating an empty string as absent.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether this is the distinguished root node.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Detail fields carried inline on the node (nested payloads).
    pub fn inline_detail(&self) -> NodeDetail {
        NodeDetail::from_value(Value::Object(self.extra.clone())).unwrap_or_default()
    }
}

/// Node category controlling its visual style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Root,
    Category,
    Topic,
    Subtopic,
    Resource,
    Decision,
    /// Missing or unrecognized category.
    Other,
}

impl NodeCategory {
    /// Parse a category string case-insensitively. Unknown values map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "root" => NodeCategory::Root,
            "category" => NodeCategory::Category,
            "topic" => NodeCategory::Topic,
            "subtopic" => NodeCategory::Subtopic,
            "resource" => NodeCategory::Resource,
            "decision" => NodeCategory::Decision,
            _ => NodeCategory::Other,
        }
    }
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeCategory::Root => write!(f, "root"),
            NodeCategory::Category => write!(f, "category"),
            NodeCategory::Topic => write!(f, "topic"),
            NodeCategory::Subtopic => write!(f, "subtopic"),
            NodeCategory::Resource => write!(f, "resource"),
            NodeCategory::Decision => write!(f, "decision"),
            NodeCategory::Other => write!(f, "other"),
        }
    }
}

/// Free-form detail attached to a node.
///
/// Every field is optional and shape-tolerant; values of an unexpected
/// shape are kept as JSON so they can still be shown as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDetail {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<TextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_progression: Option<TextBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<TextBlock>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub resources: Option<Vec<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Listing<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books: Option<Listing<Book>>,
}

impl NodeDetail {
    /// Interpret a JSON value as a detail object. Non-objects yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Resources, empty when absent.
    pub fn resources(&self) -> &[Resource] {
        self.resources.as_deref().unwrap_or(&[])
    }
}

/// Deserialize a field, turning a value of the wrong shape into `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A string or a list of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextBlock {
    Text(String),
    List(Vec<String>),
    Other(Value),
}

/// A list of entries, or a single free-text value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Many(Vec<T>),
    One(String),
    Other(Value),
}

/// A learning resource entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resource {
    /// A URL or plain text.
    Text(String),
    Link(ResourceLink),
    Other(Value),
}

/// A named resource with a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A sample project entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Project {
    Text(String),
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Other(Value),
}

/// A recommended book entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Book {
    Text(String),
    Titled {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
    Other(Value),
}

/// One complete roadmap structure as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoadmapSnapshot {
    /// Node list with parent references plus a detail map keyed by id.
    Flat {
        nodes: Vec<RoadmapNode>,
        #[serde(rename = "nodeDetails")]
        node_details: HashMap<String, NodeDetail>,
    },
    /// A root node with nested children.
    Nested(RoadmapNode),
}

impl RoadmapSnapshot {
    /// Detect the payload shape and parse it.
    ///
    /// An object with a `nodes` field is flat, an object with an `id` is
    /// nested. Anything else is malformed.
    pub fn from_value(value: Value) -> RoadmapResult<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(RoadmapError::MalformedSnapshot {
                    message: format!("expected an object, got {}", json_kind(&other)),
                })
            }
        };

        if let Some(nodes) = map.remove("nodes") {
            if !nodes.is_array() {
                return Err(RoadmapError::MalformedSnapshot {
                    message: format!("`nodes` must be an array, got {}", json_kind(&nodes)),
                });
            }
            let nodes: Vec<RoadmapNode> = serde_json::from_value(nodes)?;
            let node_details = match map.remove("nodeDetails") {
                Some(Value::Object(details)) => parse_details(details),
                Some(Value::Null) | None => HashMap::new(),
                Some(other) => {
                    warn!(kind = json_kind(&other), "Ignoring non-object nodeDetails");
                    HashMap::new()
                }
            };
            return Ok(RoadmapSnapshot::Flat {
                nodes,
                node_details,
            });
        }

        if map.contains_key("id") {
            let root: RoadmapNode = serde_json::from_value(Value::Object(map))?;
            return Ok(RoadmapSnapshot::Nested(root));
        }

        Err(RoadmapError::MalformedSnapshot {
            message: "expected a `nodes` array or a root node with an `id`".to_string(),
        })
    }

    /// Minimal roadmap shown when the server cannot be reached.
    pub fn placeholder() -> Self {
        let mut node_details = HashMap::new();
        node_details.insert(
            ROOT_ID.to_string(),
            NodeDetail {
                content: Some(
                    "This is the starting point of your personalized career roadmap. \
                     Chat with me about your interests to build your path!"
                        .to_string(),
                ),
                resources: Some(vec![Resource::Text(
                    "Let's start by discussing your interests and goals.".to_string(),
                )]),
                ..NodeDetail::default()
            },
        );

        RoadmapSnapshot::Flat {
            nodes: vec![RoadmapNode::new(ROOT_ID, DEFAULT_ROOT_LABEL).with_category("root")],
            node_details,
        }
    }

    /// Whether the snapshot has nothing to draw.
    ///
    /// A nested root without children counts as empty; a flat snapshot is
    /// empty only when it has no nodes at all.
    pub fn is_empty(&self) -> bool {
        match self {
            RoadmapSnapshot::Flat { nodes, .. } => nodes.is_empty(),
            RoadmapSnapshot::Nested(root) => root.children().is_empty(),
        }
    }

    /// Find a node by id.
    pub fn find(&self, id: &str) -> Option<&RoadmapNode> {
        match self {
            RoadmapSnapshot::Flat { nodes, .. } => nodes.iter().find(|n| n.id == id),
            RoadmapSnapshot::Nested(root) => find_nested(root, id),
        }
    }

    /// Detail for a node, from the detail map or inline fields.
    pub fn detail(&self, id: &str) -> Option<NodeDetail> {
        match self {
            RoadmapSnapshot::Flat { node_details, .. } => node_details.get(id).cloned(),
            RoadmapSnapshot::Nested(root) => find_nested(root, id).map(RoadmapNode::inline_detail),
        }
    }
}

fn find_nested<'a>(root: &'a RoadmapNode, id: &str) -> Option<&'a RoadmapNode> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children().iter().rev());
    }
    None
}

fn parse_details(details: Map<String, Value>) -> HashMap<String, NodeDetail> {
    details
        .into_iter()
        .filter_map(|(id, value)| match NodeDetail::from_value(value) {
            Some(detail) => Some((id, detail)),
            None => {
                warn!(node_id = %id, "Skipping node detail that is not an object");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
