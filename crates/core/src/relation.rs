//! Relation tokens and their backend-specific representations
//!
//! The second column of an input row is a relation token (`friend`, `event`,
//! ...). Each backend needs something different from it: the document model
//! stores the object id in a named array field, the graph model creates a
//! node under a target label and a typed relationship towards it.
//!
//! Labels and relationship types are closed enums. Their `as_str()` spellings
//! are the only strings ever interpolated into Cypher.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Node labels known to the graph model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum NodeLabel {
    User,
    Group,
    Event,
}

impl NodeLabel {
    /// Every label in the vocabulary
    pub const ALL: [NodeLabel; 3] = [NodeLabel::User, NodeLabel::Group, NodeLabel::Event];

    /// Cypher spelling of the label
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeLabel::User => "User",
            NodeLabel::Group => "Group",
            NodeLabel::Event => "Event",
        }
    }
}

/// Relationship types known to the graph model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum RelationshipType {
    #[strum(serialize = "ATTENDED")]
    #[serde(rename = "ATTENDED")]
    Attended,
    #[strum(serialize = "FRIEND_WITH")]
    #[serde(rename = "FRIEND_WITH")]
    FriendWith,
    #[strum(serialize = "MEMBER_OF")]
    #[serde(rename = "MEMBER_OF")]
    MemberOf,
    #[strum(serialize = "NEIGHBOR_WITH")]
    #[serde(rename = "NEIGHBOR_WITH")]
    NeighborWith,
}

impl RelationshipType {
    /// Every relationship type in the vocabulary
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::Attended,
        RelationshipType::FriendWith,
        RelationshipType::MemberOf,
        RelationshipType::NeighborWith,
    ];

    /// Cypher spelling of the relationship type
    pub const fn as_str(self) -> &'static str {
        match self {
            RelationshipType::Attended => "ATTENDED",
            RelationshipType::FriendWith => "FRIEND_WITH",
            RelationshipType::MemberOf => "MEMBER_OF",
            RelationshipType::NeighborWith => "NEIGHBOR_WITH",
        }
    }
}

/// Graph-side mapping of a relation token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphMapping {
    /// Label of the node the object id becomes
    pub target_label: NodeLabel,
    /// Type of the relationship from the subject `User` to the target
    pub rel_type: RelationshipType,
}

/// One row of the relation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationEntry {
    pub token: &'static str,
    pub document_field: &'static str,
    pub graph: GraphMapping,
}

/// The fixed relation vocabulary
pub static DEFAULT_RELATIONS: &[RelationEntry] = &[
    RelationEntry {
        token: "event",
        document_field: "events",
        graph: GraphMapping {
            target_label: NodeLabel::Event,
            rel_type: RelationshipType::Attended,
        },
    },
    RelationEntry {
        token: "friend",
        document_field: "friends",
        graph: GraphMapping {
            target_label: NodeLabel::User,
            rel_type: RelationshipType::FriendWith,
        },
    },
    RelationEntry {
        token: "group",
        document_field: "groups",
        graph: GraphMapping {
            target_label: NodeLabel::Group,
            rel_type: RelationshipType::MemberOf,
        },
    },
    RelationEntry {
        token: "neighbor",
        document_field: "neighbors",
        graph: GraphMapping {
            target_label: NodeLabel::User,
            rel_type: RelationshipType::NeighborWith,
        },
    },
];

/// Looks relation tokens up in an immutable table
#[derive(Debug, Clone, Copy)]
pub struct RelationMapper {
    table: &'static [RelationEntry],
}

impl RelationMapper {
    /// Create a mapper over the given table
    pub const fn new(table: &'static [RelationEntry]) -> Self {
        Self { table }
    }

    fn entry(&self, token: &str) -> Option<&'static RelationEntry> {
        self.table.iter().find(|entry| entry.token == token)
    }

    /// Document field holding the related ids for `token`
    pub fn document_field(&self, token: &str) -> Option<&'static str> {
        self.entry(token).map(|entry| entry.document_field)
    }

    /// Target label and relationship type for `token`
    pub fn graph_mapping(&self, token: &str) -> Option<GraphMapping> {
        self.entry(token).map(|entry| entry.graph)
    }

    /// Tokens this mapper recognises
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> {
        self.table.iter().map(|entry| entry.token)
    }
}

impl Default for RelationMapper {
    fn default() -> Self {
        Self::new(DEFAULT_RELATIONS)
    }
}
