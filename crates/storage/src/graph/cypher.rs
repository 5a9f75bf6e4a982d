//! Cypher text for the graph repository
//!
//! Only `NodeLabel::as_str` and `RelationshipType::as_str` are spliced into
//! query text. Property keys and values always travel as parameters.

use relgraph_core::{NodeLabel, NodeWritePolicy, RelationshipType};

pub(crate) const VERIFY: &str = "RETURN 1 AS ok";

/// `var` matches every key/value pair of the map parameter `param`
fn matches_all(var: &str, param: &str) -> String {
    format!("ALL(k IN keys(${param}) WHERE {var}[k] = ${param}[k])")
}

pub(crate) fn create_node(label: NodeLabel, policy: NodeWritePolicy) -> String {
    let label = label.as_str();
    match policy {
        NodeWritePolicy::Create => {
            format!("CREATE (n:{label}) SET n = $props RETURN count(n) AS count")
        }
        NodeWritePolicy::Merge => {
            format!("MERGE (n:{label} {{id: $props.id}}) SET n += $props RETURN count(n) AS count")
        }
    }
}

pub(crate) fn create_relationship(
    from_label: NodeLabel,
    to_label: NodeLabel,
    rel_type: RelationshipType,
    policy: NodeWritePolicy,
) -> String {
    let (write, assign) = match policy {
        NodeWritePolicy::Create => ("CREATE", "="),
        NodeWritePolicy::Merge => ("MERGE", "+="),
    };
    format!(
        "MATCH (a:{from}), (b:{to}) WHERE {from_match} AND {to_match} \
         {write} (a)-[r:{rel}]->(b) SET r {assign} $rel_props \
         RETURN count(r) AS count",
        from = from_label.as_str(),
        to = to_label.as_str(),
        from_match = matches_all("a", "from_key"),
        to_match = matches_all("b", "to_key"),
        rel = rel_type.as_str(),
    )
}

pub(crate) fn find_nodes(label: NodeLabel) -> String {
    format!(
        "MATCH (n:{}) WHERE {} RETURN properties(n) AS props",
        label.as_str(),
        matches_all("n", "filters")
    )
}

pub(crate) fn update_node(label: NodeLabel) -> String {
    format!(
        "MATCH (n:{}) WHERE {} SET n += $update_props RETURN count(n) AS count",
        label.as_str(),
        matches_all("n", "match_props")
    )
}

pub(crate) fn delete_node(label: NodeLabel) -> String {
    format!(
        "MATCH (n:{}) WHERE {} DETACH DELETE n RETURN count(n) AS count",
        label.as_str(),
        matches_all("n", "match_props")
    )
}
