//! Stack nodes, cross-stack references, and the graph arena.
//!
//! The graph is an orchestrator-owned arena addressed by stable string ids
//! rather than object references. A node may only be inserted after every
//! stack it depends on, so references always point strictly backwards in
//! build order.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::resources::ResourceSpec;
use crate::{Error, Result};

/// Stable identifier of a stack within a run,
/// e.g. `InvertedYieldTraderDevS3Stack`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct StackId(String);

impl StackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A value exported by a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputValue {
    /// Known at construction time (deterministic names).
    Literal { value: String },
    /// ARN of a resource in the owning stack; only the backend can resolve
    /// it to a final value.
    Arn { resource: String },
}

impl OutputValue {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn arn_of(resource: impl Into<String>) -> Self {
        Self::Arn {
            resource: resource.into(),
        }
    }
}

/// A (stack, output) pair consumed by a dependent stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossStackReference {
    pub stack_id: StackId,
    pub output: String,
}

impl CrossStackReference {
    pub fn new(stack_id: StackId, output: impl Into<String>) -> Self {
        Self {
            stack_id,
            output: output.into(),
        }
    }
}

/// One independently provisionable group of resources.
///
/// Nodes are immutable once inserted into the graph; construction threads
/// upstream outputs in, it never mutates predecessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackNode {
    pub id: StackId,
    /// Stacks whose outputs this node consumes.
    pub depends_on: Vec<StackId>,
    pub resources: Vec<ResourceSpec>,
    /// Output name -> value; the export key for output `N` is `<id>-N`.
    pub outputs: BTreeMap<String, OutputValue>,
}

impl StackNode {
    pub fn new(id: StackId) -> Self {
        Self {
            id,
            depends_on: Vec::new(),
            resources: Vec::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Look up a resource by logical id.
    pub fn resource(&self, logical_id: &str) -> Option<&ResourceSpec> {
        self.resources
            .iter()
            .find(|spec| spec.logical_id == logical_id)
    }

    /// Export key for one of this stack's outputs.
    pub fn export_key(&self, output: &str) -> String {
        format!("{}-{}", self.id, output)
    }
}

/// Insertion-ordered arena of stack nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackGraph {
    nodes: Vec<StackNode>,
}

impl StackGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Fails on a duplicate id or on a dependency that has
    /// not been inserted yet, which keeps the arena acyclic by construction.
    pub fn insert(&mut self, node: StackNode) -> Result<()> {
        if self.get(&node.id).is_some() {
            return Err(Error::DuplicateStack(node.id.to_string()));
        }
        for dep in &node.depends_on {
            if self.get(dep).is_none() {
                return Err(Error::ForwardReference {
                    from: node.id.to_string(),
                    to: dep.to_string(),
                });
            }
        }
        self.nodes.push(node);
        Ok(())
    }

    pub fn get(&self, id: &StackId) -> Option<&StackNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    /// Nodes in insertion (dependency) order.
    pub fn nodes(&self) -> &[StackNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a cross-stack reference against already-inserted nodes.
    pub fn resolve(&self, reference: &CrossStackReference) -> Result<&OutputValue> {
        self.get(&reference.stack_id)
            .and_then(|node| node.outputs.get(&reference.output))
            .ok_or_else(|| Error::UnresolvedReference {
                stack_id: reference.stack_id.to_string(),
                output: reference.output.clone(),
            })
    }

    /// Resolve a reference that must already be a construction-time literal.
    pub fn resolve_literal(&self, reference: &CrossStackReference) -> Result<&str> {
        match self.resolve(reference)? {
            OutputValue::Literal { value } => Ok(value),
            OutputValue::Arn { .. } => Err(Error::UnresolvedReference {
                stack_id: reference.stack_id.to_string(),
                output: reference.output.clone(),
            }),
        }
    }

    /// Export key -> declared value for the whole graph, rejecting
    /// duplicate keys.
    pub fn exports(&self) -> Result<BTreeMap<String, OutputValue>> {
        let mut exports = BTreeMap::new();
        for node in &self.nodes {
            for (name, value) in &node.outputs {
                let key = node.export_key(name);
                if exports.insert(key.clone(), value.clone()).is_some() {
                    return Err(Error::DuplicateExport(key));
                }
            }
        }
        Ok(exports)
    }

    /// Dependency-respecting order over all nodes; fails on a cycle.
    pub fn topological_order(&self) -> Result<Vec<StackId>> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for node in &self.nodes {
            self.topo_visit(&node.id, &mut marks, &mut order)?;
        }
        Ok(order)
    }

    fn topo_visit<'a>(
        &'a self,
        id: &'a StackId,
        marks: &mut HashMap<&'a str, Mark>,
        order: &mut Vec<StackId>,
    ) -> Result<()> {
        match marks.get(id.as_str()).copied() {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => return Err(Error::Cycle(id.to_string())),
            None => {}
        }
        marks.insert(id.as_str(), Mark::InProgress);

        if let Some(node) = self.get(id) {
            for dep in &node.depends_on {
                self.topo_visit(dep, marks, order)?;
            }
        }

        marks.insert(id.as_str(), Mark::Done);
        order.push(id.clone());
        Ok(())
    }

    /// Check the whole-graph invariants: dependencies point strictly
    /// earlier in insertion order, every exported ARN names a resource the
    /// stack declares, export keys are unique, and the graph is acyclic.
    ///
    /// Redundant for graphs built through [`StackGraph::insert`], but a
    /// deserialized graph has not been through those checks.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for node in &self.nodes {
            for dep in &node.depends_on {
                if !seen.contains(dep.as_str()) {
                    return Err(Error::ForwardReference {
                        from: node.id.to_string(),
                        to: dep.to_string(),
                    });
                }
            }
            for value in node.outputs.values() {
                if let OutputValue::Arn { resource } = value {
                    if node.resource(resource).is_none() {
                        return Err(Error::UnknownResource {
                            stack_id: node.id.to_string(),
                            resource: resource.clone(),
                        });
                    }
                }
            }
            seen.insert(node.id.as_str());
        }
        self.topological_order()?;
        self.exports()?;
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}
