//! Materialised views of the location forest.

use std::collections::HashMap;

use serde::Serialize;

use super::Location;
use crate::LocationId;

/// A location together with its (derived) children.
///
/// Serializes flat: the location's own fields plus a `children` array.
/// Building, walking and dropping a tree never recurse, so chain depth is
/// not limited by the stack.
#[derive(Debug, Serialize)]
pub struct LocationNode {
    #[serde(flatten)]
    pub location: Location,
    pub children: Vec<LocationNode>,
}

impl LocationNode {
    pub fn leaf(location: Location) -> Self {
        Self {
            location,
            children: Vec::new(),
        }
    }

    /// A node with one level of children and no deeper expansion.
    pub fn with_children(location: Location, children: Vec<Location>) -> Self {
        let mut children: Vec<LocationNode> = children.into_iter().map(Self::leaf).collect();
        sort_nodes(&mut children);
        Self { location, children }
    }

    /// Assemble every root in `locations` with its full subtree.
    ///
    /// Roots are locations without a parent. Locations whose parent is not in
    /// `locations` are unreachable and dropped, as are members of a cycle.
    /// Siblings are ordered by location number.
    pub fn forest(locations: Vec<Location>) -> Vec<LocationNode> {
        let mut roots = Vec::new();
        let mut by_parent: HashMap<LocationId, Vec<Location>> = HashMap::new();
        for location in locations {
            match location.parent_id() {
                Some(parent_id) => by_parent.entry(parent_id).or_default().push(location),
                None => roots.push(location),
            }
        }

        // Pre-order arena: every child lands at a higher index than its parent.
        let mut arena: Vec<(LocationNode, Option<usize>)> = Vec::new();
        let mut pending: Vec<(Location, Option<usize>)> =
            roots.into_iter().map(|root| (root, None)).collect();
        while let Some((location, parent)) = pending.pop() {
            let index = arena.len();
            if let Some(kids) = by_parent.remove(&location.id()) {
                pending.extend(kids.into_iter().map(|kid| (kid, Some(index))));
            }
            arena.push((Self::leaf(location), parent));
        }

        // Fold back to front so each node is complete before it is attached.
        let mut forest = Vec::new();
        while let Some((mut node, parent)) = arena.pop() {
            sort_nodes(&mut node.children);
            match parent.and_then(|index| arena.get_mut(index)) {
                Some((parent_node, _)) => parent_node.children.push(node),
                None => forest.push(node),
            }
        }
        sort_nodes(&mut forest);
        forest
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: LocationId) -> Option<&LocationNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.location.id() == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }
}

impl Drop for LocationNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

fn sort_nodes(nodes: &mut [LocationNode]) {
    nodes.sort_by(|a, b| {
        a.location
            .location_number()
            .as_str()
            .cmp(b.location.location_number().as_str())
    });
}
