use std::fmt::{self, Display, Write as _};

use crate::util::Stats;

use super::{BvhNode, BvhTree, NodeIdx};

/// Shape of a built hierarchy, for logging and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    pub node_count: usize,
    pub leaf_count: usize,
    /// Depth of leaves, root alone has depth 1
    pub depth: Stats,
    /// Primitive count per leaf
    pub leaf_size: Stats,
}

impl Display for BvhStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes: {} ({} leaves)", self.node_count, self.leaf_count)?;
        writeln!(f, "Depth: {}", self.depth)?;
        write!(f, "Leaf size: {}", self.leaf_size)
    }
}

impl BvhTree {
    pub fn statistics(&self) -> BvhStatistics {
        let mut leaf_size = Stats::default();
        leaf_size.add_samples(self.nodes.iter().filter_map(|node| match node {
            BvhNode::Leaf { primitives, .. } => Some(primitives.len()),
            BvhNode::Inner { .. } => None,
        }));

        BvhStatistics {
            node_count: self.nodes.len(),
            leaf_count: leaf_size.count,
            depth: self.depth_statistics_recursive(self.root),
            leaf_size,
        }
    }

    fn depth_statistics_recursive(&self, index: NodeIdx) -> Stats {
        match &self.nodes[index] {
            BvhNode::Leaf { .. } => Stats::new_single(1),
            BvhNode::Inner { left, right, .. } => {
                let mut ret = self
                    .depth_statistics_recursive(*left)
                    .merge(&self.depth_statistics_recursive(*right));
                ret.min += 1;
                ret.max += 1;
                ret.avg += 1.0;
                ret
            }
        }
    }

    /// Prints the node hierarchy to stdout, one node per line.
    pub fn print_tree(&self) {
        print!("{}", TreeListing(self));
    }

    pub fn write_tree(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.write_recursive(out, 0, self.root)
    }

    fn write_recursive(&self, out: &mut impl fmt::Write, indent: usize, index: NodeIdx) -> fmt::Result {
        let node = &self.nodes[index];
        let bound = node.bound();
        write!(
            out,
            "{}- {}{}: {:?}-{:?}",
            "  ".repeat(indent),
            if matches!(node, BvhNode::Leaf { .. }) { "L" } else { "I" },
            index.index(),
            bound.min.coords.as_slice(),
            bound.max.coords.as_slice(),
        )?;

        match node {
            BvhNode::Leaf { primitives, .. } => {
                let mut list = String::new();
                for (i, primitive) in primitives.iter().enumerate() {
                    if i > 0 {
                        list.push_str(", ");
                    }
                    write!(list, "{}", primitive.index())?;
                }
                writeln!(out, " [{list}]")
            }
            BvhNode::Inner { left, right, .. } => {
                writeln!(out)?;
                self.write_recursive(out, indent + 1, *left)?;
                self.write_recursive(out, indent + 1, *right)
            }
        }
    }
}

struct TreeListing<'a>(&'a BvhTree);

impl Display for TreeListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_tree(f)
    }
}
