//! Flat `BoundsPack` -> explicit forest.
//!
//! Structure is validated over the whole array before any node is built:
//! every child range must lie inside the array, no entry may be claimed by
//! two parents (or by itself), every entry must be reachable from a root,
//! and no chain may be deeper than [`MAX_DEPTH`]. Roots are the unclaimed
//! entries, in array order.

use std::ops::Range;

use super::flags::parse_entry_flags;
use super::node::{BoundNode, Forest, HashName, MAX_DEPTH};
use super::point_cloud::PointCloud;
use super::record::{BoundsPack, FlatRecord};
use crate::hash::NameTable;
use crate::util::coords::{to_host_orientation, to_host_position};
use crate::util::{Error, Result};

/// Decoder configuration plus the name table used for identifiers.
#[derive(Debug)]
pub struct BoundsDecoder<'a, N: NameTable> {
    names: &'a N,
    use_pivot: bool,
}

impl<'a, N: NameTable> BoundsDecoder<'a, N> {
    /// Decoder in pivot mode (the default scene setting).
    pub fn new(names: &'a N) -> Self {
        Self { names, use_pivot: true }
    }

    /// When set, a node's position is its own pivot and `Position` is
    /// ignored. Otherwise position = parent pivot + `Position`.
    pub fn use_pivot(mut self, use_pivot: bool) -> Self {
        self.use_pivot = use_pivot;
        self
    }

    /// Decode a pack into one tree per root.
    pub fn decode(&self, pack: &BoundsPack) -> Result<Forest> {
        let entries = &pack.entries;
        let _span = tracing::info_span!("decode_bounds", entries = entries.len()).entered();

        let layout = Layout::scan(entries)?;

        let mut slots = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| self.decode_entry(i, entry, &layout, pack).map(Some))
            .collect::<Result<Vec<_>>>()?;

        let mut forest = Forest::with_capacity(layout.roots.len());
        let mut assembled = 0usize;
        for &root in &layout.roots {
            let entry = &entries[root];
            tracing::debug!(
                "root bound {} with {} children at {}",
                root, entry.num_children, entry.child_index
            );
            forest.push(assemble(root, &layout, &mut slots, &mut assembled, 1));
        }

        if assembled != entries.len() {
            let orphan = slots.iter().position(Option::is_some).unwrap_or(0);
            return Err(Error::malformed(
                orphan,
                "entry is not reachable from any root (child ranges form a cycle)",
            ));
        }

        Ok(forest)
    }

    /// Build a childless node for entry `index`.
    fn decode_entry(
        &self,
        index: usize,
        entry: &FlatRecord,
        layout: &Layout,
        pack: &BoundsPack,
    ) -> Result<BoundNode> {
        let parsed = parse_entry_flags(index, &entry.flags)?;
        if parsed.shape_ambiguous {
            tracing::warn!(
                "bound {} has no single shape marker ({:?}), treating it as a sphere",
                index, entry.flags
            );
        }

        let pivot = to_host_position(entry.pivot);
        let position = if self.use_pivot {
            pivot
        } else {
            match layout.parent_of[index] {
                Some(parent) => {
                    to_host_position(pack.entries[parent].pivot) + to_host_position(entry.position)
                }
                None => to_host_position(entry.position),
            }
        };

        let point_cloud = match entry.point_cloud_index() {
            None => None,
            Some(slot) => {
                let record = pack.point_clouds.get(slot).ok_or_else(|| {
                    Error::malformed(
                        index,
                        format!(
                            "PCloudIndex {} out of range ({} point clouds)",
                            slot,
                            pack.point_clouds.len()
                        ),
                    )
                })?;
                Some(PointCloud::from_record(record))
            }
        };

        Ok(BoundNode {
            orientation: to_host_orientation(entry.orientation),
            position,
            pivot,
            half_dimensions: to_host_position(entry.half_dimensions),
            flags: parsed.flags,
            shape: parsed.shape,
            surface: HashName::resolve(entry.surface, self.names),
            attribute_name: HashName::resolve(entry.attribute_name, self.names),
            bound_name: HashName::resolve(entry.name_hash, self.names),
            point_cloud,
            children: Vec::new(),
        })
    }
}

/// Decode `pack` with the given pivot mode.
pub fn decode(pack: &BoundsPack, use_pivot: bool, names: &impl NameTable) -> Result<Forest> {
    BoundsDecoder::new(names).use_pivot(use_pivot).decode(pack)
}

/// Parent/child index structure of a flat array.
#[derive(Debug)]
struct Layout {
    parent_of: Vec<Option<usize>>,
    children: Vec<Range<usize>>,
    roots: Vec<usize>,
}

impl Layout {
    fn scan(entries: &[FlatRecord]) -> Result<Self> {
        let len = entries.len();
        let mut parent_of: Vec<Option<usize>> = vec![None; len];
        let mut children = Vec::with_capacity(len);

        for (i, entry) in entries.iter().enumerate() {
            let range = child_range(i, entry, len)?;
            for child in range.clone() {
                if child == i {
                    return Err(Error::malformed(i, "entry lists itself as a child"));
                }
                if let Some(other) = parent_of[child] {
                    return Err(Error::malformed(
                        i,
                        format!("child {} is already claimed by entry {}", child, other),
                    ));
                }
                parent_of[child] = Some(i);
            }
            children.push(range);
        }

        let roots: Vec<usize> = (0..len).filter(|&i| parent_of[i].is_none()).collect();

        // Only reachable entries are visited, so a cycle cannot stall this.
        let mut pending: Vec<(usize, usize)> = roots.iter().map(|&root| (root, 1)).collect();
        while let Some((index, depth)) = pending.pop() {
            if depth > MAX_DEPTH {
                return Err(Error::malformed(
                    index,
                    format!("hierarchy deeper than {} levels", MAX_DEPTH),
                ));
            }
            pending.extend(children[index].clone().map(|child| (child, depth + 1)));
        }

        Ok(Self { parent_of, children, roots })
    }
}

/// `[ChildIndex, ChildIndex + NumChildren)`, empty for leaves regardless of `ChildIndex`.
fn child_range(index: usize, entry: &FlatRecord, len: usize) -> Result<Range<usize>> {
    if entry.num_children == 0 {
        return Ok(0..0);
    }
    let start = usize::try_from(entry.child_index).map_err(|_| {
        Error::malformed(
            index,
            format!("{} children but ChildIndex is {}", entry.num_children, entry.child_index),
        )
    })?;
    let end = start
        .checked_add(entry.num_children as usize)
        .filter(|&end| end <= len)
        .ok_or_else(|| {
            Error::malformed(
                index,
                format!(
                    "child range {}..{}+{} exceeds {} entries",
                    start, start, entry.num_children, len
                ),
            )
        })?;
    Ok(start..end)
}

fn assemble(
    index: usize,
    layout: &Layout,
    slots: &mut [Option<BoundNode>],
    assembled: &mut usize,
    depth: usize,
) -> BoundNode {
    // Each slot is taken exactly once: parents are unique and roots are unclaimed.
    let mut node = slots[index].take().unwrap_or_default();
    *assembled += 1;
    for child in layout.children[index].clone() {
        tracing::trace!("{} child bound {} of {}", "-".repeat(depth), child, index);
        node.children.push(assemble(child, layout, slots, assembled, depth + 1));
    }
    node
}
