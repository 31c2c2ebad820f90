//! Octree spatial index.
//!
//! Each node covers an axis-aligned region and is split into eight equal
//! octants while it holds more than a few objects. An object is stored in
//! every leaf its bounding box overlaps, so a query may reach the same
//! object through several leaves; results are deduplicated.

use crate::error::{SceneError, SceneResult};
use crate::object::SceneObject;
use prism_math::{Aabb, Interval, Ray};
use serde::{Deserialize, Serialize};

/// Subdivision limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Deepest level a node may be split to (the root is level 0)
    pub max_depth: usize,
    /// A node is split only while it holds more than this many objects
    pub leaf_threshold: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            leaf_threshold: 4,
        }
    }
}

/// Octree node - either a branch with up to eight children or a leaf
/// holding object ids.
#[derive(Debug)]
enum OctreeNode {
    /// Internal node. Only non-empty octants are kept.
    Branch { bbox: Aabb, children: Vec<OctreeNode> },
    /// Leaf node with indices into [`Octree::objects`].
    Leaf { bbox: Aabb, objects: Vec<usize> },
}

/// Counters collected while building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OctreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    /// Total object references over all leaves
    pub references: usize,
}

/// Static octree over the scene objects. Owns the objects.
#[derive(Debug)]
pub struct Octree {
    objects: Vec<SceneObject>,
    root: OctreeNode,
    stats: OctreeStats,
}

impl Octree {
    /// Build an octree over `objects` inside the region `bounds`.
    ///
    /// Fails if there are no objects or `bounds` is not a finite box with
    /// positive extent. If some object reaches outside `bounds`, the root is
    /// grown to enclose it.
    pub fn build(bounds: Aabb, objects: Vec<SceneObject>, config: OctreeConfig) -> SceneResult<Self> {
        if objects.is_empty() {
            return Err(SceneError::EmptyScene);
        }
        if !bounds.is_valid() {
            return Err(SceneError::DegenerateBounds {
                min: bounds.min().to_array(),
                max: bounds.max().to_array(),
            });
        }

        let enclosing = objects
            .iter()
            .fold(bounds, |acc, o| Aabb::surrounding(&acc, &o.bbox()));
        let root_bounds = if bounds.contains_box(&enclosing) {
            bounds
        } else {
            log::warn!(
                "Objects extend past the octree bounds; growing root from {:?}..{:?} to {:?}..{:?}",
                bounds.min(),
                bounds.max(),
                enclosing.min(),
                enclosing.max()
            );
            enclosing
        };

        let ids: Vec<usize> = (0..objects.len()).collect();
        let mut stats = OctreeStats::default();
        let root = Self::build_node(&objects, root_bounds, ids, 0, &config, &mut stats);

        log::debug!(
            "Octree built: {} objects, {} nodes, {} leaves, depth {}, {} references",
            objects.len(),
            stats.nodes,
            stats.leaves,
            stats.depth,
            stats.references
        );

        Ok(Self {
            objects,
            root,
            stats,
        })
    }

    /// Recursive construction.
    ///
    /// A node stays a leaf when it is small enough, at the depth limit, or
    /// when splitting would not shrink any octant's object list.
    fn build_node(
        objects: &[SceneObject],
        bbox: Aabb,
        ids: Vec<usize>,
        depth: usize,
        config: &OctreeConfig,
        stats: &mut OctreeStats,
    ) -> OctreeNode {
        stats.nodes += 1;
        stats.depth = stats.depth.max(depth);

        if ids.len() > config.leaf_threshold && depth < config.max_depth {
            let octants: Vec<(Aabb, Vec<usize>)> = (0..8)
                .map(|i| {
                    let child_box = bbox.octant(i);
                    let child_ids = ids
                        .iter()
                        .copied()
                        .filter(|&id| objects[id].bbox().overlaps(&child_box))
                        .collect();
                    (child_box, child_ids)
                })
                .collect();

            if octants.iter().any(|(_, child)| child.len() < ids.len()) {
                let children = octants
                    .into_iter()
                    .filter(|(_, child)| !child.is_empty())
                    .map(|(child_box, child)| {
                        Self::build_node(objects, child_box, child, depth + 1, config, stats)
                    })
                    .collect();
                return OctreeNode::Branch { bbox, children };
            }
        }

        stats.leaves += 1;
        stats.references += ids.len();
        OctreeNode::Leaf { bbox, objects: ids }
    }

    /// Ids of the objects whose leaves the ray passes through, sorted and
    /// without duplicates.
    pub fn candidate_ids(&self, ray: &Ray) -> Vec<usize> {
        let mut ids = Vec::new();
        if !ray.is_degenerate() {
            Self::collect(&self.root, ray, &mut ids);
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn collect(node: &OctreeNode, ray: &Ray, out: &mut Vec<usize>) {
        let ray_t = Interval::new(0.0, f64::INFINITY);
        match node {
            OctreeNode::Leaf { bbox, objects } => {
                if bbox.hit(ray, ray_t) {
                    out.extend_from_slice(objects);
                }
            }
            OctreeNode::Branch { bbox, children } => {
                if bbox.hit(ray, ray_t) {
                    for child in children {
                        Self::collect(child, ray, out);
                    }
                }
            }
        }
    }

    /// Objects the ray could plausibly hit, each reported once.
    pub fn intersect(&self, ray: &Ray) -> Vec<&SceneObject> {
        self.candidate_ids(ray)
            .into_iter()
            .map(|id| &self.objects[id])
            .collect()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: usize) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Region covered by the root node.
    pub fn bounds(&self) -> Aabb {
        match &self.root {
            OctreeNode::Branch { bbox, .. } | OctreeNode::Leaf { bbox, .. } => *bbox,
        }
    }

    pub fn stats(&self) -> OctreeStats {
        self.stats
    }
}
