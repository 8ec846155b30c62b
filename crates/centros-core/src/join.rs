// crates/centros-core/src/join.rs

//! # Spatial Joiner
//!
//! Assigns every school with a valid coordinate to the canton polygon that
//! contains it.
//!
//! 1. Candidate cantons come from an R-tree over polygon bounding boxes.
//! 2. Each candidate is classified exactly (`Inside` / `OnBoundary` /
//!    `Outside`). Polygons are closed: a point on an edge matches.
//! 3. Zero matches → [`Assignment::Unassigned`]. One match → that canton.
//!    Several matches (shared edge, shared vertex or overlapping polygons)
//!    → the canton with the lexicographically smallest normalized key.
//!
//! Every unassigned and ambiguous point is recorded in [`SpatialJoin::report`].
//! The join is a pure function of the snapshot; a new canton set means a
//! new [`SpatialJoin`], never a patched one.

use crate::model::{Canton, CantonId, Snapshot};
use crate::report::{DataWarning, LoadReport};
use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Coord, Point};
use rstar::{RTree, RTreeObject, AABB};
use serde::Serialize;
use std::collections::HashMap;

/// Where a school ended up after the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "canton", rename_all = "snake_case")]
pub enum Assignment {
    Canton(CantonId),
    /// Valid coordinate, but inside no canton polygon.
    Unassigned,
    /// Coordinate missing or out of bounds; never tested.
    InvalidCoordinate,
}

impl Assignment {
    pub fn canton(self) -> Option<CantonId> {
        match self {
            Assignment::Canton(id) => Some(id),
            _ => None,
        }
    }
}

/// Outcome of locating a single point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointMatch {
    None,
    Single(CantonId),
    Ambiguous {
        candidates: Vec<CantonId>,
        chosen: CantonId,
        on_boundary: bool,
    },
}

impl PointMatch {
    pub fn canton(&self) -> Option<CantonId> {
        match self {
            PointMatch::None => None,
            PointMatch::Single(id) => Some(*id),
            PointMatch::Ambiguous { chosen, .. } => Some(*chosen),
        }
    }
}

/// Bounding box entry in the R-tree.
struct CantonEnvelope {
    id: CantonId,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for CantonEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Point-in-canton index built once per canton set.
pub struct CantonLocator<'a> {
    cantons: &'a [Canton],
    tree: RTree<CantonEnvelope>,
}

impl<'a> CantonLocator<'a> {
    pub fn new(cantons: &'a [Canton]) -> Self {
        let entries = cantons
            .iter()
            .map(|c| CantonEnvelope {
                id: c.id,
                envelope: AABB::from_corners(
                    [c.bbox.min().x, c.bbox.min().y],
                    [c.bbox.max().x, c.bbox.max().y],
                ),
            })
            .collect();
        Self {
            cantons,
            tree: RTree::bulk_load(entries),
        }
    }

    /// Locate a point given as (x = longitude, y = latitude).
    pub fn locate(&self, point: Point<f64>) -> PointMatch {
        let coord: Coord<f64> = point.into();
        let envelope = AABB::from_point([coord.x, coord.y]);

        let mut hits: Vec<(CantonId, CoordPos)> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|entry| {
                let canton = &self.cantons[entry.id.index()];
                match canton.geometry.coordinate_position(&coord) {
                    CoordPos::Outside => None,
                    pos => Some((entry.id, pos)),
                }
            })
            .collect();

        match hits.len() {
            0 => PointMatch::None,
            1 => PointMatch::Single(hits[0].0),
            _ => {
                hits.sort_by(|a, b| {
                    self.cantons[a.0.index()]
                        .key
                        .cmp(&self.cantons[b.0.index()].key)
                });
                let on_boundary = hits.iter().any(|(_, pos)| *pos == CoordPos::OnBoundary);
                let candidates: Vec<CantonId> = hits.iter().map(|(id, _)| *id).collect();
                PointMatch::Ambiguous {
                    chosen: candidates[0],
                    candidates,
                    on_boundary,
                }
            }
        }
    }

    pub fn locate_lat_lon(&self, latitude: f64, longitude: f64) -> PointMatch {
        self.locate(Point::new(longitude, latitude))
    }
}

/// School → canton mapping for one snapshot.
#[derive(Debug, Clone)]
pub struct SpatialJoin {
    /// Parallel to `Snapshot::schools`.
    assignments: Vec<Assignment>,
    by_code: HashMap<String, usize>,
    pub report: LoadReport,
}

impl SpatialJoin {
    /// Run the join over every school in the snapshot.
    pub fn compute(snapshot: &Snapshot) -> Self {
        let locator = CantonLocator::new(&snapshot.cantons);
        let mut report = LoadReport::default();
        let mut assignments = Vec::with_capacity(snapshot.schools.len());
        let mut by_code = HashMap::with_capacity(snapshot.schools.len());

        for (i, school) in snapshot.schools.iter().enumerate() {
            by_code.insert(school.code.clone(), i);

            let Some(point) = school.point() else {
                assignments.push(Assignment::InvalidCoordinate);
                continue;
            };

            let assignment = match locator.locate(point) {
                PointMatch::None => {
                    report.push(DataWarning::Unassigned {
                        code: school.code.clone(),
                    });
                    Assignment::Unassigned
                }
                PointMatch::Single(id) => Assignment::Canton(id),
                PointMatch::Ambiguous {
                    candidates,
                    chosen,
                    on_boundary,
                } => {
                    report.push(DataWarning::AmbiguousMatch {
                        code: school.code.clone(),
                        candidates: candidates
                            .iter()
                            .map(|id| snapshot.canton(*id).key.clone())
                            .collect(),
                        chosen: snapshot.canton(chosen).key.clone(),
                        on_boundary,
                    });
                    Assignment::Canton(chosen)
                }
            };
            assignments.push(assignment);
        }

        let join = Self {
            assignments,
            by_code,
            report,
        };
        tracing::info!(
            assigned = join.assigned_count(),
            unassigned = join.unassigned_count(),
            invalid_coordinate = join.invalid_count(),
            "spatial join complete"
        );
        join.report.log_summary("join");
        join
    }

    /// Assignment for the school at `index` in `Snapshot::schools`.
    pub fn assignment(&self, index: usize) -> Assignment {
        self.assignments
            .get(index)
            .copied()
            .unwrap_or(Assignment::InvalidCoordinate)
    }

    /// Assignment by `CODSABER`.
    pub fn get(&self, code: &str) -> Option<Assignment> {
        self.by_code
            .get(code.trim())
            .map(|&i| self.assignments[i])
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| matches!(a, Assignment::Canton(_)))
            .count()
    }

    pub fn unassigned_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| matches!(a, Assignment::Unassigned))
            .count()
    }

    pub fn invalid_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| matches!(a, Assignment::InvalidCoordinate))
            .count()
    }
}
