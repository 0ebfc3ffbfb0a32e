//! Uniform-grid spatial index keyed by `(cell, entity-kind)`. Cells are
//! integer divisions of position by a fixed cell size; `nearby` scans a
//! bounded box of cells and filters by distance. Rebuilt every step;
//! query results are only valid for the step that produced them.
//!
//! Deliberately not an R-tree: the determinism contract requires
//! deterministic cell and bucket enumeration order, which this crate
//! gets for free from `BTreeMap` + sorted buckets, and which a balanced
//! tree's internal rebalancing does not naturally expose.

use std::collections::BTreeMap;

use crate::entity::{Entity, EntityId, EntityKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CellKey {
    cx: i64,
    cy: i64,
    kind: EntityKind,
}

#[derive(Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    buckets: BTreeMap<CellKey, Vec<(EntityId, f64, f64)>>,
}

impl SpatialIndex {
    pub fn build(entities: &[Entity], cell_size: f64) -> Self {
        let mut buckets: BTreeMap<CellKey, Vec<(EntityId, f64, f64)>> = BTreeMap::new();
        for entity in entities {
            let loc = entity.locomotion();
            let key = CellKey {
                cx: (loc.x / cell_size).floor() as i64,
                cy: (loc.y / cell_size).floor() as i64,
                kind: entity.kind(),
            };
            buckets.entry(key).or_default().push((loc.id, loc.x, loc.y));
        }
        for bucket in buckets.values_mut() {
            bucket.sort_unstable_by_key(|(id, _, _)| *id);
        }
        Self { cell_size, buckets }
    }

    /// Entities of `kind` within `radius` of `(x, y)`, sorted by stable
    /// ID. Scans the bounded box of cells the query radius can touch,
    /// then filters by exact Euclidean distance.
    pub fn nearby(&self, x: f64, y: f64, radius: f64, kind: EntityKind) -> Vec<(EntityId, f64)> {
        let r_sq = radius * radius;
        let cx_min = ((x - radius) / self.cell_size).floor() as i64;
        let cx_max = ((x + radius) / self.cell_size).floor() as i64;
        let cy_min = ((y - radius) / self.cell_size).floor() as i64;
        let cy_max = ((y + radius) / self.cell_size).floor() as i64;

        let mut out = Vec::new();
        for cx in cx_min..=cx_max {
            for cy in cy_min..=cy_max {
                let key = CellKey { cx, cy, kind };
                if let Some(bucket) = self.buckets.get(&key) {
                    for &(id, ex, ey) in bucket {
                        let dx = ex - x;
                        let dy = ey - y;
                        let dist_sq = dx * dx + dy * dy;
                        if dist_sq <= r_sq {
                            out.push((id, dist_sq.sqrt()));
                        }
                    }
                }
            }
        }
        out.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn nearest(&self, x: f64, y: f64, radius: f64, kind: EntityKind) -> Option<(EntityId, f64)> {
        self.nearby(x, y, radius, kind)
            .into_iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Castle, Entity};

    fn castle_at(id: EntityId, x: f64, y: f64) -> Entity {
        Entity::Castle(Box::new(Castle::new(id, x, y)))
    }

    #[test]
    fn finds_entities_within_radius() {
        let entities = vec![castle_at(1, 100.0, 100.0), castle_at(2, 500.0, 500.0)];
        let index = SpatialIndex::build(&entities, 64.0);
        let nearby = index.nearby(100.0, 100.0, 10.0, EntityKind::Castle);
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].0, 1);
    }

    #[test]
    fn excludes_entities_outside_radius_even_in_same_cell_box() {
        let entities = vec![castle_at(1, 100.0, 100.0), castle_at(2, 140.0, 100.0)];
        let index = SpatialIndex::build(&entities, 64.0);
        let nearby = index.nearby(100.0, 100.0, 20.0, EntityKind::Castle);
        assert_eq!(nearby.len(), 1);
    }

    #[test]
    fn query_result_matches_brute_force_distance_check() {
        let entities: Vec<Entity> = (0..30)
            .map(|i| castle_at(i, (i * 17 % 400) as f64, (i * 23 % 400) as f64))
            .collect();
        let index = SpatialIndex::build(&entities, 50.0);
        let center = (200.0, 200.0);
        let radius = 120.0;
        let found = index.nearby(center.0, center.1, radius, EntityKind::Castle);
        for entity in &entities {
            let loc = entity.locomotion();
            let dist = (loc.x - center.0).hypot(loc.y - center.1);
            let is_found = found.iter().any(|(id, _)| *id == loc.id);
            assert_eq!(dist <= radius, is_found, "entity {} at distance {dist}", loc.id);
        }
    }
}
