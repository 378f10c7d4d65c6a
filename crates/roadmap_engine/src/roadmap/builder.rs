//! Retraction roadmap construction
//!
//! Random samples in the free space are pushed away from their nearest
//! obstacle until they sit between two obstacles. The resulting vertices lie
//! close to the medial axis of the free space; vertices within reach of each
//! other are linked when the straight path between them is free.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ShapeResult;
use crate::foundation::collections::ShapeId;
use crate::foundation::logging::{debug, info};
use crate::foundation::math::{Real, Vec2};
use crate::world::ShapeWorld;

use super::closest_point::ClosestPointFinder;
use super::config::RoadmapConfig;

/// Roadmap vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadmapVertex {
    /// Position in world space
    pub position: Vec2,
    /// Distance to the nearest obstacle
    pub clearance: Real,
}

/// Graph of free-space vertices and the collision-free links between them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    vertices: Vec<RoadmapVertex>,
    edges: Vec<(usize, usize)>,
}

impl Roadmap {
    /// All vertices
    pub fn vertices(&self) -> &[RoadmapVertex] {
        &self.vertices
    }

    /// All edges as pairs of vertex indices, smaller index first
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Check whether the roadmap has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Indices of the vertices linked to vertex `index`
    pub fn neighbours(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().filter_map(move |&(a, b)| {
            if a == index {
                Some(b)
            } else if b == index {
                Some(a)
            } else {
                None
            }
        })
    }
}

/// Builds a [`Roadmap`] from an obstacle field
#[derive(Debug, Clone, Default)]
pub struct RoadmapBuilder {
    config: RoadmapConfig,
}

impl RoadmapBuilder {
    /// Create a builder with the given settings
    pub fn new(config: RoadmapConfig) -> Self {
        Self { config }
    }

    /// Settings used by the builder
    pub fn config(&self) -> &RoadmapConfig {
        &self.config
    }

    /// Sample, retract and link vertices around `obstacles`
    pub fn build(&self, world: &mut ShapeWorld, obstacles: ShapeId) -> ShapeResult<Roadmap> {
        let config = &self.config;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut finder = ClosestPointFinder::with_config(world, obstacles, config)?;
        let bounds = finder.bounds();

        let mut roadmap = Roadmap::default();
        let mut rejected = 0;
        for _ in 0..config.samples {
            let sample = Vec2::new(
                rng.gen_range(bounds.min.x..=bounds.max.x),
                rng.gen_range(bounds.min.y..=bounds.max.y),
            );
            if finder.inside_obstacle(&sample)? {
                rejected += 1;
                continue;
            }
            let Some(position) = finder.retract_sample(&sample) else {
                rejected += 1;
                continue;
            };
            if !bounds.contains_point(&position) {
                rejected += 1;
                continue;
            }
            let duplicate = roadmap
                .vertices
                .iter()
                .any(|v| (v.position - position).norm() < config.merge_distance);
            if duplicate {
                continue;
            }

            let clearance = finder
                .nearest_obstacle(&position)
                .map_or(0.0, |contact| (contact - position).norm());
            roadmap.vertices.push(RoadmapVertex { position, clearance });
        }
        debug!("Retracted {} vertices, rejected {} samples", roadmap.len(), rejected);

        for i in 0..roadmap.vertices.len() {
            for j in (i + 1)..roadmap.vertices.len() {
                let a = roadmap.vertices[i].position;
                let b = roadmap.vertices[j].position;
                if (b - a).norm() > config.connect_radius {
                    continue;
                }
                if !finder.segment_blocked(&a, &b)? {
                    roadmap.edges.push((i, j));
                }
            }
        }

        info!(
            "Built roadmap with {} vertices and {} edges from {} samples",
            roadmap.vertices.len(),
            roadmap.edges.len(),
            config.samples
        );
        Ok(roadmap)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::foundation::logging;
    use crate::geometry::Rect;
    use crate::shapes::Group;

    fn corridor(world: &mut ShapeWorld) -> ShapeId {
        let group = world.create(Group::new()).unwrap();
        for wall in [
            Rect::from_bounds(-20.0, -10.0, 20.0, -2.0),
            Rect::from_bounds(-20.0, 2.0, 20.0, 10.0),
        ] {
            let id = world.create(wall).unwrap();
            world.add_kid(group, id).unwrap();
            world.release(id).unwrap();
        }
        group
    }

    fn config() -> RoadmapConfig {
        RoadmapConfig {
            samples: 40,
            seed: Some(11),
            bounds: Rect::from_bounds(-20.0, -10.0, 20.0, 10.0),
            connect_radius: 12.0,
            ..RoadmapConfig::default()
        }
    }

    #[test]
    fn test_corridor_vertices_lie_on_centre_line() {
        logging::init_for_tests();
        let mut world = ShapeWorld::new();
        let obstacles = corridor(&mut world);
        let shapes_before = world.len();

        let roadmap = RoadmapBuilder::new(config()).build(&mut world, obstacles).unwrap();
        assert!(!roadmap.is_empty());
        for vertex in roadmap.vertices() {
            assert_abs_diff_eq!(vertex.position.y, 0.0, epsilon = 0.05);
            assert_abs_diff_eq!(vertex.clearance, 2.0, epsilon = 0.05);
        }
        assert_eq!(world.len(), shapes_before);
    }

    #[test]
    fn test_vertices_are_merged_and_linked() {
        let mut world = ShapeWorld::new();
        let obstacles = corridor(&mut world);
        let builder = RoadmapBuilder::new(config());
        let roadmap = builder.build(&mut world, obstacles).unwrap();

        let vertices = roadmap.vertices();
        for (i, a) in vertices.iter().enumerate() {
            for b in &vertices[i + 1..] {
                assert!((a.position - b.position).norm() >= builder.config().merge_distance);
            }
        }
        for &(a, b) in roadmap.edges() {
            assert!(a < b);
            let length = (vertices[a].position - vertices[b].position).norm();
            assert!(length <= builder.config().connect_radius);
            assert!(roadmap.neighbours(a).any(|n| n == b));
            assert!(roadmap.neighbours(b).any(|n| n == a));
        }
    }

    #[test]
    fn test_seeded_builds_are_reproducible() {
        let mut world = ShapeWorld::new();
        let obstacles = corridor(&mut world);
        let builder = RoadmapBuilder::new(config());
        let first = builder.build(&mut world, obstacles).unwrap();
        let second = builder.build(&mut world, obstacles).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let mut world = ShapeWorld::new();
        let obstacles = corridor(&mut world);
        let builder = RoadmapBuilder::new(RoadmapConfig { accuracy: -1.0, ..config() });
        assert!(matches!(
            builder.build(&mut world, obstacles),
            Err(crate::error::ShapeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_wall_blocks_links() {
        let mut world = ShapeWorld::new();
        let obstacles = world.create(Group::new()).unwrap();
        let wall = world.create(Rect::from_bounds(-0.5, -10.0, 0.5, 10.0)).unwrap();
        world.add_kid(obstacles, wall).unwrap();

        let roadmap = RoadmapBuilder::new(RoadmapConfig {
            samples: 30,
            seed: Some(5),
            bounds: Rect::from_bounds(-10.0, -10.0, 10.0, 10.0),
            connect_radius: 30.0,
            ..RoadmapConfig::default()
        })
        .build(&mut world, obstacles)
        .unwrap();

        let vertices = roadmap.vertices();
        for &(a, b) in roadmap.edges() {
            let (pa, pb) = (vertices[a].position, vertices[b].position);
            assert_eq!(pa.x < 0.0, pb.x < 0.0, "edge crosses the wall: {pa:?} {pb:?}");
        }
    }
}
