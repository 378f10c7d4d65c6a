//! Roadmap demo application
//!
//! Builds a small obstacle course, runs a few simulation frames over it and
//! computes a retraction roadmap through the free space.
//!
//! Usage: `roadmap_demo [config.toml|config.ron]`
//!        `roadmap_demo --save-default <path>`

use roadmap_engine::prelude::*;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("usage: roadmap_demo [config] | roadmap_demo --save-default <path>")]
    Usage,
}

struct RoadmapDemo {
    world: ShapeWorld,
    obstacles: ShapeId,
    movers: ShapeId,
    config: RoadmapConfig,
}

impl RoadmapDemo {
    fn new(config: RoadmapConfig) -> Result<Self, DemoError> {
        let mut world = ShapeWorld::new();
        let obstacles = world.create(Group::new())?;
        world.set_name(obstacles, "obstacles")?;

        let b = config.bounds;
        let (w, h) = (b.width(), b.height());
        let walls = [
            Rect::from_bounds(b.min.x, b.min.y, b.max.x, b.min.y + h * 0.1),
            Rect::from_bounds(b.min.x, b.max.y - h * 0.1, b.max.x, b.max.y),
            Rect::from_bounds(b.min.x + w * 0.3, b.min.y, b.min.x + w * 0.35, b.min.y + h * 0.6),
            Rect::from_bounds(b.min.x + w * 0.65, b.min.y + h * 0.4, b.min.x + w * 0.7, b.max.y),
        ];
        for (i, wall) in walls.into_iter().enumerate() {
            let id = world.create(wall)?;
            world.set_name(id, format!("wall {i}"))?;
            world.add_kid(obstacles, id)?;
            world.release(id)?;
        }
        let pillar = world.create(Circle::new(b.center(), w.min(h) * 0.08))?;
        world.set_name(pillar, "pillar")?;
        world.add_kid(obstacles, pillar)?;
        world.release(pillar)?;

        let movers = world.create(Group::new())?;
        world.set_name(movers, "movers")?;
        for (i, heading) in [0.0, 120.0, 240.0].into_iter().enumerate() {
            let start = b.center() + rotate(heading, w.min(h) * 0.25);
            let model = vec![Vec2::new(-1.0, -0.5), Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.5)];
            let sprite = world.create(Sprite::new(model, MotionState::heading(start, heading, 2.0)))?;
            world.set_name(sprite, format!("mover {i}"))?;
            world.set_depth(sprite, i32::try_from(i).unwrap_or_default())?;
            world.set_plan_action(sprite, |id: ShapeId, shape: &mut ShapeKind, _t: Real, _dt: Real| {
                if let Some(sprite) = shape.as_sprite_mut() {
                    sprite.rotate_by(15.0);
                    log::debug!("{:?} turned to {:.1} degrees", id, sprite.rotation());
                }
            })?;
            world.add_kid(movers, sprite)?;
            world.release(sprite)?;
        }

        Ok(Self { world, obstacles, movers, config })
    }

    fn simulate(&mut self, frames: usize, dt: Real) -> Result<(), DemoError> {
        let mut recorder = DrawRecorder::new();
        for frame in 0..frames {
            let t = frame as Real * dt;
            self.world.update(self.movers, t, dt)?;
            self.world.do_planning(self.movers, t, dt)?;

            let mut hits = 0;
            let mut count = |_: ShapeId, _: ShapeId, _: &[Vec2], _: Real, _: Real| hits += 1;
            self.world.collide(self.movers, self.obstacles, t, dt, Some(&mut count))?;

            recorder.clear();
            self.world.draw(self.obstacles, &self.config.bounds, &mut recorder)?;
            self.world.draw(self.movers, &self.config.bounds, &mut recorder)?;
            log::info!("Frame {}: {} contacts, {} draw calls", frame, hits, recorder.commands().len());
        }
        Ok(())
    }

    fn build_roadmap(&mut self) -> Result<Roadmap, DemoError> {
        let roadmap = RoadmapBuilder::new(self.config.clone()).build(&mut self.world, self.obstacles)?;
        for (i, vertex) in roadmap.vertices().iter().enumerate() {
            log::info!(
                "Vertex {:3} at ({:7.2}, {:7.2}) clearance {:5.2}, {} neighbours",
                i,
                vertex.position.x,
                vertex.position.y,
                vertex.clearance,
                roadmap.neighbours(i).count()
            );
        }
        Ok(roadmap)
    }
}

fn rotate(degrees: Real, length: Real) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin()) * length
}

fn load_config(args: &[String]) -> Result<Option<RoadmapConfig>, DemoError> {
    match args {
        [] => Ok(Some(RoadmapConfig { seed: Some(42), ..RoadmapConfig::default() })),
        [path] => {
            log::info!("Loading configuration from {}", path);
            Ok(Some(RoadmapConfig::load_from_file(path)?))
        }
        [flag, path] if flag == "--save-default" => {
            RoadmapConfig::default().save_to_file(path)?;
            log::info!("Wrote default configuration to {}", path);
            Ok(None)
        }
        _ => Err(DemoError::Usage),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting roadmap demo");
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = load_config(&args)? else {
        return Ok(());
    };

    let mut demo = RoadmapDemo::new(config)?;
    demo.simulate(5, 0.1)?;
    let roadmap = demo.build_roadmap()?;
    log::info!(
        "Roadmap complete: {} vertices, {} edges, {} shapes alive",
        roadmap.len(),
        roadmap.edges().len(),
        demo.world.len()
    );
    Ok(())
}
