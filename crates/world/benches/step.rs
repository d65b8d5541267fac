use criterion::{criterion_group, criterion_main, Criterion};
use rl::{AgentConfig, DqnAgent};
use world::{OrbitWorld, WorldConfig};

fn bench_world_step(c: &mut Criterion) {
    let config = WorldConfig {
        body_count: 100,
        seed: Some(0),
        ..WorldConfig::default()
    };
    c.bench_function("world_step_100_bodies", |b| {
        let agent = DqnAgent::new(&config.agent, 0).unwrap();
        let mut world = OrbitWorld::new(&config, agent).unwrap();
        b.iter(|| world.step(1.0 / 60.0));
    });
    c.bench_function("world_step_100_bodies_background", |b| {
        let config = WorldConfig {
            learning_mode: world::LearningMode::Background,
            ..config.clone()
        };
        let agent = DqnAgent::new(&AgentConfig::default(), 0).unwrap();
        let mut world = OrbitWorld::new(&config, agent).unwrap();
        b.iter(|| world.step(1.0 / 60.0));
    });
}

criterion_group!(benches, bench_world_step);
criterion_main!(benches);
