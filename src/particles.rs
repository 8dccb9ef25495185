use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::STAR_LIGHTNESS;
use crate::surface::{Paint, RenderSurface};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn of(surface: &dyn RenderSurface) -> Self {
        Self { width: surface.width(), height: surface.height() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub hue: f32,
    pub saturation: f32,
    pub opacity: f32,
}

/// A fixed set of stars. Positions are never changed after creation.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn initialize<R: Rng>(
        rng: &mut R,
        bounds: Bounds,
        count: usize,
        palette: &[f32],
        max_radius: f32,
    ) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.random::<f32>() * bounds.width,
                y: rng.random::<f32>() * bounds.height,
                radius: rng.random::<f32>() * max_radius,
                hue: if palette.is_empty() {
                    0.0
                } else {
                    palette[rng.random_range(0..palette.len())]
                },
                saturation: 50.0 + rng.random::<f32>() * 50.0,
                opacity: rng.random::<f32>(),
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Each particle independently gets a fresh opacity with probability `chance`.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, chance: f64) {
        if chance.is_nan() || chance <= 0.0 {
            return;
        }
        let chance = chance.min(1.0);
        for p in &mut self.particles {
            if rng.random_bool(chance) {
                p.opacity = rng.random::<f32>();
            }
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        for p in &self.particles {
            surface.set_paint(Paint::hsla(p.hue, p.saturation, STAR_LIGHTNESS, p.opacity));
            surface.fill_circle(p.x, p.y, p.radius);
        }
    }
}

/// Seeded rng for one engine; `salt` keeps engines sharing a seed apart.
pub fn engine_rng(seed: Option<u64>, salt: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(salt)),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};

    fn field(count: usize) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(7);
        ParticleField::initialize(
            &mut rng,
            Bounds { width: 320.0, height: 200.0 },
            count,
            &[0.0, 60.0, 240.0],
            1.2,
        )
    }

    #[test]
    fn particles_start_inside_their_ranges() {
        let f = field(400);
        assert_eq!(f.len(), 400);
        for p in f.particles() {
            assert!((0.0..320.0).contains(&p.x));
            assert!((0.0..200.0).contains(&p.y));
            assert!((0.0..=1.2).contains(&p.radius));
            assert!([0.0, 60.0, 240.0].contains(&p.hue));
            assert!((50.0..100.0).contains(&p.saturation));
            assert!((0.0..=1.0).contains(&p.opacity));
        }
    }

    #[test]
    fn zero_chance_never_twinkles() {
        let mut f = field(50);
        let before = f.particles().to_vec();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            f.tick(&mut rng, 0.0);
        }
        assert_eq!(f.particles(), &before[..]);
    }

    #[test]
    fn full_chance_only_touches_opacity() {
        let mut f = field(50);
        let before = f.particles().to_vec();
        let mut rng = StdRng::seed_from_u64(2);
        f.tick(&mut rng, 1.0);
        let mut changed = 0;
        for (a, b) in before.iter().zip(f.particles()) {
            assert_eq!((a.x, a.y, a.radius, a.hue, a.saturation), (b.x, b.y, b.radius, b.hue, b.saturation));
            if a.opacity != b.opacity {
                changed += 1;
            }
        }
        assert!(changed > 40);
    }

    #[test]
    fn render_draws_one_disc_per_particle_without_mutation() {
        let f = field(20);
        let before = f.particles().to_vec();
        let mut surface = DrawList::new(320.0, 200.0);
        f.render(&mut surface);
        let discs = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count();
        assert_eq!(discs, 20);
        assert_eq!(f.particles(), &before[..]);
    }

    #[test]
    fn same_seed_same_field() {
        let a = field(10);
        let b = field(10);
        assert_eq!(a.particles(), b.particles());
    }
}
