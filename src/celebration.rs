use rand::seq::SliceRandom;
use rand::Rng;

/// Ticks a particle lives for
pub const PARTICLE_LIFE: u32 = 45;
pub const BURST_SIZE: usize = 100;
const GRAVITY: f64 = 0.06;

pub const MOTIVATIONS: [&str; 8] = [
    "YOU ARE A TYPING ROCKET!",
    "EXPLOSIVE PROGRESS!",
    "YOU SHINE BRIGHTER!",
    "BURNING UP THE KEYBOARD!",
    "LEVEL ROYALTY!",
    "LIGHTNING FAST FINGERS!",
    "PERFECT PRECISION!",
    "CHAMPION IN THE MAKING!",
];

pub fn random_motivation() -> &'static str {
    MOTIVATIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MOTIVATIONS[0])
}

/// A single spark in a burst
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub life: u32,
}

impl Particle {
    fn new<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            // cells are roughly twice as tall as they are wide
            vel_x: rng.gen_range(-1.6..1.6),
            vel_y: rng.gen_range(-1.0..-0.2),
            symbol: *['*', '+', '.', 'o', '✦', '✧', '•']
                .choose(rng)
                .unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            life: PARTICLE_LIFE,
        }
    }

    /// Advance one tick. Returns false once the particle has burnt out.
    fn update(&mut self) -> bool {
        self.x += self.vel_x;
        self.y += self.vel_y;
        self.vel_y += GRAVITY;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// Remaining brightness in (0, 1]
    pub fn alpha(&self) -> f64 {
        self.life as f64 / PARTICLE_LIFE as f64
    }
}

/// Particle bursts drawn over the playing screen
#[derive(Debug, Default)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub width: f64,
    pub height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Spray a burst from the middle of a `width` x `height` area
    pub fn burst(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        self.width = width as f64;
        self.height = height as f64;
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        self.particles
            .extend((0..BURST_SIZE).map(|_| Particle::new(cx, cy, &mut rng)));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn update(&mut self) {
        let margin = 2.0;
        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update();
            let off_screen = p.y > height + margin || p.x < -margin || p.x > width + margin;
            alive && !off_screen
        });
    }
}
