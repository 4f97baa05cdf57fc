/// Heritable traits, copied parent -> child with mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Genes {
    /// World units per second at unit intent.
    pub move_speed: f32,
    /// How far plants can be sensed. Non-positive means unlimited.
    pub vision_range: f32,
    /// Energy needed before this zoop will split.
    pub repro_threshold: f32,
}

impl Genes {
    pub fn new(move_speed: f32, vision_range: f32, repro_threshold: f32) -> Self {
        Self {
            move_speed,
            vision_range,
            repro_threshold,
        }
    }

    /// Independent multiplicative jitter per gene, `v * (1 + u)` with `u` uniform in
    /// `[-sigma_fraction, sigma_fraction]`, re-clamped to `bounds`.
    ///
    /// A non-positive `sigma_fraction` returns the genes untouched and draws nothing from `rng`.
    pub fn mutated(&self, sigma_fraction: f32, bounds: &GeneBounds, rng: &mut fastrand::Rng) -> Self {
        if sigma_fraction <= 0.0 {
            return *self;
        }

        let move_speed = mutate_scalar(self.move_speed, sigma_fraction, rng);
        let vision_range = mutate_scalar(self.vision_range, sigma_fraction, rng);
        let repro_threshold = mutate_scalar(self.repro_threshold, sigma_fraction, rng);

        bounds.clamp(Self {
            move_speed,
            vision_range,
            repro_threshold,
        })
    }
}

fn mutate_scalar(value: f32, sigma_fraction: f32, rng: &mut fastrand::Rng) -> f32 {
    let delta = (rng.f32() * 2.0 - 1.0) * sigma_fraction;
    value * (1.0 + delta)
}

/// Inclusive range a single gene is kept within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneRange {
    pub min: f32,
    pub max: f32,
}

impl GeneRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        crate::world::clamp_between(value, self.min, self.max)
    }

    /// Position of `value` inside the range as `[0, 1]`; 0 for a degenerate range.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneBounds {
    pub move_speed: GeneRange,
    pub vision_range: GeneRange,
    pub repro_threshold: GeneRange,
}

impl GeneBounds {
    pub fn clamp(&self, genes: Genes) -> Genes {
        Genes {
            move_speed: self.move_speed.clamp(genes.move_speed),
            vision_range: self.vision_range.clamp(genes.vision_range),
            repro_threshold: self.repro_threshold.clamp(genes.repro_threshold),
        }
    }

    pub fn contains(&self, genes: &Genes) -> bool {
        let within = |range: &GeneRange, v: f32| v >= range.min && v <= range.max;
        within(&self.move_speed, genes.move_speed)
            && within(&self.vision_range, genes.vision_range)
            && within(&self.repro_threshold, genes.repro_threshold)
    }
}
