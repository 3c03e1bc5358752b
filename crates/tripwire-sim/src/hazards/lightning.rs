//! Lightning hazard: strikes once when enabled, then on a jittered interval.
//!
//! All randomness comes from the hazard's own level-seeded generator, drawn
//! in a fixed order per strike: strike position, bolt offset x, bolt offset
//! z, clip, next interval.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tripwire_core::config::LightningConfig;
use tripwire_core::constants::{
    LIGHTNING_AUDIO_LIFT, LIGHTNING_MAX_INTERVAL_SECS, LIGHTNING_SOURCE_HEIGHT,
    LIGHTNING_SOURCE_SPREAD,
};
use tripwire_core::events::PresentationEvent;
use tripwire_core::types::{secs_to_ticks, HazardId, Transform};

use crate::nav::NavMesh;
use crate::rng::level_rng;

pub struct LightningHazard {
    pub id: HazardId,
    pub transform: Transform,
    pub config: LightningConfig,
    pub rng: ChaCha8Rng,
    pub enabled: bool,
    /// Tick of the next strike. Meaningless while disabled.
    pub next_strike_at: u64,
    level_seed: Option<u64>,
}

impl LightningHazard {
    /// A hazard enabled at `now`; the first strike lands on that tick.
    pub fn new(
        id: HazardId,
        transform: Transform,
        config: LightningConfig,
        level_seed: Option<u64>,
        now: u64,
    ) -> Self {
        Self {
            id,
            transform,
            config,
            rng: level_rng(level_seed),
            enabled: true,
            next_strike_at: now,
            level_seed,
        }
    }

    /// Re-enable. The generator restarts from the level seed.
    pub fn enable(&mut self, now: u64) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.rng = level_rng(self.level_seed);
        self.next_strike_at = now;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Strike if due. Returns whether a strike happened.
    pub fn run(
        &mut self,
        now: u64,
        nav: &dyn NavMesh,
        listener_indoors: bool,
        events: &mut Vec<PresentationEvent>,
    ) -> bool {
        if !self.enabled || now < self.next_strike_at {
            return false;
        }
        let destination = self.strike_position(nav);
        events.push(self.bolt(destination, listener_indoors));
        self.next_strike_at = now + self.next_interval();
        true
    }

    fn strike_position(&mut self, nav: &dyn NavMesh) -> Vec3 {
        let config = &self.config;
        if config.use_object_position {
            let radius = config.bolt_range_from_object;
            let point = self.transform.position + random_in_sphere(&mut self.rng) * radius;
            return nav.project(point, radius);
        }
        if !config.bolt_positions.is_empty() {
            let anchor = config.bolt_positions[self.rng.gen_range(0..config.bolt_positions.len())];
            let radius = config.bolt_range_from_list;
            let point = anchor + random_in_sphere(&mut self.rng) * radius;
            return nav.project(point, radius);
        }
        self.transform.position
    }

    fn bolt(&mut self, destination: Vec3, listener_indoors: bool) -> PresentationEvent {
        let half = LIGHTNING_SOURCE_SPREAD / 2.0;
        let dx = self.rng.gen::<f32>() * LIGHTNING_SOURCE_SPREAD - half;
        let dz = self.rng.gen::<f32>() * LIGHTNING_SOURCE_SPREAD - half;
        let source = destination + Vec3::Y * LIGHTNING_SOURCE_HEIGHT + Vec3::new(dx, 0.0, dz);

        let config = &self.config;
        let clip = (!config.strike_clips.is_empty())
            .then(|| config.strike_clips[self.rng.gen_range(0..config.strike_clips.len())].clone());

        PresentationEvent::LightningStrike {
            source,
            destination,
            glow_width_multiplier: config.glow_width_multiplier,
            duration_range: (config.duration_min, config.duration_max),
            trunk_width_range: (config.trunk_min, config.trunk_max),
            generations: config.number_of_bolts,
            audio_position: destination + Vec3::Y * LIGHTNING_AUDIO_LIFT,
            volume: if listener_indoors { 0.0 } else { config.volume },
            clip,
        }
    }

    fn next_interval(&mut self) -> u64 {
        let secs = (self.config.strike_interval as f64 + self.rng.gen::<f64>())
            .clamp(0.0, LIGHTNING_MAX_INTERVAL_SECS);
        secs_to_ticks(secs).max(1)
    }
}

/// Uniform point inside the unit sphere.
pub fn random_in_sphere(rng: &mut ChaCha8Rng) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}
