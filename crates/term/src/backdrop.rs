//! Ambient backdrop: piece silhouettes drifting down behind the game.
//!
//! Purely decorative. It has its own clock and RNG and never looks at a session.

use crate::core::pieces::base_mask;
use crate::core::{Mask, SimpleRng};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::game_view::kind_rgb;
use crate::types::PieceKind;

/// Spawn and fall timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackdropConfig {
    /// Shapes released right away, `burst_spacing_ms` apart
    pub initial_burst: u32,
    pub burst_spacing_ms: u32,
    /// Steady-state release interval after the burst
    pub spawn_every_ms: u32,
    pub min_fall_ms: u32,
    pub max_fall_ms: u32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            initial_burst: 10,
            burst_spacing_ms: 200,
            spawn_every_ms: 800,
            min_fall_ms: 3000,
            max_fall_ms: 6000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingShape {
    pub kind: PieceKind,
    pub mask: Mask,
    /// Leftmost terminal column
    pub column: u16,
    pub born_ms: u64,
    pub fall_ms: u32,
}

impl FallingShape {
    /// Fraction of the fall completed at `now_ms`, 0.0..=1.0
    pub fn progress(&self, now_ms: u64) -> f32 {
        let age = now_ms.saturating_sub(self.born_ms) as f32;
        (age / self.fall_ms.max(1) as f32).min(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct Backdrop {
    config: BackdropConfig,
    rng: SimpleRng,
    shapes: Vec<FallingShape>,
    clock_ms: u64,
    next_spawn_ms: u64,
    spawned: u32,
}

impl Backdrop {
    pub fn new(seed: u32, config: BackdropConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(seed),
            shapes: Vec::with_capacity(32),
            clock_ms: 0,
            next_spawn_ms: 0,
            spawned: 0,
        }
    }

    /// Advance the animation, releasing due shapes across `width` columns
    /// and dropping the ones that have fallen out of view.
    pub fn update(&mut self, elapsed_ms: u32, width: u16) {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms as u64);

        while self.clock_ms >= self.next_spawn_ms {
            let born = self.next_spawn_ms;
            self.spawn(born, width);
            let step = if self.spawned < self.config.initial_burst {
                self.config.burst_spacing_ms
            } else {
                self.config.spawn_every_ms
            };
            self.next_spawn_ms = self.next_spawn_ms.saturating_add(step.max(1) as u64);
        }

        let now = self.clock_ms;
        self.shapes.retain(|s| s.progress(now) < 1.0);
    }

    fn spawn(&mut self, born_ms: u64, width: u16) {
        let kind = PieceKind::ALL[self.rng.next_range(PieceKind::ALL.len() as u32) as usize];
        let mask = base_mask(kind).trimmed();
        let span = mask.width() as u16 * 2;
        let column = self.rng.next_range(width.saturating_sub(span) as u32 + 1) as u16;
        let fall_ms = self
            .rng
            .next_between(self.config.min_fall_ms, self.config.max_fall_ms);

        self.shapes.push(FallingShape {
            kind,
            mask,
            column,
            born_ms,
            fall_ms,
        });
        self.spawned = self.spawned.saturating_add(1);
    }

    pub fn shapes(&self) -> &[FallingShape] {
        &self.shapes
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Paint every live shape, top entering from above and leaving past the bottom
    pub fn draw(&self, fb: &mut FrameBuffer) {
        let height = fb.height() as f32;
        for shape in &self.shapes {
            let h = shape.mask.height() as f32;
            let top = -h + shape.progress(self.clock_ms) * (height + h);
            let style = CellStyle {
                fg: kind_rgb(shape.kind).mix(Rgb::new(0, 0, 0), 0.7),
                bg: Rgb::new(0, 0, 0),
                bold: false,
                dim: true,
            };

            for (r, c) in shape.mask.filled() {
                let y = (top + r as f32).floor();
                if y < 0.0 || y >= height {
                    continue;
                }
                let x = shape.column.saturating_add(c as u16 * 2);
                fb.fill_rect(x, y as u16, 2, 1, '▓', style);
            }
        }
    }
}
