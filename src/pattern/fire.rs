//! Fire: a heat-diffusion cellular automaton with ember and spark pools.
//!
//! The heat field holds one float in [0,10] per cell, row-major. Bottom
//! `thickness` rows are the fuel band, continuously re-seeded each tick;
//! heat diffuses upward through a weighted kernel and decays against a
//! pre-blurred noise field. Embers and sparks are separate fixed-capacity
//! structure-of-arrays pools with swap-compact removal.

use crate::pattern::Pattern;
use crate::terminal::{rgb, Terminal};
use clap::ValueEnum;
use crossterm::style::Color;
use rand::prelude::*;

const MAX_EMBER_COUNT: usize = 128;
const MAX_SPARK_COUNT: usize = 32;
const PULSE_SPEED: f32 = 1.2;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum FireMode {
    Wall,
    Campfire,
    Torch,
    Candles,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum FirePalette {
    Classic,
    Blue,
    Lava,
    Matrix,
    Mono,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum FireCharset {
    Classic,
    Blocks,
    Sparks,
}

#[derive(Clone)]
pub struct FireConfig {
    pub mode: FireMode,
    pub intensity: f32,  // 1-10, fuel heat
    pub decay: f32,      // 0.5-3.0, higher = shorter flames
    pub turbulence: f32, // 1-10, randomness in decay
    pub wind: f32,       // -5..+5, horizontal drift bias
    pub thickness: usize, // 1-5, fuel row depth
    pub fps: f32,        // simulation ticks per second
    pub palette: FirePalette,
    pub charset: FireCharset,
    pub pulse: bool,
    pub embers: bool,
    pub sparks: bool,
    pub seed: Option<u64>,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            mode: FireMode::Wall,
            intensity: 7.0,
            decay: 1.0,
            turbulence: 5.0,
            wind: 0.0,
            thickness: 1,
            fps: 25.0,
            palette: FirePalette::Classic,
            charset: FireCharset::Classic,
            pulse: false,
            embers: true,
            sparks: true,
            seed: None,
        }
    }
}

const PALETTE_CLASSIC: [Color; 10] = [
    rgb(0x00, 0x00, 0x00),
    rgb(0x1a, 0x0a, 0x02),
    rgb(0x3d, 0x12, 0x06),
    rgb(0x5e, 0x1a, 0x08),
    rgb(0x8c, 0x2a, 0x08),
    rgb(0xb8, 0x45, 0x10),
    rgb(0xd8, 0x6a, 0x18),
    rgb(0xf4, 0x99, 0x22),
    rgb(0xff, 0xc8, 0x44),
    rgb(0xff, 0xf8, 0xdc),
];

const PALETTE_BLUE: [Color; 10] = [
    rgb(0x00, 0x00, 0x00),
    rgb(0x02, 0x0a, 0x1a),
    rgb(0x06, 0x1a, 0x3d),
    rgb(0x0a, 0x2a, 0x5e),
    rgb(0x10, 0x40, 0x80),
    rgb(0x18, 0x60, 0xa8),
    rgb(0x20, 0x88, 0xd0),
    rgb(0x40, 0xb0, 0xf0),
    rgb(0x80, 0xd8, 0xff),
    rgb(0xe0, 0xf8, 0xff),
];

const PALETTE_LAVA: [Color; 10] = [
    rgb(0x00, 0x00, 0x00),
    rgb(0x1a, 0x00, 0x00),
    rgb(0x3d, 0x04, 0x04),
    rgb(0x60, 0x08, 0x08),
    rgb(0x8a, 0x10, 0x10),
    rgb(0xb8, 0x20, 0x20),
    rgb(0xe0, 0x40, 0x40),
    rgb(0xf0, 0x80, 0x60),
    rgb(0xff, 0xc0, 0xa0),
    rgb(0xff, 0xff, 0xff),
];

const PALETTE_MATRIX: [Color; 10] = [
    rgb(0x00, 0x00, 0x00),
    rgb(0x00, 0x1a, 0x02),
    rgb(0x00, 0x3d, 0x08),
    rgb(0x00, 0x60, 0x10),
    rgb(0x00, 0x88, 0x20),
    rgb(0x10, 0xb0, 0x30),
    rgb(0x30, 0xd8, 0x50),
    rgb(0x60, 0xf0, 0x80),
    rgb(0xa0, 0xff, 0xb0),
    rgb(0xe0, 0xff, 0xe8),
];

const CHARSET_CLASSIC: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
const CHARSET_BLOCKS: &[char] = &[' ', '░', '▒', '▓', '█'];
const CHARSET_SPARKS: &[char] = &[' ', '.', ',', '*', '+', 'x', 'X', '#', '%'];

fn clampf(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

/// Structure-of-arrays particle store with a hard capacity and
/// swap-compact removal.
struct ParticlePool {
    count: usize,
    x: Vec<f32>,
    y: Vec<f32>,
    vx: Vec<f32>,
    vy: Vec<f32>,
    life: Vec<f32>,
}

impl ParticlePool {
    fn new(cap: usize) -> Self {
        Self {
            count: 0,
            x: vec![0.0; cap],
            y: vec![0.0; cap],
            vx: vec![0.0; cap],
            vy: vec![0.0; cap],
            life: vec![0.0; cap],
        }
    }

    fn capacity(&self) -> usize {
        self.x.len()
    }

    fn copy_down(&mut self, from: usize, to: usize) {
        self.x[to] = self.x[from];
        self.y[to] = self.y[from];
        self.vx[to] = self.vx[from];
        self.vy[to] = self.vy[from];
        self.life[to] = self.life[from];
    }
}

/// A horizontal span of continuously re-fueled columns.
#[derive(Clone, Copy)]
struct FuelRegion {
    x: f32,
    w: f32,
}

impl FuelRegion {
    fn contains(&self, col: usize) -> bool {
        let c = col as f32;
        c >= self.x && c < self.x + self.w
    }
}

pub struct FirePattern {
    config: FireConfig,
    rng: StdRng,
    heat: Vec<f32>,
    noise: Vec<f32>,
    cols: usize,
    rows: usize,
    accumulator: f32,
    pulse_phase: f32,
    noise_scroll: f32,
    embers: ParticlePool,
    sparks: ParticlePool,
}

impl FirePattern {
    pub fn new(config: FireConfig) -> Self {
        let seed = config.seed.unwrap_or_else(crate::engine::clock_seed);
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            heat: Vec::new(),
            noise: Vec::new(),
            cols: 0,
            rows: 0,
            accumulator: 0.0,
            pulse_phase: 0.0,
            noise_scroll: 0.0,
            embers: ParticlePool::new(MAX_EMBER_COUNT),
            sparks: ParticlePool::new(MAX_SPARK_COUNT),
        }
    }

    fn init_noise(&mut self) {
        let n = self.cols * self.rows;
        self.noise = (0..n).map(|_| 0.3 * self.rng.gen::<f32>()).collect();

        // Two box-blur passes smooth the raw noise into organic patches
        let mut tmp = vec![0.0f32; n];
        for _ in 0..2 {
            for row in 0..self.rows {
                for col in 0..self.cols {
                    let mut sum = 0.0;
                    let mut count = 0.0;
                    for dr in -1i32..=1 {
                        for dc in -1i32..=1 {
                            let r = row as i32 + dr;
                            let c = col as i32 + dc;
                            if r >= 0 && (r as usize) < self.rows && c >= 0 && (c as usize) < self.cols {
                                sum += self.noise[r as usize * self.cols + c as usize];
                                count += 1.0;
                            }
                        }
                    }
                    tmp[row * self.cols + col] = sum / count;
                }
            }
            self.noise.copy_from_slice(&tmp);
        }
    }

    fn fuel_regions(&self) -> Vec<FuelRegion> {
        let cols = self.cols as f32;
        match self.config.mode {
            FireMode::Campfire => {
                let w = 0.3 * cols;
                vec![FuelRegion {
                    x: cols / 2.0 - w / 2.0,
                    w,
                }]
            }
            FireMode::Torch => {
                let count = (self.cols / 25).clamp(3, 4);
                let spacing = cols / (count as f32 + 1.0);
                let w = (0.06 * cols).max(3.0);
                (0..count)
                    .map(|i| FuelRegion {
                        x: spacing * (i as f32 + 1.0) - w / 2.0,
                        w,
                    })
                    .collect()
            }
            FireMode::Candles => {
                let count = (self.cols / 15).clamp(5, 8);
                let spacing = cols / (count as f32 + 1.0);
                let w = (0.03 * cols).max(2.0);
                (0..count)
                    .map(|i| FuelRegion {
                        x: spacing * (i as f32 + 1.0) - w / 2.0,
                        w,
                    })
                    .collect()
            }
            FireMode::Wall => vec![FuelRegion { x: 0.0, w: cols }],
        }
    }

    fn in_fuel_region(col: usize, regions: &[FuelRegion]) -> bool {
        regions.iter().any(|r| r.contains(col))
    }

    fn tick(&mut self) {
        self.ignite_fuel_rows();
        self.flame_surges();
        self.propagate();
        self.horizontal_smooth();
    }

    fn ignite_fuel_rows(&mut self) {
        let regions = self.fuel_regions();
        let intensity = self.config.intensity;
        let pulse_multiplier = if self.config.pulse {
            0.7 + 0.3 * self.pulse_phase.sin()
        } else {
            1.0
        };
        let safe_thickness = self.config.thickness.min(self.rows.saturating_sub(2));

        for t in 0..safe_thickness {
            let row = self.rows - 1 - t;
            for col in 0..self.cols {
                let idx = row * self.cols + col;

                if !Self::in_fuel_region(col, &regions) {
                    self.heat[idx] *= 0.3;
                    continue;
                }

                let fuel = intensity * (0.6 + 0.4 * self.rng.gen::<f32>()) * pulse_multiplier;
                let flicker_chance = 0.12 / (safe_thickness as f32).sqrt();
                if self.rng.gen::<f32>() < flicker_chance {
                    self.heat[idx] *= 0.7;
                } else {
                    self.heat[idx] = self.heat[idx].max(fuel);
                }
            }
        }
    }

    fn flame_surges(&mut self) {
        let regions = self.fuel_regions();
        let surge_chance = match self.config.mode {
            FireMode::Wall => 1.0,
            FireMode::Campfire => 0.5,
            _ => 0.3,
        };
        let surge_count = if self.rng.gen::<f32>() < 0.5 * surge_chance {
            1 + self.rng.gen_range(0..4)
        } else {
            0
        };

        for _ in 0..surge_count {
            let region = regions[self.rng.gen_range(0..regions.len())];
            let center_col = (region.x + self.rng.gen::<f32>() * region.w).floor();
            let height = 4 + self.rng.gen_range(0..8);
            let max_heat = 7.0 + 3.0 * self.rng.gen::<f32>();

            for h in 0..height {
                let row = self.rows as i32 - 2 - self.config.thickness as i32 - h as i32;
                if row < 0 {
                    break;
                }

                let half_width = 1.5 * ((h as f32 / height as f32) * std::f32::consts::PI).sin();
                let mut dc = -half_width;
                while dc <= half_width {
                    let col = center_col + (dc + (self.rng.gen::<f32>() - 0.5)).round();
                    dc += 1.0;
                    if col < 0.0 || col >= self.cols as f32 {
                        continue;
                    }

                    let idx = row as usize * self.cols + col as usize;
                    let heat_val = max_heat
                        * (1.0 - (h as f32 / height as f32) * 0.5)
                        * (0.6 + 0.4 * self.rng.gen::<f32>());
                    self.heat[idx] = self.heat[idx].max(heat_val);
                }
            }
        }
    }

    fn propagate(&mut self) {
        let cols = self.cols;
        let rows = self.rows;
        let fuel_bottom = rows.saturating_sub(self.config.thickness);
        let n = cols * rows;
        let mut row_buf = vec![0.0f32; cols];

        self.noise_scroll += 0.02;
        let scroll = (10.0 * self.noise_scroll).floor() as usize;

        for row in 0..fuel_bottom {
            let height_factor = 1.0 - row as f32 / rows as f32;
            row_buf.fill(0.0);

            for col in 0..cols {
                let below = row + 1;
                if below >= rows {
                    continue;
                }

                // Wind shifts the source column lookup by wind x height factor
                let mut src_col = col;
                if self.config.wind != 0.0 {
                    let drift =
                        self.config.wind * height_factor * (0.5 + 0.3 * self.rng.gen::<f32>());
                    src_col = clampf((col as f32 + drift).round(), 0.0, cols as f32 - 1.0) as usize;
                }

                // 5-neighbor weighted kernel: center 3, +-1 gets 2, +-2 gets 1,
                // row+2 gets 1; weight is always >= 3 so the average is safe
                let mut sum = 3.0 * self.heat[below * cols + src_col];
                let mut weight = 3.0;
                if src_col > 0 {
                    sum += 2.0 * self.heat[below * cols + src_col - 1];
                    weight += 2.0;
                }
                if src_col < cols - 1 {
                    sum += 2.0 * self.heat[below * cols + src_col + 1];
                    weight += 2.0;
                }
                if src_col > 1 {
                    sum += self.heat[below * cols + src_col - 2];
                    weight += 1.0;
                }
                if src_col + 2 < cols {
                    sum += self.heat[below * cols + src_col + 2];
                    weight += 1.0;
                }
                if below + 1 < rows {
                    sum += self.heat[(below + 1) * cols + src_col];
                    weight += 1.0;
                }

                let mut h = sum / weight;

                let decay_base = 0.2 * self.config.decay;
                let noise_idx = ((row + scroll) % rows) * cols + col;
                h -= decay_base * (0.6 + self.noise[noise_idx % n] + 0.4 * self.rng.gen::<f32>());

                h += (self.rng.gen::<f32>() - 0.5) * height_factor * self.config.turbulence * 0.12;

                row_buf[col] = clampf(h, 0.0, 10.0);
            }

            self.heat[row * cols..row * cols + cols].copy_from_slice(&row_buf);
        }
    }

    fn horizontal_smooth(&mut self) {
        let cols = self.cols;
        let start = self.rows.saturating_sub(8);

        for row in start..self.rows.saturating_sub(1) {
            for col in 1..cols.saturating_sub(1) {
                let idx = row * cols + col;
                self.heat[idx] =
                    0.85 * self.heat[idx] + 0.075 * (self.heat[idx - 1] + self.heat[idx + 1]);
            }
        }
    }

    fn spawn_ember(&mut self) {
        if self.embers.count >= MAX_EMBER_COUNT || self.rows < 3 {
            return;
        }

        let chance = 0.12 + 0.02 * self.config.thickness as f32 + 0.01 * self.config.intensity;
        if self.rng.gen::<f32>() >= chance {
            return;
        }

        let regions = self.fuel_regions();
        let region = regions[self.rng.gen_range(0..regions.len())];
        let i = self.embers.count;
        self.embers.count += 1;
        self.embers.x[i] = region.x + self.rng.gen::<f32>() * region.w;
        self.embers.y[i] =
            self.rows as f32 - self.config.thickness as f32 - 1.0 - 3.0 * self.rng.gen::<f32>();
        self.embers.life[i] = 0.8 + 1.5 * self.rng.gen::<f32>();
        self.embers.vx[i] = 0.2 * (self.rng.gen::<f32>() - 0.5) - 0.08 * self.config.wind;
        self.embers.vy[i] = -0.3 - 0.2 * self.rng.gen::<f32>();
    }

    fn update_embers(&mut self, dt_sec: f32) {
        if self.embers.count == 0 {
            return;
        }

        let cols = self.cols as f32;
        let wind = self.config.wind;
        let mut alive = 0;
        for i in 0..self.embers.count {
            self.embers.life[i] -= dt_sec;
            if self.embers.life[i] <= 0.0 {
                continue;
            }

            self.embers.x[i] += self.embers.vx[i] * dt_sec * 30.0;
            self.embers.y[i] += self.embers.vy[i] * dt_sec * 30.0;
            self.embers.vx[i] += 0.5 * (self.rng.gen::<f32>() - 0.5) - 0.02 * wind;
            self.embers.vy[i] -= 0.05;

            self.embers.vx[i] = clampf(self.embers.vx[i], -1.5, 1.5);
            self.embers.vy[i] = clampf(self.embers.vy[i], -1.5, 0.5);

            if self.embers.y[i] < 0.0 || self.embers.x[i] < 0.0 || self.embers.x[i] >= cols {
                continue;
            }

            // Compact-remove: swap live entries to the front, no reallocation
            if alive != i {
                self.embers.copy_down(i, alive);
            }
            alive += 1;
        }
        self.embers.count = alive;
    }

    fn spawn_sparks(&mut self) {
        if self.sparks.count >= MAX_SPARK_COUNT || self.rows < 3 {
            return;
        }

        let chance = 0.25 + 0.03 * self.config.intensity;
        if self.rng.gen::<f32>() >= chance {
            return;
        }

        let regions = self.fuel_regions();
        let burst_count = 1 + self.rng.gen_range(0..3);
        for _ in 0..burst_count {
            if self.sparks.count >= MAX_SPARK_COUNT {
                break;
            }
            let region = regions[self.rng.gen_range(0..regions.len())];
            let i = self.sparks.count;
            self.sparks.count += 1;
            self.sparks.x[i] = region.x + self.rng.gen::<f32>() * region.w;
            self.sparks.y[i] =
                self.rows as f32 - self.config.thickness as f32 - 2.0 - 2.0 * self.rng.gen::<f32>();
            self.sparks.life[i] = 0.25 + 0.35 * self.rng.gen::<f32>();
            self.sparks.vx[i] = 3.0 * (self.rng.gen::<f32>() - 0.5) - 0.15 * self.config.wind;
            self.sparks.vy[i] = -0.5 - 1.5 * self.rng.gen::<f32>();
        }
    }

    fn update_sparks(&mut self, dt_sec: f32) {
        if self.sparks.count == 0 {
            return;
        }

        let cols = self.cols as f32;
        let wind = self.config.wind;
        let mut alive = 0;
        for i in 0..self.sparks.count {
            self.sparks.life[i] -= dt_sec;
            if self.sparks.life[i] <= 0.0 {
                continue;
            }

            self.sparks.x[i] += self.sparks.vx[i] * dt_sec * 30.0;
            self.sparks.y[i] += self.sparks.vy[i] * dt_sec * 30.0;
            self.sparks.vx[i] += 2.0 * (self.rng.gen::<f32>() - 0.5) - 0.05 * wind;
            self.sparks.vy[i] += 0.3;

            if self.sparks.y[i] < 0.0 || self.sparks.x[i] < 0.0 || self.sparks.x[i] >= cols {
                continue;
            }

            if alive != i {
                self.sparks.copy_down(i, alive);
            }
            alive += 1;
        }
        self.sparks.count = alive;
    }

    fn charset(&self) -> &'static [char] {
        match self.config.charset {
            FireCharset::Classic => CHARSET_CLASSIC,
            FireCharset::Blocks => CHARSET_BLOCKS,
            FireCharset::Sparks => CHARSET_SPARKS,
        }
    }

    fn palette(&self) -> Option<&'static [Color; 10]> {
        match self.config.palette {
            FirePalette::Classic => Some(&PALETTE_CLASSIC),
            FirePalette::Blue => Some(&PALETTE_BLUE),
            FirePalette::Lava => Some(&PALETTE_LAVA),
            FirePalette::Matrix => Some(&PALETTE_MATRIX),
            FirePalette::Mono => None,
        }
    }

    fn heat_color(&self, heat: f32) -> Color {
        match self.palette() {
            Some(palette) => palette[(heat.floor() as usize).min(9)],
            None => {
                let v = (clampf(heat / 10.0, 0.0, 1.0) * 255.0).floor() as u8;
                rgb(v, v, v)
            }
        }
    }

    fn render_embers(&self, term: &mut Terminal, cols: usize, rows: usize) {
        for i in 0..self.embers.count {
            let col = self.embers.x[i].floor() as i32;
            let row = self.embers.y[i].floor() as i32;
            if col < 0 || col >= cols as i32 || row < 0 || row >= rows as i32 {
                continue;
            }

            let ch = if self.embers.life[i] > 0.3 { '*' } else { '.' };
            let color = match self.palette() {
                Some(palette) => palette[if self.embers.life[i] > 0.5 { 9 } else { 7 }],
                None => {
                    let v = if self.embers.life[i] > 0.5 { 255 } else { 178 };
                    rgb(v, v, v)
                }
            };
            term.set(col, row, ch, Some(color));
        }
    }

    fn render_sparks(&self, term: &mut Terminal, cols: usize, rows: usize) {
        let color = match self.palette() {
            Some(palette) => palette[9],
            None => rgb(255, 255, 255),
        };
        for i in 0..self.sparks.count {
            let col = self.sparks.x[i].floor() as i32;
            let row = self.sparks.y[i].floor() as i32;
            if col < 0 || col >= cols as i32 || row < 0 || row >= rows as i32 {
                continue;
            }
            term.set(col, row, '\'', Some(color));
        }
    }

    #[cfg(test)]
    fn ember_count(&self) -> usize {
        self.embers.count
    }

    #[cfg(test)]
    fn spark_count(&self) -> usize {
        self.sparks.count
    }
}

impl Pattern for FirePattern {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.accumulator = 0.0;
        self.pulse_phase = 0.0;
        self.noise_scroll = 0.0;
        self.embers = ParticlePool::new(MAX_EMBER_COUNT);
        self.sparks = ParticlePool::new(MAX_SPARK_COUNT);
        self.heat = vec![0.0; cols * rows];
        self.init_noise();
        self.ignite_fuel_rows();
    }

    fn update(&mut self, dt_ms: f32) {
        let interval_ms = 1000.0 / self.config.fps;
        self.accumulator += dt_ms;

        while self.accumulator >= interval_ms {
            if self.config.pulse {
                self.pulse_phase += PULSE_SPEED * (interval_ms / 1000.0);
            }
            self.tick();
            self.accumulator -= interval_ms;
        }

        let dt_sec = dt_ms / 1000.0;
        if self.config.embers {
            self.spawn_ember();
            self.update_embers(dt_sec);
        }
        if self.config.sparks {
            self.spawn_sparks();
            self.update_sparks(dt_sec);
        }
    }

    fn render(&self, term: &mut Terminal, cols: usize, rows: usize) {
        let charset = self.charset();
        let char_len = charset.len() - 1;

        for row in 0..rows.min(self.rows) {
            for col in 0..cols.min(self.cols) {
                let heat = self.heat[row * self.cols + col];
                if heat < 0.5 {
                    continue;
                }

                let char_idx =
                    (((heat * char_len as f32) / 9.0 + 0.5).floor() as usize).min(char_len);
                let ch = charset[char_idx];
                if ch == ' ' {
                    continue;
                }

                term.set(col as i32, row as i32, ch, Some(self.heat_color(heat)));
            }
        }

        if self.config.embers {
            self.render_embers(term, cols, rows);
        }
        if self.config.sparks {
            self.render_sparks(term, cols, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_with_seed(mode: FireMode, seed: u64) -> FirePattern {
        let mut pattern = FirePattern::new(FireConfig {
            mode,
            seed: Some(seed),
            ..FireConfig::default()
        });
        pattern.init(80, 24);
        pattern
    }

    #[test]
    fn heat_stays_in_range_over_many_ticks() {
        for mode in [
            FireMode::Wall,
            FireMode::Campfire,
            FireMode::Torch,
            FireMode::Candles,
        ] {
            let mut fire = fire_with_seed(mode, 11);
            for _ in 0..300 {
                fire.update(16.7);
            }
            for &h in &fire.heat {
                assert!((0.0..=10.0).contains(&h), "heat escaped range: {h}");
            }
        }
    }

    #[test]
    fn particle_pools_respect_caps() {
        let mut fire = fire_with_seed(FireMode::Wall, 3);
        for _ in 0..2000 {
            fire.update(16.7);
            assert!(fire.ember_count() <= MAX_EMBER_COUNT);
            assert!(fire.spark_count() <= MAX_SPARK_COUNT);
        }
    }

    #[test]
    fn no_dead_particles_survive_update() {
        let mut fire = fire_with_seed(FireMode::Campfire, 99);
        for _ in 0..500 {
            fire.update(16.7);
            for i in 0..fire.ember_count() {
                assert!(fire.embers.life[i] > 0.0);
            }
            for i in 0..fire.spark_count() {
                assert!(fire.sparks.life[i] > 0.0);
            }
        }
    }

    #[test]
    fn resize_reallocates_heat_field() {
        let mut fire = fire_with_seed(FireMode::Wall, 5);
        for _ in 0..50 {
            fire.update(16.7);
        }
        fire.init(120, 30);
        assert_eq!(fire.heat.len(), 120 * 30);
        for _ in 0..50 {
            fire.update(16.7);
        }
        let mut term = Terminal::headless(120, 30);
        fire.render(&mut term, 120, 30);
    }

    #[test]
    fn large_dt_is_absorbed_by_accumulator() {
        let mut fire = fire_with_seed(FireMode::Wall, 8);
        fire.update(100.0);
        for &h in &fire.heat {
            assert!((0.0..=10.0).contains(&h));
        }
    }

    #[test]
    fn candle_regions_are_never_degenerate() {
        let mut fire = fire_with_seed(FireMode::Candles, 4);
        fire.init(30, 10);
        for region in fire.fuel_regions() {
            assert!(region.w >= 1.0);
        }
    }
}
