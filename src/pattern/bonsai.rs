//! Bonsai: a branch-growth random walk writing into a persistent cell grid,
//! wrapped in a seasonal phase machine. Direction tables follow the cbonsai
//! d10/d15 weighted distributions.

use crate::pattern::Pattern;
use crate::terminal::{rgb, Terminal};
use crossterm::style::Color;
use rand::prelude::*;
use std::collections::VecDeque;

const LEAF_CHAR: char = '&';
const LEAF_LIFE_THRESHOLD: i32 = 4;
const TRUNK_FORK_CHANCE: f32 = 0.125;
const TRUNK_FORK_MIN_LIFE: i32 = 7;
const SHOOT_SPAWN_CHANCE: f32 = 0.33;
const COOLDOWN_MULTIPLIER: i32 = 2;
const TRUNK_STABILIZE_AGE: i32 = 2;
const TRUNK_STABILIZE_LIFE: i32 = 4;

const POT_WIDTH: usize = 31;
const POT_HEIGHT: usize = 4;
const POT_LINES: [&str; POT_HEIGHT] = [
    ":___________./~~~\\.___________:",
    " \\                           /",
    "  \\_________________________/",
    "  (_)                     (_)",
];
const POT_ACCENT_START: usize = 12;
const POT_ACCENT_END: usize = 18;

const BROWNING_DURATION: f32 = 8.0;
const FALLING_DURATION: f32 = 10.0;
const BARE_DURATION: f32 = 20.0;
const REGROWTH_DURATION: f32 = 8.0;

const AUTUMN_PALETTE: [Color; 4] = [
    rgb(0xb8, 0x86, 0x0b),
    rgb(0xd2, 0x69, 0x1e),
    rgb(0xcd, 0x85, 0x3f),
    rgb(0xda, 0xa5, 0x20),
];
const BRIGHT_LEAF_HIGHLIGHT: Color = rgb(0x5c, 0xd3, 0x5c);

const MIN_STAGGER_DELAY_MS: f32 = 5000.0;
const MAX_STAGGER_DELAY_MS: f32 = 20000.0;
const EDGE_LIFE_MIN_FACTOR: f32 = 0.5;
const EDGE_LIFE_MAX_FACTOR: f32 = 0.7;

#[derive(Clone)]
pub struct BonsaiConfig {
    pub growth_speed: f32, // branch steps per second
    pub hold_duration: f32, // seconds of full foliage before autumn
    pub life: i32,
    pub multiplier: i32,
    pub dark_wood: Color,
    pub bright_wood: Color,
    pub dark_leaf: Color,
    pub bright_leaf: Color,
    pub seed: Option<u64>,
}

impl Default for BonsaiConfig {
    fn default() -> Self {
        Self {
            growth_speed: 33.0,
            hold_duration: 45.0,
            life: 36,
            multiplier: 5,
            dark_wood: rgb(0x8b, 0x69, 0x14),
            bright_wood: rgb(0xd4, 0xa0, 0x17),
            dark_leaf: rgb(0x2d, 0x8a, 0x2d),
            bright_leaf: rgb(0x4a, 0xbb, 0x4a),
            seed: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum BranchType {
    Trunk,
    ShootLeft,
    ShootRight,
    Dying,
    Dead,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    Growing,
    Holding,
    Browning,
    Falling,
    Bare,
    Regrowth,
}

#[derive(Clone, Copy)]
struct Branch {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    age: i32,
    life: i32,
    shoot_cooldown: i32,
    kind: BranchType,
}

#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    color: Color,
    is_leaf: bool,
}

struct PendingTree {
    delay_ms: f32,
    life: i32,
    x: i32,
    y: i32,
}

struct LeafPosition {
    col: usize,
    row: usize,
    original_color: Color,
}

// d10/d15 direction tables, (weight, value)

const TRUNK_YOUNG_DX: &[(u32, i32)] = &[(1, -2), (3, -1), (2, 0), (3, 1), (1, 2)];
const TRUNK_MATURE_DY: &[(u32, i32)] = &[(7, -1), (3, 0)];
const SHOOT_LEFT_DY: &[(u32, i32)] = &[(2, -1), (6, 0), (2, 1)];
const SHOOT_LEFT_DX: &[(u32, i32)] = &[(2, -2), (4, -1), (3, 0), (1, 1)];
const SHOOT_RIGHT_DY: &[(u32, i32)] = &[(2, -1), (6, 0), (2, 1)];
const SHOOT_RIGHT_DX: &[(u32, i32)] = &[(2, 2), (4, 1), (3, 0), (1, -1)];
const DYING_DY: &[(u32, i32)] = &[(2, -1), (7, 0), (1, 1)];
const DYING_DX: &[(u32, i32)] = &[(1, -3), (2, -2), (3, -1), (3, 0), (3, 1), (2, 2), (1, 3)];
const DEAD_DY: &[(u32, i32)] = &[(3, -1), (4, 0), (3, 1)];

fn weighted_pick(rng: &mut StdRng, options: &[(u32, i32)]) -> i32 {
    let total: u32 = options.iter().map(|(w, _)| w).sum();
    let roll = rng.gen_range(0..total);
    let mut acc = 0;
    for &(weight, value) in options {
        acc += weight;
        if roll < acc {
            return value;
        }
    }
    options[options.len() - 1].1
}

fn pick_random(rng: &mut StdRng, chars: &str) -> char {
    let idx = rng.gen_range(0..chars.chars().count());
    chars.chars().nth(idx).unwrap_or(LEAF_CHAR)
}

pub struct BonsaiPattern {
    config: BonsaiConfig,
    rng: StdRng,
    cols: usize,
    rows: usize,
    grid: Vec<Option<Cell>>,
    queue: VecDeque<Branch>,
    accumulator: f32,
    phase: Phase,
    phase_timer: f32,
    next_shoot_side: BranchType,
    pending_trees: Vec<PendingTree>,
    leaf_cells: Vec<LeafPosition>,
    leaf_order: Vec<usize>,
    leaf_progress: usize,
}

impl BonsaiPattern {
    pub fn new(config: BonsaiConfig) -> Self {
        let seed = config.seed.unwrap_or_else(crate::engine::clock_seed);
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            cols: 0,
            rows: 0,
            grid: Vec::new(),
            queue: VecDeque::new(),
            accumulator: 0.0,
            phase: Phase::Growing,
            phase_timer: 0.0,
            next_shoot_side: BranchType::ShootLeft,
            pending_trees: Vec::new(),
            leaf_cells: Vec::new(),
            leaf_order: Vec::new(),
            leaf_progress: 0,
        }
    }

    fn deltas(&mut self, branch: &Branch) -> (i32, i32) {
        let multiplier = self.config.multiplier;
        match branch.kind {
            BranchType::Trunk => {
                if branch.age <= TRUNK_STABILIZE_AGE || branch.life < TRUNK_STABILIZE_LIFE {
                    return (self.rng.gen_range(-1..=1), 0);
                }
                if branch.age < multiplier * 3 {
                    // Young trunk rises one row every floor(multiplier/2) ages
                    let step = multiplier / 2;
                    let dy = if step > 0 && branch.age % step == 0 { -1 } else { 0 };
                    (weighted_pick(&mut self.rng, TRUNK_YOUNG_DX), dy)
                } else {
                    let dy = weighted_pick(&mut self.rng, TRUNK_MATURE_DY);
                    (self.rng.gen_range(-1..=1), dy)
                }
            }
            BranchType::ShootLeft => (
                weighted_pick(&mut self.rng, SHOOT_LEFT_DX),
                weighted_pick(&mut self.rng, SHOOT_LEFT_DY),
            ),
            BranchType::ShootRight => (
                weighted_pick(&mut self.rng, SHOOT_RIGHT_DX),
                weighted_pick(&mut self.rng, SHOOT_RIGHT_DY),
            ),
            BranchType::Dying => (
                weighted_pick(&mut self.rng, DYING_DX),
                weighted_pick(&mut self.rng, DYING_DY),
            ),
            BranchType::Dead => (
                self.rng.gen_range(-1..=1),
                weighted_pick(&mut self.rng, DEAD_DY),
            ),
        }
    }

    fn branch_cell(&mut self, kind: BranchType, dx: i32, dy: i32, life: i32) -> (char, Color) {
        if life < LEAF_LIFE_THRESHOLD || kind == BranchType::Dying {
            let color = if self.rng.gen::<f32>() < 0.9 {
                self.config.bright_leaf
            } else {
                BRIGHT_LEAF_HIGHLIGHT
            };
            return (LEAF_CHAR, color);
        }

        if kind == BranchType::Dead {
            let color = if self.rng.gen::<f32>() < 0.67 {
                self.config.dark_leaf
            } else {
                self.config.bright_leaf
            };
            return (LEAF_CHAR, color);
        }

        let wood_color = if self.rng.gen::<f32>() < 0.5 {
            self.config.dark_wood
        } else {
            self.config.bright_wood
        };

        let chars = match kind {
            BranchType::Trunk => {
                if dy == 0 {
                    "/~"
                } else if dx < 0 {
                    "\\|"
                } else if dx == 0 {
                    "/|\\"
                } else {
                    "|/"
                }
            }
            BranchType::ShootLeft => {
                if dy > 0 {
                    "\\"
                } else if dy == 0 {
                    "\\_"
                } else if dx < 0 {
                    "\\|"
                } else if dx == 0 {
                    "/|"
                } else {
                    "/"
                }
            }
            _ => {
                if dy > 0 {
                    "/"
                } else if dy == 0 {
                    "_/"
                } else if dx > 0 {
                    "|/"
                } else if dx == 0 {
                    "|\\"
                } else {
                    "\\"
                }
            }
        };

        (pick_random(&mut self.rng, chars), wood_color)
    }

    fn seed_all_trees(&mut self) {
        self.grid = vec![None; self.cols * self.rows];
        self.queue.clear();
        self.next_shoot_side = BranchType::ShootLeft;
        self.pending_trees.clear();

        let root_y = self.rows as i32 - POT_HEIGHT as i32 - 1;
        self.queue.push_back(Branch {
            x: self.cols as i32 / 2,
            y: root_y,
            dx: 0,
            dy: -1,
            age: 0,
            life: self.config.life,
            shoot_cooldown: self.config.multiplier * COOLDOWN_MULTIPLIER,
            kind: BranchType::Trunk,
        });

        self.seed_edge_trees();
    }

    fn seed_edge_trees(&mut self) {
        let cols = self.cols as f32;
        let min_spacing = cols * 0.15;
        let mut placed: Vec<i32> = vec![self.cols as i32 / 2];

        let mut candidates: Vec<i32> = Vec::new();

        // Guarantee one tree on the left and one on the right
        candidates.push(
            (cols * 0.1) as i32 + self.rng.gen_range(0..(cols * 0.15).max(1.0) as i32 + 1),
        );
        candidates.push(
            (cols * 0.75) as i32 + self.rng.gen_range(0..(cols * 0.15).max(1.0) as i32 + 1),
        );

        // Extra trees on wider screens
        let extras = if self.cols > 160 {
            2 + self.rng.gen_range(0..2)
        } else if self.cols > 100 {
            1 + self.rng.gen_range(0..2)
        } else {
            0
        };
        for _ in 0..extras {
            candidates
                .push((cols * 0.05) as i32 + self.rng.gen_range(0..(cols * 0.9).max(1.0) as i32 + 1));
        }

        for x in candidates {
            if placed.iter().any(|&px| (px - x).abs() < min_spacing as i32) {
                continue;
            }
            placed.push(x);

            let life_factor = EDGE_LIFE_MIN_FACTOR
                + self.rng.gen::<f32>() * (EDGE_LIFE_MAX_FACTOR - EDGE_LIFE_MIN_FACTOR);
            let delay_ms = MIN_STAGGER_DELAY_MS
                + self.rng.gen::<f32>() * (MAX_STAGGER_DELAY_MS - MIN_STAGGER_DELAY_MS);

            self.pending_trees.push(PendingTree {
                delay_ms,
                life: (self.config.life as f32 * life_factor) as i32,
                x,
                y: self.rows as i32 - 1,
            });
        }
    }

    fn promote_pending_trees(&mut self, dt_ms: f32) {
        if self.pending_trees.is_empty() {
            return;
        }

        let mut i = 0;
        while i < self.pending_trees.len() {
            self.pending_trees[i].delay_ms -= dt_ms;
            if self.pending_trees[i].delay_ms <= 0.0 {
                let tree = self.pending_trees.swap_remove(i);
                self.queue.push_back(Branch {
                    x: tree.x,
                    y: tree.y,
                    dx: 0,
                    dy: -1,
                    age: 0,
                    life: tree.life,
                    shoot_cooldown: self.config.multiplier * COOLDOWN_MULTIPLIER,
                    kind: BranchType::Trunk,
                });
            } else {
                i += 1;
            }
        }
    }

    fn collect_leaf_cells(&mut self) {
        self.leaf_cells.clear();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some(cell) = self.grid[row * self.cols + col] {
                    if cell.is_leaf {
                        self.leaf_cells.push(LeafPosition {
                            row,
                            col,
                            original_color: cell.color,
                        });
                    }
                }
            }
        }
        self.leaf_order = (0..self.leaf_cells.len()).collect();
        self.leaf_order.shuffle(&mut self.rng);
    }

    fn reshuffle_leaf_order(&mut self) {
        self.leaf_progress = 0;
        self.leaf_order = (0..self.leaf_cells.len()).collect();
        self.leaf_order.shuffle(&mut self.rng);
    }

    fn process_step(&mut self) {
        let Some(mut branch) = self.queue.pop_front() else {
            return;
        };

        let (raw_dx, raw_dy) = self.deltas(&branch);
        let mut dy = raw_dy;

        // Keep downward growth off the pot rows
        let max_y = self.rows as i32 - 1;
        if dy > 0 && branch.y > max_y - 2 {
            dy -= 1;
        }

        branch.dx = raw_dx;
        branch.dy = dy;
        branch.x += branch.dx;
        branch.y += branch.dy;
        branch.age += 1;
        branch.shoot_cooldown -= 1;

        if branch.x < 0
            || branch.x >= self.cols as i32
            || branch.y < 0
            || branch.y >= self.rows as i32
        {
            branch.life -= 1;
            if branch.life > 0 {
                self.queue.push_back(branch);
            }
            return;
        }

        let (ch, color) = self.branch_cell(branch.kind, raw_dx, raw_dy, branch.life);
        let is_leaf = branch.life < LEAF_LIFE_THRESHOLD
            || branch.kind == BranchType::Dying
            || branch.kind == BranchType::Dead;
        let idx = branch.y as usize * self.cols + branch.x as usize;
        // Leaves never overwrite wood: erasing structure mid-fall looks wrong
        let existing = self.grid[idx];
        if !is_leaf || existing.map_or(true, |c| c.is_leaf) {
            self.grid[idx] = Some(Cell { ch, color, is_leaf });
        }

        self.handle_branching(&mut branch);

        branch.life -= 1;
        if branch.life > 0 {
            self.queue.push_back(branch);
        }
    }

    fn handle_branching(&mut self, branch: &mut Branch) {
        let multiplier = self.config.multiplier;

        if branch.kind == BranchType::Trunk {
            let spawn_shoot = branch.shoot_cooldown <= 0
                && (self.rng.gen::<f32>() < SHOOT_SPAWN_CHANCE || branch.life % multiplier == 0);

            if spawn_shoot {
                self.spawn_shoot(branch);
                branch.shoot_cooldown = multiplier * COOLDOWN_MULTIPLIER;
            }

            if branch.life > TRUNK_FORK_MIN_LIFE && self.rng.gen::<f32>() < TRUNK_FORK_CHANCE {
                self.queue.push_back(*branch);
            }
        }

        let is_growing_kind = matches!(
            branch.kind,
            BranchType::Trunk | BranchType::ShootLeft | BranchType::ShootRight
        );
        if is_growing_kind && branch.life < multiplier + 2 {
            self.queue.push_back(Branch {
                age: 0,
                shoot_cooldown: 0,
                kind: BranchType::Dying,
                ..*branch
            });
        }

        if branch.kind == BranchType::Dying && branch.life < 3 {
            self.queue.push_back(Branch {
                age: 0,
                shoot_cooldown: 0,
                kind: BranchType::Dead,
                ..*branch
            });
        }
    }

    fn spawn_shoot(&mut self, parent: &Branch) {
        let kind = self.next_shoot_side;
        self.next_shoot_side = if kind == BranchType::ShootLeft {
            BranchType::ShootRight
        } else {
            BranchType::ShootLeft
        };

        self.queue.push_back(Branch {
            x: parent.x,
            y: parent.y,
            dx: parent.dx,
            dy: parent.dy,
            age: 0,
            life: parent.life + self.config.multiplier,
            shoot_cooldown: self.config.multiplier * COOLDOWN_MULTIPLIER,
            kind,
        });
    }

    /// Walk the shuffled leaf order up to the linearly paced target index,
    /// applying `apply` to each visited leaf.
    fn pace_leaves(&mut self, duration: f32, mut apply: impl FnMut(&mut Self, usize)) {
        let progress = (self.phase_timer / duration).min(1.0);
        let target = (progress * self.leaf_cells.len() as f32).floor() as usize;

        while self.leaf_progress < target && self.leaf_progress < self.leaf_cells.len() {
            let li = self.leaf_order[self.leaf_progress];
            apply(self, li);
            self.leaf_progress += 1;
        }
    }

    fn render_pot(&self, term: &mut Terminal, cols: usize, rows: usize) {
        let pot_x = cols as i32 / 2 - POT_WIDTH as i32 / 2;
        let pot_y = rows as i32 - POT_HEIGHT as i32;

        for (line_idx, line) in POT_LINES.iter().enumerate() {
            let row = pot_y + line_idx as i32;
            for (ci, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let accent = line_idx == 0 && (POT_ACCENT_START..POT_ACCENT_END).contains(&ci);
                let color = if accent {
                    self.config.bright_wood
                } else {
                    self.config.dark_wood
                };
                term.set(pot_x + ci as i32, row, ch, Some(color));
            }
        }
    }

    #[cfg(test)]
    fn phase(&self) -> &'static str {
        match self.phase {
            Phase::Growing => "growing",
            Phase::Holding => "holding",
            Phase::Browning => "browning",
            Phase::Falling => "falling",
            Phase::Bare => "bare",
            Phase::Regrowth => "regrowth",
        }
    }
}

impl Pattern for BonsaiPattern {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.accumulator = 0.0;
        self.phase = Phase::Growing;
        self.phase_timer = 0.0;
        self.leaf_cells.clear();
        self.leaf_order.clear();
        self.leaf_progress = 0;
        self.seed_all_trees();
    }

    fn update(&mut self, dt_ms: f32) {
        let dt_sec = dt_ms / 1000.0;

        self.promote_pending_trees(dt_ms);

        match self.phase {
            Phase::Growing => {
                self.accumulator += dt_ms;
                let step_interval = 1000.0 / self.config.growth_speed;

                while self.accumulator >= step_interval {
                    self.accumulator -= step_interval;
                    self.process_step();
                }

                if self.queue.is_empty() && self.pending_trees.is_empty() {
                    self.collect_leaf_cells();
                    self.phase = Phase::Holding;
                    self.phase_timer = 0.0;
                }
            }
            Phase::Holding => {
                self.phase_timer += dt_sec;
                if self.phase_timer >= self.config.hold_duration {
                    self.phase = Phase::Browning;
                    self.phase_timer = 0.0;
                    self.leaf_progress = 0;
                }
            }
            Phase::Browning => {
                self.phase_timer += dt_sec;
                let cols = self.cols;
                self.pace_leaves(BROWNING_DURATION, |this, li| {
                    let leaf = &this.leaf_cells[li];
                    let idx = leaf.row * cols + leaf.col;
                    let autumn = AUTUMN_PALETTE[this.rng.gen_range(0..AUTUMN_PALETTE.len())];
                    if let Some(cell) = this.grid[idx].as_mut() {
                        if cell.is_leaf {
                            cell.color = autumn;
                        }
                    }
                });

                if self.phase_timer >= BROWNING_DURATION {
                    self.phase = Phase::Falling;
                    self.phase_timer = 0.0;
                    self.reshuffle_leaf_order();
                }
            }
            Phase::Falling => {
                self.phase_timer += dt_sec;
                let cols = self.cols;
                self.pace_leaves(FALLING_DURATION, |this, li| {
                    let leaf = &this.leaf_cells[li];
                    let idx = leaf.row * cols + leaf.col;
                    if this.grid[idx].map_or(false, |c| c.is_leaf) {
                        this.grid[idx] = None;
                    }
                });

                if self.phase_timer >= FALLING_DURATION {
                    self.phase = Phase::Bare;
                    self.phase_timer = 0.0;
                }
            }
            Phase::Bare => {
                self.phase_timer += dt_sec;
                if self.phase_timer >= BARE_DURATION {
                    self.phase = Phase::Regrowth;
                    self.phase_timer = 0.0;
                    self.reshuffle_leaf_order();
                }
            }
            Phase::Regrowth => {
                self.phase_timer += dt_sec;
                let cols = self.cols;
                self.pace_leaves(REGROWTH_DURATION, |this, li| {
                    let leaf = &this.leaf_cells[li];
                    let idx = leaf.row * cols + leaf.col;
                    if this.grid[idx].is_none() {
                        this.grid[idx] = Some(Cell {
                            ch: LEAF_CHAR,
                            color: leaf.original_color,
                            is_leaf: true,
                        });
                    }
                });

                if self.phase_timer >= REGROWTH_DURATION {
                    self.phase = Phase::Holding;
                    self.phase_timer = 0.0;
                }
            }
        }
    }

    fn render(&self, term: &mut Terminal, cols: usize, rows: usize) {
        for row in 0..rows.min(self.rows) {
            for col in 0..cols.min(self.cols) {
                if let Some(cell) = self.grid[row * self.cols + col] {
                    term.set(col as i32, row as i32, cell.ch, Some(cell.color));
                }
            }
        }

        self.render_pot(term, cols, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonsai_with_seed(seed: u64) -> BonsaiPattern {
        let mut pattern = BonsaiPattern::new(BonsaiConfig {
            seed: Some(seed),
            ..BonsaiConfig::default()
        });
        pattern.init(100, 30);
        pattern
    }

    /// Advance with 16ms frames until the predicate holds or the step
    /// budget is exhausted.
    fn run_until(
        pattern: &mut BonsaiPattern,
        max_frames: usize,
        mut done: impl FnMut(&BonsaiPattern) -> bool,
    ) -> bool {
        for _ in 0..max_frames {
            pattern.update(16.0);
            if done(pattern) {
                return true;
            }
        }
        false
    }

    #[test]
    fn queue_drains_within_bounded_steps() {
        let mut bonsai = bonsai_with_seed(21);
        // Life decrements monotonically, so growth must terminate well
        // within a couple of minutes of simulated time.
        let reached = run_until(&mut bonsai, 20_000, |b| b.phase() == "holding");
        assert!(reached, "growth never terminated");
        assert!(bonsai.queue.is_empty());
        assert!(bonsai.pending_trees.is_empty());
    }

    #[test]
    fn phase_cycle_visits_every_phase_in_order() {
        let mut bonsai = bonsai_with_seed(7);
        let expected = ["holding", "browning", "falling", "bare", "regrowth", "holding"];
        for want in expected {
            let reached = run_until(&mut bonsai, 40_000, |b| b.phase() == want);
            assert!(reached, "never reached phase {want}");
        }
    }

    #[test]
    fn leaf_registry_captured_once() {
        let mut bonsai = bonsai_with_seed(13);
        assert!(run_until(&mut bonsai, 20_000, |b| b.phase() == "holding"));
        let count = bonsai.leaf_cells.len();
        assert!(count > 0, "a grown tree should have leaves");
        // Registry survives the whole season unchanged
        assert!(run_until(&mut bonsai, 60_000, |b| b.phase() == "bare"));
        assert_eq!(bonsai.leaf_cells.len(), count);
    }

    #[test]
    fn wood_is_never_overwritten_by_leaf() {
        let mut bonsai = bonsai_with_seed(3);
        assert!(run_until(&mut bonsai, 20_000, |b| b.phase() == "holding"));

        // After falling completes, only leaves were removed; wood cells stay
        let wood_before: Vec<usize> = bonsai
            .grid
            .iter()
            .enumerate()
            .filter(|(_, c)| c.map_or(false, |c| !c.is_leaf))
            .map(|(i, _)| i)
            .collect();
        assert!(run_until(&mut bonsai, 60_000, |b| b.phase() == "bare"));
        for idx in wood_before {
            assert!(
                bonsai.grid[idx].map_or(false, |c| !c.is_leaf),
                "wood cell vanished during leaf fall"
            );
        }
    }

    #[test]
    fn regrowth_restores_original_colors() {
        let mut bonsai = bonsai_with_seed(17);
        assert!(run_until(&mut bonsai, 20_000, |b| b.phase() == "holding"));
        assert!(run_until(&mut bonsai, 80_000, |b| b.phase() == "regrowth"));
        // Finish regrowth back into holding
        assert!(run_until(&mut bonsai, 20_000, |b| b.phase() == "holding"));

        for leaf in &bonsai.leaf_cells {
            let cell = bonsai.grid[leaf.row * bonsai.cols + leaf.col];
            if let Some(cell) = cell {
                if cell.is_leaf {
                    assert_eq!(cell.color, leaf.original_color);
                }
            }
        }
    }

    #[test]
    fn pot_clips_on_narrow_grids() {
        let mut bonsai = bonsai_with_seed(2);
        bonsai.init(10, 6);
        let mut term = Terminal::headless(10, 6);
        bonsai.render(&mut term, 10, 6);
    }
}
