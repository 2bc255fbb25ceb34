//! Weather diorama: a yard scene whose sub-simulations switch on and off
//! to match live conditions from Open-Meteo.
//!
//! Every subsystem is initialised up front so a condition change only has
//! to flip its active flag. Render order is fixed back-to-front; later
//! systems paint over earlier ones.

pub mod service;
pub mod systems;

use crate::pattern::Pattern;
use crate::terminal::{rgb, Terminal};
use service::{Condition, WeatherData, WeatherService, DEFAULT_WEATHER};
use std::sync::mpsc;

/// One layer of the diorama. `configure` is re-run on every weather change;
/// systems that don't care about conditions keep the no-op default.
pub trait WeatherSystem {
    fn init(&mut self, cols: usize, rows: usize);
    fn update(&mut self, dt_ms: f32);
    fn render(&self, term: &mut Terminal, cols: usize, rows: usize);
    fn configure(&mut self, _weather: &WeatherData) {}
    /// True on the one frame a whole-screen flash should be painted.
    fn flash_overlay(&self) -> bool {
        false
    }
}

const POLL_INTERVAL: f32 = 15.0 * 60.0;

// Indices into the systems vec, in back-to-front render order.
const SCENE: usize = 0;
const STARS: usize = 1;
const MOON: usize = 2;
const SUN: usize = 3;
const SMOKE: usize = 4;
const CLOUDS: usize = 5;
const BIRDS: usize = 6;
const AIRPLANE: usize = 7;
const RAIN: usize = 8;
const SNOW: usize = 9;
const LEAVES: usize = 10;
const FOG: usize = 11;
const FIREFLIES: usize = 12;
const LIGHTNING: usize = 13;
const SYSTEM_COUNT: usize = 14;

fn clear_skies(condition: Condition) -> bool {
    matches!(condition, Condition::Clear | Condition::PartlyCloudy)
}

fn has_rain(condition: Condition) -> bool {
    matches!(
        condition,
        Condition::Drizzle | Condition::Rain | Condition::HeavyRain | Condition::Thunderstorm
    )
}

/// Which layers a given set of conditions turns on.
fn activation(weather: &WeatherData) -> [bool; SYSTEM_COUNT] {
    let mut active = [false; SYSTEM_COUNT];
    active[SCENE] = true;
    active[CLOUDS] = true;
    active[LEAVES] = true;
    active[AIRPLANE] = true;
    active[STARS] = !weather.is_day;
    active[MOON] = !weather.is_day;
    active[SUN] = weather.is_day && clear_skies(weather.condition);
    active[SMOKE] = !has_rain(weather.condition);
    active[BIRDS] = weather.is_day && clear_skies(weather.condition);
    active[FIREFLIES] =
        !weather.is_day && weather.temperature > 15.0 && clear_skies(weather.condition);
    active[RAIN] = has_rain(weather.condition);
    active[SNOW] = matches!(weather.condition, Condition::Snow | Condition::HeavySnow);
    active[FOG] = weather.condition == Condition::Fog;
    active[LIGHTNING] = weather.condition == Condition::Thunderstorm;
    active
}

pub struct WeatherPattern {
    systems: Vec<Box<dyn WeatherSystem>>,
    active: [bool; SYSTEM_COUNT],
    service: Option<WeatherService>,
    weather: WeatherData,
    pending: Option<mpsc::Receiver<WeatherData>>,
    poll_timer: f32,
    initial_fetch_done: bool,
    cols: usize,
    rows: usize,
}

impl WeatherPattern {
    pub fn new(location: Option<(f64, f64)>, seed: u64) -> Self {
        let s = |i: usize| seed.wrapping_add(i as u64).wrapping_mul(0x9e3779b97f4a7c15);
        let systems: Vec<Box<dyn WeatherSystem>> = vec![
            Box::new(systems::scene::SceneSystem::new()),
            Box::new(systems::stars::StarsSystem::new(s(STARS))),
            Box::new(systems::moon::MoonSystem::new()),
            Box::new(systems::sun::SunSystem::new()),
            Box::new(systems::smoke::SmokeSystem::new(s(SMOKE))),
            Box::new(systems::clouds::CloudSystem::new(s(CLOUDS))),
            Box::new(systems::birds::BirdSystem::new(s(BIRDS))),
            Box::new(systems::airplane::AirplaneSystem::new(s(AIRPLANE))),
            Box::new(systems::rain::RainSystem::new(s(RAIN))),
            Box::new(systems::snow::SnowSystem::new(s(SNOW))),
            Box::new(systems::leaves::LeavesSystem::new(s(LEAVES))),
            Box::new(systems::fog::FogSystem::new(s(FOG))),
            Box::new(systems::fireflies::FireflySystem::new(s(FIREFLIES))),
            Box::new(systems::lightning::LightningSystem::new(s(LIGHTNING))),
        ];

        // The scene and its calm-night dressing show before the first fetch
        // resolves.
        let mut active = [false; SYSTEM_COUNT];
        for i in [SCENE, STARS, MOON, SMOKE, CLOUDS, LEAVES, AIRPLANE] {
            active[i] = true;
        }

        Self {
            systems,
            active,
            service: location.map(|(lat, lng)| WeatherService::new(lat, lng)),
            weather: DEFAULT_WEATHER,
            pending: None,
            // Pre-armed so the first update kicks off a fetch immediately.
            poll_timer: POLL_INTERVAL,
            initial_fetch_done: false,
            cols: 0,
            rows: 0,
        }
    }

    fn apply_weather(&mut self, weather: WeatherData) {
        self.weather = weather;
        self.active = activation(&weather);
        for system in &mut self.systems {
            system.configure(&weather);
        }
    }

    fn poll_fetch(&mut self, dt_ms: f32) {
        self.poll_timer += dt_ms / 1000.0;
        if !self.initial_fetch_done || self.poll_timer >= POLL_INTERVAL {
            self.poll_timer = 0.0;
            self.initial_fetch_done = true;
            match &self.service {
                Some(service) => self.pending = Some(service.spawn_fetch()),
                None => self.apply_weather(DEFAULT_WEATHER),
            }
        }

        if let Some(received) = self.pending.as_ref().map(|rx| rx.try_recv()) {
            match received {
                Ok(weather) => {
                    self.pending = None;
                    self.apply_weather(weather);
                }
                Err(mpsc::TryRecvError::Empty) => {}
                // Fetch failed; keep whatever snapshot we already have.
                Err(mpsc::TryRecvError::Disconnected) => self.pending = None,
            }
        }
    }
}

impl Pattern for WeatherPattern {
    fn init(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        for system in &mut self.systems {
            system.init(cols, rows);
            system.configure(&self.weather);
        }
    }

    fn update(&mut self, dt_ms: f32) {
        self.poll_fetch(dt_ms);
        for (system, active) in self.systems.iter_mut().zip(self.active) {
            if active {
                system.update(dt_ms);
            }
        }
    }

    fn render(&self, term: &mut Terminal, cols: usize, rows: usize) {
        for (system, active) in self.systems.iter().zip(self.active) {
            if active {
                system.render(term, cols, rows);
            }
        }

        if self.active[LIGHTNING] && self.systems[LIGHTNING].flash_overlay() {
            render_flash(term, cols, rows);
        }
    }

    fn dispose(&mut self) {
        self.pending = None;
    }
}

/// A terminal has no brightness channel, so the strike frame is a sparse
/// white speckle over everything already painted.
fn render_flash(term: &mut Terminal, cols: usize, rows: usize) {
    for y in 0..rows {
        for x in 0..cols {
            let h = (x as u32).wrapping_mul(31).wrapping_add((y as u32).wrapping_mul(17));
            if h % 7 == 0 {
                term.set(x as i32, y as i32, '█', Some(rgb(255, 255, 240)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(condition: Condition, is_day: bool, temperature: f32) -> WeatherData {
        WeatherData {
            condition,
            temperature,
            wind_speed: 10.0,
            wind_direction: 90.0,
            is_day,
            precipitation: 0.0,
        }
    }

    #[test]
    fn thunderstorm_turns_on_rain_and_lightning() {
        let active = activation(&snapshot(Condition::Thunderstorm, false, 18.0));
        assert!(active[RAIN]);
        assert!(active[LIGHTNING]);
        assert!(!active[SNOW]);
        assert!(!active[SMOKE]);
        assert!(!active[FIREFLIES]);
    }

    #[test]
    fn warm_clear_night_gets_stars_moon_and_fireflies() {
        let active = activation(&snapshot(Condition::Clear, false, 20.0));
        assert!(active[STARS]);
        assert!(active[MOON]);
        assert!(active[FIREFLIES]);
        assert!(!active[SUN]);
        assert!(!active[BIRDS]);
    }

    #[test]
    fn cold_night_has_no_fireflies() {
        let active = activation(&snapshot(Condition::Clear, false, 10.0));
        assert!(!active[FIREFLIES]);
    }

    #[test]
    fn clear_day_gets_sun_and_birds() {
        let active = activation(&snapshot(Condition::PartlyCloudy, true, 22.0));
        assert!(active[SUN]);
        assert!(active[BIRDS]);
        assert!(!active[STARS]);
        assert!(!active[MOON]);
    }

    #[test]
    fn snow_and_fog_are_exclusive_to_their_conditions() {
        let active = activation(&snapshot(Condition::HeavySnow, true, -5.0));
        assert!(active[SNOW]);
        assert!(!active[RAIN]);

        let active = activation(&snapshot(Condition::Fog, true, 5.0));
        assert!(active[FOG]);
        assert!(!active[SUN]);
    }

    #[test]
    fn no_location_applies_the_default_snapshot() {
        let mut pattern = WeatherPattern::new(None, 42);
        pattern.init(80, 24);
        pattern.update(16.0);
        assert!(pattern.initial_fetch_done);
        assert!(pattern.pending.is_none());
        assert!(pattern.active[STARS]);
        assert!(pattern.active[FIREFLIES]);
    }

    #[test]
    fn scene_is_always_active() {
        for condition in [
            Condition::Clear,
            Condition::Overcast,
            Condition::HeavyRain,
            Condition::Thunderstorm,
            Condition::HeavySnow,
            Condition::Fog,
        ] {
            for is_day in [false, true] {
                let active = activation(&snapshot(condition, is_day, 15.0));
                assert!(active[SCENE]);
                assert!(active[CLOUDS]);
                assert!(active[AIRPLANE]);
            }
        }
    }

    #[test]
    fn update_and_render_run_without_a_network() {
        let mut pattern = WeatherPattern::new(None, 7);
        pattern.init(100, 30);
        let mut term = Terminal::headless(100, 30);
        for _ in 0..120 {
            pattern.update(16.0);
            pattern.render(&mut term, 100, 30);
        }
    }
}
