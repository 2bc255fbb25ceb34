mod engine;
mod metrics;
mod noise;
mod pattern;
mod terminal;
mod weather;

use clap::{Parser, Subcommand};
use crossterm::style::Color;
use engine::Engine;
use pattern::aurora::{AuroraConfig, AuroraPalette, AuroraPattern};
use pattern::bonsai::{BonsaiConfig, BonsaiPattern};
use pattern::fire::{FireCharset, FireConfig, FireMode, FirePalette, FirePattern};
use pattern::rain::RainPattern;
use pattern::snow::{SnowConfig, SnowPattern};
use pattern::waves::{WaveConfig, WavePalette, WavePattern};
use pattern::Pattern;
use std::io;
use terminal::{rgb, Terminal};
use weather::WeatherPattern;

#[derive(Parser)]
#[command(name = "asciiscape")]
#[command(version = "0.2.0")]
#[command(about = "Procedural ASCII animations for the terminal", long_about = None)]
struct Cli {
    /// Frames per second for the render loop
    #[arg(short, long, default_value = "30", global = true)]
    fps: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flame simulation (wall of fire, campfire, torch, or candles)
    Fire {
        /// Fire shape
        #[arg(short, long, value_enum, default_value = "wall")]
        mode: FireMode,

        /// Fuel heat (1-10)
        #[arg(short, long, default_value = "7")]
        intensity: f32,

        /// Cooling rate; higher means shorter flames (0.5-3.0)
        #[arg(short, long, default_value = "1.0")]
        decay: f32,

        /// Randomness in cooling (1-10)
        #[arg(short = 'T', long, default_value = "5")]
        turbulence: f32,

        /// Horizontal drift bias (-5..5)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        wind: f32,

        /// Fuel row depth (1-5)
        #[arg(long, default_value = "1")]
        thickness: usize,

        /// Simulation ticks per second
        #[arg(long, default_value = "25")]
        sim_fps: f32,

        #[arg(short, long, value_enum, default_value = "classic")]
        palette: FirePalette,

        #[arg(short, long, value_enum, default_value = "classic")]
        charset: FireCharset,

        /// Slow breathing of the fuel intensity
        #[arg(long)]
        pulse: bool,

        /// Disable rising embers
        #[arg(long)]
        no_embers: bool,

        /// Disable spark bursts
        #[arg(long)]
        no_sparks: bool,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// A bonsai tree that grows, sheds its leaves, and regrows
    Bonsai {
        /// Branch steps per second
        #[arg(short, long, default_value = "33")]
        growth_speed: f32,

        /// Seconds of full foliage before autumn sets in
        #[arg(short = 'H', long, default_value = "45")]
        hold: f32,

        /// Initial branch life (higher = bigger tree)
        #[arg(short = 'L', long, default_value = "36")]
        life: i32,

        /// Branch multiplier (higher = bushier)
        #[arg(short = 'M', long, default_value = "5")]
        multiplier: i32,

        /// Wood colors as dark,bright hex pair
        #[arg(long, default_value = "8b6914,d4a017", value_parser = parse_color_pair)]
        wood: (Color, Color),

        /// Leaf colors as dark,bright hex pair
        #[arg(long, default_value = "2d8a2d,4abb4a", value_parser = parse_color_pair)]
        leaf: (Color, Color),

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Digital rain with fading trails and splashes
    Rain {
        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Drifting snowfall in two depth layers
    Snow {
        /// Flakes per column (0.1-2.0)
        #[arg(short, long, default_value = "0.4")]
        density: f32,

        /// Sideways sway strength (0-3)
        #[arg(long, default_value = "1")]
        sway: f32,

        /// Constant sideways drift (-3..3)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        wind: f32,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Layered ocean waves
    Waves {
        /// Wave height (0.1-2.0)
        #[arg(short, long, default_value = "0.8")]
        amplitude: f32,

        /// Noise-driven surface roughness (0-1)
        #[arg(short, long, default_value = "0.3")]
        choppiness: f32,

        /// Horizontal wave density (0.5-4.0)
        #[arg(short = 'F', long, default_value = "1.5")]
        frequency: f32,

        /// Scroll speed multiplier
        #[arg(short, long, default_value = "1.0")]
        speed: f32,

        #[arg(short, long, value_enum, default_value = "ocean")]
        palette: WavePalette,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Northern lights from drifting fractal noise
    Aurora {
        /// Horizontal noise scale
        #[arg(long, default_value = "0.03")]
        scale_x: f32,

        /// Vertical noise scale
        #[arg(long, default_value = "0.08")]
        scale_y: f32,

        /// Drift speed
        #[arg(short, long, default_value = "0.4")]
        speed: f32,

        /// Visibility cutoff (0-0.9)
        #[arg(short, long, default_value = "0.3")]
        threshold: f32,

        #[arg(short, long, value_enum, default_value = "aurora")]
        palette: AuroraPalette,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Animated yard diorama driven by live weather conditions
    Weather {
        /// Latitude for the weather lookup
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude for the weather lookup
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn parse_hex_color(s: &str) -> Result<Color, String> {
    let s = s.trim_start_matches('#');
    if s.len() != 6 {
        return Err(format!("expected RRGGBB hex color, got '{s}'"));
    }
    let v = u32::from_str_radix(s, 16).map_err(|e| e.to_string())?;
    Ok(rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
}

fn parse_color_pair(s: &str) -> Result<(Color, Color), String> {
    match s.split_once(',') {
        Some((dark, bright)) => Ok((parse_hex_color(dark)?, parse_hex_color(bright)?)),
        None => Err(format!("expected dark,bright color pair, got '{s}'")),
    }
}

fn build_pattern(command: Commands) -> Box<dyn Pattern> {
    match command {
        Commands::Fire {
            mode,
            intensity,
            decay,
            turbulence,
            wind,
            thickness,
            sim_fps,
            palette,
            charset,
            pulse,
            no_embers,
            no_sparks,
            seed,
        } => Box::new(FirePattern::new(FireConfig {
            mode,
            intensity: intensity.clamp(1.0, 10.0),
            decay: decay.clamp(0.5, 3.0),
            turbulence: turbulence.clamp(1.0, 10.0),
            wind: wind.clamp(-5.0, 5.0),
            thickness: thickness.clamp(1, 5),
            fps: sim_fps.clamp(1.0, 60.0),
            palette,
            charset,
            pulse,
            embers: !no_embers,
            sparks: !no_sparks,
            seed,
        })),
        Commands::Bonsai {
            growth_speed,
            hold,
            life,
            multiplier,
            wood,
            leaf,
            seed,
        } => Box::new(BonsaiPattern::new(BonsaiConfig {
            growth_speed: growth_speed.clamp(1.0, 200.0),
            hold_duration: hold.max(0.0),
            life: life.clamp(4, 200),
            multiplier: multiplier.clamp(1, 20),
            dark_wood: wood.0,
            bright_wood: wood.1,
            dark_leaf: leaf.0,
            bright_leaf: leaf.1,
            seed,
        })),
        Commands::Rain { seed } => Box::new(RainPattern::new(seed)),
        Commands::Snow {
            density,
            sway,
            wind,
            seed,
        } => Box::new(SnowPattern::new(SnowConfig {
            density: density.clamp(0.1, 2.0),
            speed_range: (1.0, 4.0),
            sway_amount: sway.clamp(0.0, 3.0),
            wind: wind.clamp(-3.0, 3.0),
            seed,
        })),
        Commands::Waves {
            amplitude,
            choppiness,
            frequency,
            speed,
            palette,
            seed,
        } => Box::new(WavePattern::new(WaveConfig {
            amplitude: amplitude.clamp(0.1, 2.0),
            choppiness: choppiness.clamp(0.0, 1.0),
            frequency: frequency.clamp(0.5, 4.0),
            speed: speed.clamp(0.1, 5.0),
            palette,
            seed,
        })),
        Commands::Aurora {
            scale_x,
            scale_y,
            speed,
            threshold,
            palette,
            seed,
        } => Box::new(AuroraPattern::new(AuroraConfig {
            scale_x: scale_x.clamp(0.005, 0.2),
            scale_y: scale_y.clamp(0.005, 0.4),
            speed: speed.clamp(0.05, 3.0),
            threshold: threshold.clamp(0.0, 0.9),
            palette,
            seed,
        })),
        Commands::Weather { lat, lng, seed } => {
            let location = lat.zip(lng);
            Box::new(WeatherPattern::new(
                location,
                seed.unwrap_or_else(engine::clock_seed),
            ))
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let pattern = build_pattern(cli.command);

    let term = Terminal::new()?;
    let mut engine = Engine::new(term, cli.fps.clamp(1, 120));
    engine.set_pattern(pattern);
    engine.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_with_and_without_hash() {
        assert_eq!(parse_hex_color("8b6914").unwrap(), rgb(0x8b, 0x69, 0x14));
        assert_eq!(parse_hex_color("#d4a017").unwrap(), rgb(0xd4, 0xa0, 0x17));
        assert!(parse_hex_color("xyz").is_err());
        assert!(parse_hex_color("12345").is_err());
    }

    #[test]
    fn color_pairs_need_a_comma() {
        assert!(parse_color_pair("2d8a2d,4abb4a").is_ok());
        assert!(parse_color_pair("2d8a2d").is_err());
    }

    #[test]
    fn cli_parses_every_subcommand() {
        for args in [
            vec!["asciiscape", "fire", "--mode", "campfire", "--pulse"],
            vec!["asciiscape", "bonsai", "-L", "40", "-s", "7"],
            vec!["asciiscape", "rain"],
            vec!["asciiscape", "snow", "--wind", "-1.5"],
            vec!["asciiscape", "waves", "-p", "mono"],
            vec!["asciiscape", "aurora", "--threshold", "0.5"],
            vec!["asciiscape", "weather", "--lat", "51.5", "--lng", "-0.1"],
        ] {
            assert!(Cli::try_parse_from(args).is_ok());
        }
    }

    #[test]
    fn weather_location_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["asciiscape", "weather", "--lat", "51.5"]).is_err());
    }
}
