//! Current-conditions lookup against the Open-Meteo forecast API.
//!
//! Fetches run on a spawned thread and deliver over an mpsc channel, so the
//! render loop never blocks on the network. A failed fetch simply drops the
//! sending half; the orchestrator keeps whatever data it already has.

use serde::Deserialize;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    HeavySnow,
    Thunderstorm,
}

#[derive(Clone, Copy, Debug)]
pub struct WeatherData {
    pub condition: Condition,
    pub temperature: f32,
    pub wind_speed: f32,
    pub wind_direction: f32,
    pub is_day: bool,
    pub precipitation: f32,
}

/// Snapshot used when no location was supplied: a calm clear night.
pub const DEFAULT_WEATHER: WeatherData = WeatherData {
    condition: Condition::Clear,
    temperature: 20.0,
    wind_speed: 5.0,
    wind_direction: 0.0,
    is_day: false,
    precipitation: 0.0,
};

/// WMO weather interpretation codes, as reported by Open-Meteo.
/// Unknown codes read as clear rather than erroring.
pub fn map_wmo_code(code: u32) -> Condition {
    match code {
        0 => Condition::Clear,
        1 | 2 => Condition::PartlyCloudy,
        3 => Condition::Overcast,
        45 | 48 => Condition::Fog,
        51 | 53 | 55 => Condition::Drizzle,
        56 | 57 | 61 | 63 | 66 | 67 => Condition::Rain,
        65 | 80 | 81 | 82 => Condition::HeavyRain,
        71 | 73 | 77 | 85 => Condition::Snow,
        75 | 86 => Condition::HeavySnow,
        95 | 96 | 99 => Condition::Thunderstorm,
        _ => Condition::Clear,
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f32,
    windspeed: f32,
    winddirection: f32,
    weathercode: u32,
    is_day: u8,
}

pub struct WeatherService {
    lat: f64,
    lng: f64,
}

impl WeatherService {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Start a fetch on a background thread. On failure the sender is
    /// dropped without sending, which the receiver observes as a
    /// disconnect. Dropping the receiver makes a late completion a no-op.
    pub fn spawn_fetch(&self) -> mpsc::Receiver<WeatherData> {
        let (tx, rx) = mpsc::channel();
        let (lat, lng) = (self.lat, self.lng);
        thread::spawn(move || {
            if let Ok(data) = fetch_current(lat, lng) {
                let _ = tx.send(data);
            }
        });
        rx
    }
}

fn fetch_current(lat: f64, lng: f64) -> io::Result<WeatherData> {
    let url = format!(
        "https://api.open-meteo.com/v1/forecast?latitude={lat}&longitude={lng}&current_weather=true"
    );
    let response: ForecastResponse = ureq::get(&url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
        .into_json()?;

    let cw = response.current_weather;
    Ok(WeatherData {
        condition: map_wmo_code(cw.weathercode),
        temperature: cw.temperature,
        wind_speed: cw.windspeed,
        wind_direction: cw.winddirection,
        is_day: cw.is_day == 1,
        precipitation: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wmo_codes_map_to_conditions() {
        assert_eq!(map_wmo_code(0), Condition::Clear);
        assert_eq!(map_wmo_code(2), Condition::PartlyCloudy);
        assert_eq!(map_wmo_code(3), Condition::Overcast);
        assert_eq!(map_wmo_code(48), Condition::Fog);
        assert_eq!(map_wmo_code(55), Condition::Drizzle);
        assert_eq!(map_wmo_code(63), Condition::Rain);
        assert_eq!(map_wmo_code(82), Condition::HeavyRain);
        assert_eq!(map_wmo_code(77), Condition::Snow);
        assert_eq!(map_wmo_code(86), Condition::HeavySnow);
        assert_eq!(map_wmo_code(95), Condition::Thunderstorm);
    }

    #[test]
    fn unknown_codes_read_as_clear() {
        assert_eq!(map_wmo_code(42), Condition::Clear);
        assert_eq!(map_wmo_code(999), Condition::Clear);
    }

    #[test]
    fn forecast_payload_deserializes() {
        let payload = r#"{
            "latitude": 51.5,
            "longitude": -0.12,
            "current_weather": {
                "temperature": 14.2,
                "windspeed": 11.5,
                "winddirection": 230.0,
                "weathercode": 61,
                "is_day": 1,
                "time": "2025-03-01T12:00"
            }
        }"#;
        let response: ForecastResponse = serde_json::from_str(payload).unwrap();
        let cw = response.current_weather;
        assert_eq!(map_wmo_code(cw.weathercode), Condition::Rain);
        assert_eq!(cw.is_day, 1);
        assert_eq!(cw.temperature, 14.2);
    }

    #[test]
    fn default_snapshot_is_a_calm_clear_night() {
        assert_eq!(DEFAULT_WEATHER.condition, Condition::Clear);
        assert!(!DEFAULT_WEATHER.is_day);
        assert_eq!(DEFAULT_WEATHER.wind_speed, 5.0);
    }
}
