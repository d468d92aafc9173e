use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::models::{DailyForecast, ReportWindow, WeatherSnapshot};

/// Seed for the synthetic fallback snapshot. Fixed so that degraded reports
/// stay reproducible run to run.
const SYNTHETIC_SEED: u64 = 0x5EED_FA12;

/// Fetches current conditions and a short forecast from an Open-Meteo style
/// provider. Weather is an enrichment signal only: absent coordinates or any
/// provider failure yield a synthetic snapshot instead of an error, so the
/// report pipeline always makes forward progress.
#[derive(Clone)]
pub struct WeatherService {
    client: reqwest::Client,
    base_url: String,
}

impl WeatherService {
    pub fn new(base_url: String, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Single best-effort attempt per report generation; no retries.
    pub async fn fetch(&self, coords: Option<(f64, f64)>, window: &ReportWindow) -> WeatherSnapshot {
        let days = window.forecast_days();
        let today = Utc::now().date_naive();

        let (lat, lon) = match coords {
            Some(c) => c,
            None => {
                tracing::info!("no coordinates on farm; using synthetic weather");
                return synthetic_snapshot(today, days);
            }
        };

        match self.fetch_provider(lat, lon, days).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("weather provider failed: {:#}; using synthetic weather", e);
                synthetic_snapshot(today, days)
            }
        }
    }

    async fn fetch_provider(&self, lat: f64, lon: f64, days: u32) -> anyhow::Result<WeatherSnapshot> {
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current_weather", "true".to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max,relative_humidity_2m_mean"
                        .to_string(),
                ),
                ("forecast_days", days.to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("provider returned status {}", status);
        }

        let body: ProviderResponse = resp.json().await?;
        snapshot_from_provider(&body)
            .ok_or_else(|| anyhow::anyhow!("provider response missing daily data"))
    }
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    current_weather: Option<ProviderCurrent>,
    daily: Option<ProviderDaily>,
}

#[derive(Debug, Deserialize)]
struct ProviderCurrent {
    temperature: f64,
    windspeed: f64,
    weathercode: i64,
}

#[derive(Debug, Deserialize)]
struct ProviderDaily {
    time: Vec<NaiveDate>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
    #[serde(default)]
    windspeed_10m_max: Vec<f64>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<f64>,
}

fn snapshot_from_provider(body: &ProviderResponse) -> Option<WeatherSnapshot> {
    let daily = body.daily.as_ref()?;
    if daily.time.is_empty()
        || daily.temperature_2m_max.is_empty()
        || daily.temperature_2m_min.is_empty()
    {
        return None;
    }

    let t_max = daily.temperature_2m_max[0];
    let t_min = daily.temperature_2m_min[0];
    let precipitation = daily.precipitation_sum.first().copied().unwrap_or(0.0);
    let humidity = daily.relative_humidity_2m_mean.first().copied().unwrap_or(60.0);

    let (temperature_avg, wind_kph, code) = match &body.current_weather {
        Some(current) => (current.temperature, current.windspeed, current.weathercode),
        None => (
            (t_max + t_min) / 2.0,
            daily.windspeed_10m_max.first().copied().unwrap_or(0.0),
            if precipitation > 0.0 { 61 } else { 1 },
        ),
    };

    let forecast = daily
        .time
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, date)| DailyForecast {
            date: *date,
            temperature_min: daily.temperature_2m_min.get(i).copied().unwrap_or(t_min),
            temperature_max: daily.temperature_2m_max.get(i).copied().unwrap_or(t_max),
            precipitation_mm: daily.precipitation_sum.get(i).copied().unwrap_or(0.0),
            condition: condition_text(if daily.precipitation_sum.get(i).copied().unwrap_or(0.0) > 0.0 {
                61
            } else {
                1
            })
            .to_string(),
        })
        .collect();

    Some(WeatherSnapshot {
        date: daily.time[0],
        temperature_avg,
        temperature_min: t_min,
        temperature_max: t_max,
        humidity_percent: humidity,
        precipitation_mm: precipitation,
        wind_kph,
        condition: condition_text(code).to_string(),
        synthetic: false,
        forecast,
    })
}

/// WMO weather interpretation codes, reduced to the buckets we report on.
fn condition_text(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1..=2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 | 80..=82 => "Rain",
        71..=77 | 85..=86 => "Snow",
        95..=99 => "Thunderstorm",
        _ => "Unknown",
    }
}

/// Internally consistent stand-in reading. Values are drawn from a fixed seed
/// inside the neutral band of the weather score: temperature well off the
/// ideal midpoint, no precipitation, wind under the penalty threshold.
pub fn synthetic_snapshot(date: NaiveDate, forecast_days: u32) -> WeatherSnapshot {
    let mut rng = StdRng::seed_from_u64(SYNTHETIC_SEED);

    let temperature_avg = round1(rng.gen_range(6.0..12.0));
    let spread = round1(rng.gen_range(3.0..5.0));
    let humidity = round1(rng.gen_range(55.0..75.0));
    let wind = round1(rng.gen_range(5.0..18.0));

    let forecast = (1..forecast_days.max(1))
        .map(|i| DailyForecast {
            date: date + Duration::days(i as i64),
            temperature_min: round1(temperature_avg - spread + rng.gen_range(-1.0..1.0)),
            temperature_max: round1(temperature_avg + spread + rng.gen_range(-1.0..1.0)),
            precipitation_mm: 0.0,
            condition: "Partly cloudy".to_string(),
        })
        .collect();

    WeatherSnapshot {
        date,
        temperature_avg,
        temperature_min: round1(temperature_avg - spread),
        temperature_max: round1(temperature_avg + spread),
        humidity_percent: humidity,
        precipitation_mm: 0.0,
        wind_kph: wind,
        condition: "Partly cloudy".to_string(),
        synthetic: true,
        forecast,
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    #[test]
    fn test_synthetic_snapshot_is_deterministic() {
        let a = synthetic_snapshot(date(), 3);
        let b = synthetic_snapshot(date(), 3);
        assert_eq!(a.temperature_avg, b.temperature_avg);
        assert_eq!(a.wind_kph, b.wind_kph);
        assert_eq!(a.humidity_percent, b.humidity_percent);
        assert!(a.synthetic);
    }

    #[test]
    fn test_synthetic_snapshot_is_internally_consistent() {
        let snap = synthetic_snapshot(date(), 5);
        assert!(snap.temperature_min < snap.temperature_avg);
        assert!(snap.temperature_avg < snap.temperature_max);
        assert_eq!(snap.precipitation_mm, 0.0);
        assert!(snap.wind_kph < 20.0);
        assert!((6.0..12.0).contains(&snap.temperature_avg));
        assert_eq!(snap.forecast.len(), 4);
        assert_eq!(snap.forecast[0].date, date() + Duration::days(1));
    }

    #[test]
    fn test_provider_parse_happy_path() {
        let body: ProviderResponse = serde_json::from_str(
            r#"{
                "current_weather": {"temperature": 21.5, "windspeed": 14.0, "weathercode": 61},
                "daily": {
                    "time": ["2026-08-06", "2026-08-07"],
                    "temperature_2m_max": [24.0, 25.0],
                    "temperature_2m_min": [16.0, 17.0],
                    "precipitation_sum": [2.5, 0.0],
                    "windspeed_10m_max": [18.0, 12.0],
                    "relative_humidity_2m_mean": [71.0, 64.0]
                }
            }"#,
        )
        .unwrap();

        let snap = snapshot_from_provider(&body).unwrap();
        assert_eq!(snap.temperature_avg, 21.5);
        assert_eq!(snap.wind_kph, 14.0);
        assert_eq!(snap.precipitation_mm, 2.5);
        assert_eq!(snap.humidity_percent, 71.0);
        assert_eq!(snap.condition, "Rain");
        assert!(!snap.synthetic);
        assert_eq!(snap.forecast.len(), 1);
        assert_eq!(snap.forecast[0].temperature_max, 25.0);
    }

    #[test]
    fn test_provider_parse_without_current_block() {
        let body: ProviderResponse = serde_json::from_str(
            r#"{
                "daily": {
                    "time": ["2026-08-06"],
                    "temperature_2m_max": [24.0],
                    "temperature_2m_min": [16.0],
                    "precipitation_sum": [0.0],
                    "windspeed_10m_max": [10.0]
                }
            }"#,
        )
        .unwrap();

        let snap = snapshot_from_provider(&body).unwrap();
        assert_eq!(snap.temperature_avg, 20.0);
        assert_eq!(snap.wind_kph, 10.0);
        assert_eq!(snap.humidity_percent, 60.0);
    }

    #[test]
    fn test_provider_parse_missing_daily_is_rejected() {
        let body: ProviderResponse = serde_json::from_str(r#"{"current_weather": null}"#).unwrap();
        assert!(snapshot_from_provider(&body).is_none());

        let body: ProviderResponse = serde_json::from_str(
            r#"{"daily": {"time": [], "temperature_2m_max": [], "temperature_2m_min": [], "precipitation_sum": []}}"#,
        )
        .unwrap();
        assert!(snapshot_from_provider(&body).is_none());
    }

    #[test]
    fn test_condition_text_buckets() {
        assert_eq!(condition_text(0), "Clear sky");
        assert_eq!(condition_text(63), "Rain");
        assert_eq!(condition_text(96), "Thunderstorm");
        assert_eq!(condition_text(42), "Unknown");
    }
}
