use crate::models::{BiosecurityTier, Farm, Inspection, ScoreBreakdown, WeatherSnapshot};

pub const INSPECTION_BASELINE: f64 = 70.0;
const POINTS_PER_INSPECTION: f64 = 5.0;

const WEATHER_BASELINE: f64 = 50.0;
const IDEAL_TEMPERATURE_C: f64 = 22.0;
const TEMPERATURE_BONUS_CAP: f64 = 30.0;
const TEMPERATURE_BONUS_SLOPE: f64 = 3.0;
const PRECIPITATION_PENALTY_PER_MM: f64 = 2.0;
const PRECIPITATION_PENALTY_CAP: f64 = 20.0;
const WIND_THRESHOLD_KPH: f64 = 20.0;
const WIND_PENALTY_CAP: f64 = 20.0;

pub const DEFAULT_BIOSECURITY_SCORE: f64 = 30.0;

const INSPECTION_WEIGHT: f64 = 0.4;
const WEATHER_WEIGHT: f64 = 0.3;
const BIOSECURITY_WEIGHT: f64 = 0.3;

/// Derives the composite breakdown for one report. Pure and deterministic:
/// identical inputs always produce the identical breakdown. Chart filler
/// randomness lives elsewhere and must never feed into this path.
pub fn score(
    farm: Option<&Farm>,
    recent_inspections: &[Inspection],
    weather: &WeatherSnapshot,
) -> ScoreBreakdown {
    let inspection = inspection_score(recent_inspections.len());
    let weather_s = weather_score(weather);
    let biosecurity = biosecurity_score(farm.and_then(|f| f.biosecurity_tier));

    let overall = (INSPECTION_WEIGHT * inspection
        + WEATHER_WEIGHT * weather_s
        + BIOSECURITY_WEIGHT * biosecurity)
        .round()
        .clamp(0.0, 100.0);

    ScoreBreakdown {
        inspection_score: inspection,
        weather_score: weather_s,
        biosecurity_score: biosecurity,
        overall_score: overall,
    }
}

/// Monitoring intensity, not inspection quality: each recent inspection on
/// file adds a fixed number of points over the baseline, capped at 100.
pub fn inspection_score(recent_count: usize) -> f64 {
    (INSPECTION_BASELINE + POINTS_PER_INSPECTION * recent_count as f64).min(100.0)
}

/// Favorability of current conditions. Bonus shrinks to zero as the average
/// temperature moves away from the ideal midpoint; rain and strong wind
/// subtract capped penalties.
pub fn weather_score(weather: &WeatherSnapshot) -> f64 {
    let deviation = (weather.temperature_avg - IDEAL_TEMPERATURE_C).abs();
    let temperature_bonus =
        (TEMPERATURE_BONUS_CAP - TEMPERATURE_BONUS_SLOPE * deviation).max(0.0);

    let precipitation_penalty =
        (PRECIPITATION_PENALTY_PER_MM * weather.precipitation_mm).min(PRECIPITATION_PENALTY_CAP);

    let wind_penalty = (weather.wind_kph - WIND_THRESHOLD_KPH)
        .max(0.0)
        .min(WIND_PENALTY_CAP);

    (WEATHER_BASELINE + temperature_bonus - precipitation_penalty - wind_penalty).clamp(0.0, 100.0)
}

/// Fixed lookup from the declared tier. Farms may omit the field; that maps
/// to a low default instead of an error.
pub fn biosecurity_score(tier: Option<BiosecurityTier>) -> f64 {
    match tier {
        Some(BiosecurityTier::Basic) => 55.0,
        Some(BiosecurityTier::Intermediate) => 70.0,
        Some(BiosecurityTier::Advanced) => 85.0,
        Some(BiosecurityTier::Premium) => 95.0,
        None => DEFAULT_BIOSECURITY_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FarmType, InspectionResult};
    use crate::services::weather::synthetic_snapshot;
    use chrono::{NaiveDate, Utc};

    fn farm(tier: Option<BiosecurityTier>) -> Farm {
        Farm {
            id: "f1".into(),
            owner_user_id: "u1".into(),
            name: "Hilltop".into(),
            farm_type: FarmType::Poultry,
            biosecurity_tier: tier,
            latitude: Some(12.9),
            longitude: Some(77.6),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn inspections(n: usize) -> Vec<Inspection> {
        (0..n)
            .map(|i| Inspection {
                id: format!("i{}", i),
                farm_id: "f1".into(),
                inspector_user_id: "insp".into(),
                inspected_at: Utc::now(),
                result: InspectionResult::Pass,
                failed_checks: vec![],
                notes: None,
                created_at: Utc::now(),
            })
            .collect()
    }

    fn mild_weather() -> WeatherSnapshot {
        WeatherSnapshot {
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            temperature_avg: 22.0,
            temperature_min: 17.0,
            temperature_max: 27.0,
            humidity_percent: 60.0,
            precipitation_mm: 0.0,
            wind_kph: 10.0,
            condition: "Clear sky".into(),
            synthetic: false,
            forecast: vec![],
        }
    }

    #[test]
    fn test_inspection_score_baseline_and_cap() {
        assert_eq!(inspection_score(0), 70.0);
        assert_eq!(inspection_score(3), 85.0);
        assert_eq!(inspection_score(6), 100.0);
        assert_eq!(inspection_score(40), 100.0);
    }

    #[test]
    fn test_inspection_score_is_monotonic() {
        let mut last = 0.0;
        for n in 0..50 {
            let s = inspection_score(n);
            assert!(s >= last, "score decreased at count {}", n);
            assert!(s <= 100.0);
            last = s;
        }
    }

    #[test]
    fn test_weather_score_ideal_conditions() {
        assert_eq!(weather_score(&mild_weather()), 80.0);
    }

    #[test]
    fn test_weather_score_penalties_are_capped() {
        let mut w = mild_weather();
        w.precipitation_mm = 500.0;
        w.wind_kph = 150.0;
        // 50 + 30 - 20 - 20
        assert_eq!(weather_score(&w), 40.0);

        w.temperature_avg = -20.0;
        assert_eq!(weather_score(&w), 10.0);
    }

    #[test]
    fn test_weather_score_stays_in_range() {
        let mut w = mild_weather();
        for temp in [-40.0, 0.0, 22.0, 45.0] {
            for rain in [0.0, 5.0, 80.0] {
                for wind in [0.0, 25.0, 90.0] {
                    w.temperature_avg = temp;
                    w.precipitation_mm = rain;
                    w.wind_kph = wind;
                    let s = weather_score(&w);
                    assert!((0.0..=100.0).contains(&s));
                }
            }
        }
    }

    #[test]
    fn test_synthetic_weather_scores_at_baseline() {
        let snap = synthetic_snapshot(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(), 3);
        assert_eq!(weather_score(&snap), 50.0);
    }

    #[test]
    fn test_biosecurity_tiers_ascend() {
        let scores: Vec<f64> = [
            None,
            Some(BiosecurityTier::Basic),
            Some(BiosecurityTier::Intermediate),
            Some(BiosecurityTier::Advanced),
            Some(BiosecurityTier::Premium),
        ]
        .into_iter()
        .map(biosecurity_score)
        .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(biosecurity_score(None), 30.0);
        assert_eq!(biosecurity_score(Some(BiosecurityTier::Advanced)), 85.0);
    }

    #[test]
    fn test_weighted_composite_law() {
        let f = farm(Some(BiosecurityTier::Intermediate));
        for n in [0, 2, 7] {
            let ins = inspections(n);
            let b = score(Some(&f), &ins, &mild_weather());
            let expected = (0.4 * b.inspection_score
                + 0.3 * b.weather_score
                + 0.3 * b.biosecurity_score)
                .round();
            assert_eq!(b.overall_score, expected);
        }
    }

    #[test]
    fn test_scenario_advanced_farm_with_provider_down() {
        // 6 recent inspections, advanced tier, synthetic weather.
        let f = farm(Some(BiosecurityTier::Advanced));
        let ins = inspections(6);
        let snap = synthetic_snapshot(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(), 3);

        let b = score(Some(&f), &ins, &snap);
        assert_eq!(b.inspection_score, 100.0);
        assert_eq!(b.weather_score, 50.0);
        assert_eq!(b.biosecurity_score, 85.0);
        assert_eq!(b.overall_score, 81.0);
    }

    #[test]
    fn test_scenario_untiered_farm_with_no_history() {
        let f = farm(None);
        let snap = synthetic_snapshot(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(), 3);

        let b = score(Some(&f), &[], &snap);
        assert_eq!(b.inspection_score, 70.0);
        assert_eq!(b.weather_score, 50.0);
        assert_eq!(b.biosecurity_score, 30.0);
        assert_eq!(b.overall_score, 52.0);
    }

    #[test]
    fn test_determinism() {
        let f = farm(Some(BiosecurityTier::Premium));
        let ins = inspections(4);
        let w = mild_weather();
        assert_eq!(score(Some(&f), &ins, &w), score(Some(&f), &ins, &w));
    }

    #[test]
    fn test_missing_farm_uses_default_biosecurity() {
        let b = score(None, &[], &mild_weather());
        assert_eq!(b.biosecurity_score, DEFAULT_BIOSECURITY_SCORE);
    }
}
