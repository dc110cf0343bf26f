//! Fixed threshold rules that turn four readings into a 0-100 stress score.

pub const MAX_SCORE: u8 = 100;


#[derive(Debug, Clone, Copy)]
enum Bound {
    Above(f64),
    Below(f64),
}

impl Bound {
    fn matches(self, value: f64) -> bool {
        match self {
            Bound::Above(limit) => value > limit,
            Bound::Below(limit) => value < limit,
        }
    }
}

/// Bands are ordered most severe first; the first one that matches wins.
#[derive(Debug, Clone, Copy)]
struct Band {
    bound: Bound,
    points: u8,
}

const fn band(bound: Bound, points: u8) -> Band {
    Band { bound, points }
}

const HEART_RATE_BANDS: [Band; 3] = [
    band(Bound::Above(100.0), 25),
    band(Bound::Above(90.0), 20),
    band(Bound::Above(70.0), 10),
];

const HRV_BANDS: [Band; 3] = [
    band(Bound::Below(20.0), 25),
    band(Bound::Below(40.0), 20),
    band(Bound::Below(60.0), 10),
];

const TEMPERATURE_BANDS: [Band; 3] = [
    band(Bound::Below(90.0), 25),
    band(Bound::Below(93.0), 20),
    band(Bound::Below(95.0), 10),
];

const GSR_BANDS: [Band; 3] = [
    band(Bound::Above(6.0), 25),
    band(Bound::Above(4.0), 20),
    band(Bound::Above(2.0), 10),
];

fn points(bands: &[Band], value: f64) -> u8 {
    bands
        .iter()
        .find(|band| band.bound.matches(value))
        .map_or(0, |band| band.points)
}

pub fn score(heart_rate: f64, hrv: f64, temperature: f64, gsr: f64) -> u8 {
    let total = points(&HEART_RATE_BANDS, heart_rate)
        + points(&HRV_BANDS, hrv)
        + points(&TEMPERATURE_BANDS, temperature)
        + points(&GSR_BANDS, gsr);

    total.min(MAX_SCORE)
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressLevel {
    Relaxed,
    Mild,
    Moderate,
    High,
}

impl StressLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => StressLevel::High,
            60..=89 => StressLevel::Moderate,
            30..=59 => StressLevel::Mild,
            _ => StressLevel::Relaxed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressLevel::Relaxed => "Relaxed",
            StressLevel::Mild => "Mild Stress",
            StressLevel::Moderate => "Moderate Stress",
            StressLevel::High => "High Stress",
        }
    }

    pub fn color_name(&self) -> &'static str {
        match self {
            StressLevel::Relaxed => "green",
            StressLevel::Mild => "gold",
            StressLevel::Moderate => "orange",
            StressLevel::High => "red",
        }
    }
}
