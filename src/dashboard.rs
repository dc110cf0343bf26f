use crate::reader::Reading;
use crate::signal::SessionOutcome;
use crate::stress::StressLevel;


pub const DEVICE_NOT_FOUND: &str = "Could not find your StressMonitor. Make sure it is advertising and nearby.";


#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub title: &'static str,
    pub value: String,
}

/// Everything the window shows, derived from the last session outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Idle,
    Scanning,
    Error(String),
    Stress {
        score_line: String,
        level: StressLevel,
        metrics: [Metric; 4],
    },
}

pub fn render(outcome: &SessionOutcome) -> DashboardView {
    match outcome {
        SessionOutcome::DeviceNotFound => DashboardView::Error(DEVICE_NOT_FOUND.to_string()),
        SessionOutcome::Failed(description) => DashboardView::Error(format!("Error reading BLE data: {description}")),
        SessionOutcome::Completed(readings) => {
            let score = readings.score();

            DashboardView::Stress {
                score_line: format!("Stress Score: {score}/100"),
                level: readings.level(),
                metrics: [
                    metric("Heart Rate", &readings.heart_rate, 1, "BPM"),
                    metric("HRV", &readings.hrv, 1, "ms"),
                    metric("Temp", &readings.temperature, 1, "°F"),
                    metric("GSR", &readings.gsr, 2, "µS"),
                ],
            }
        }
    }
}

fn metric(title: &'static str, reading: &Reading, precision: usize, unit: &str) -> Metric {
    let value = match reading {
        Reading::Value(value) => format!("{value:.precision$} {unit}"),
        Reading::Unparseable => "invalid".to_string(),
        Reading::Unavailable => "--".to_string(),
    };

    Metric { title, value }
}
