use eframe::egui::{Button, Color32, Label, RichText, Rounding, Ui};

use crate::dashboard::Metric;
use crate::stress::StressLevel;


const RELAXED: Color32 = Color32::from_rgb(0, 128, 0);
const MILD: Color32 = Color32::from_rgb(255, 215, 0);
const MODERATE: Color32 = Color32::from_rgb(255, 165, 0);
const HIGH: Color32 = Color32::from_rgb(255, 0, 0);


pub fn level_color(level: StressLevel) -> Color32 {
    match level {
        StressLevel::Relaxed => RELAXED,
        StressLevel::Mild => MILD,
        StressLevel::Moderate => MODERATE,
        StressLevel::High => HIGH,
    }
}

pub fn get_trigger_button() -> Button<'static> {
    let text = RichText::new("Get Live Data")
        .color(Color32::WHITE)
        .size(20.0);

    Button::new(text)
        .fill(Color32::BLUE)
        .rounding(Rounding::same(8.0))
}

pub fn get_score_label(score_line: &str) -> Label {
    let text = RichText::new(score_line)
        .monospace()
        .size(24.0);

    Label::new(text)
}

pub fn get_level_label(level: StressLevel) -> Label {
    let text = RichText::new(level.label())
        .color(level_color(level))
        .strong()
        .size(28.0);

    Label::new(text)
}

pub fn get_error_label(message: &str) -> Label {
    let text = RichText::new(message)
        .color(Color32::WHITE)
        .background_color(Color32::DARK_RED)
        .size(16.0);

    Label::new(text).wrap()
}

pub fn show_metric(ui: &mut Ui, metric: &Metric) {
    ui.group(|ui| {
        ui.label(RichText::new(metric.title).size(14.0));
        ui.label(RichText::new(&metric.value).strong().size(26.0));
    });
}
