use std::time::Duration;

use anyhow::anyhow;
use eframe::egui;
use tokio::{spawn, sync::mpsc::{Receiver as TokioReceiver, UnboundedSender}};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stress_monitor::ble::BleConnector;
use stress_monitor::config::SessionConfig;
use stress_monitor::dashboard::{self, DashboardView};
use stress_monitor::monitor::MonitorManager;
use stress_monitor::signal::{GuiSignal, MonitorSignal};
use stress_monitor::widget;

const POLL_INTERVAL: Duration = Duration::from_millis(100);


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (tx, rx) = tokio::sync::mpsc::channel(16);
    let (tx_from_gui, rx_from_gui) = tokio::sync::mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();

    let manager = MonitorManager::new(BleConnector, SessionConfig::default(), tx, rx_from_gui, shutdown.clone());
    let monitor = spawn(async move {
        if let Err(err) = manager.run().await {
            error!("Monitor task ended: {err:#}");
        }
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 520.0]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "Stress Monitor",
        native_options,
        Box::new(|cc| Ok(Box::new(StressApp::new(cc, rx, tx_from_gui)))),
    );

    shutdown.cancel();
    if let Err(err) = monitor.await {
        error!("Monitor task panicked: {err}");
    }
    info!("Bye");

    result.map_err(|err| anyhow!("{err}"))
}


struct StressApp {
    rx_from_monitor: TokioReceiver<MonitorSignal>,
    tx_from_gui: UnboundedSender<GuiSignal>,
    view: DashboardView,
    busy: bool,
}

impl StressApp {
    fn new(
        _cc: &eframe::CreationContext<'_>,
        rx_from_monitor: TokioReceiver<MonitorSignal>,
        tx_from_gui: UnboundedSender<GuiSignal>,
    ) -> Self {
        StressApp {
            rx_from_monitor,
            tx_from_gui,
            view: DashboardView::Idle,
            busy: false,
        }
    }

    fn read_channel(&mut self) {
        while let Ok(signal) = self.rx_from_monitor.try_recv() {
            match signal {
                MonitorSignal::SessionStarted => {
                    self.busy = true;
                    self.view = DashboardView::Scanning;
                }
                MonitorSignal::SessionFinished(outcome) => {
                    self.busy = false;
                    self.view = dashboard::render(&outcome);
                }
            }
        }
    }

    fn request_reading(&mut self) {
        if self.tx_from_gui.send(GuiSignal::ReadRequested).is_err() {
            self.view = DashboardView::Error("The Bluetooth task has stopped. Restart the app.".to_string());
            return;
        }
        self.busy = true;
        self.view = DashboardView::Scanning;
    }

    fn show_view(&self, ui: &mut egui::Ui) {
        match &self.view {
            DashboardView::Idle => {
                ui.label("Press the button to read your StressMonitor.");
            }
            DashboardView::Scanning => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Scanning...");
                });
            }
            DashboardView::Error(message) => {
                ui.add(widget::get_error_label(message));
            }
            DashboardView::Stress { score_line, level, metrics } => {
                ui.add(widget::get_score_label(score_line));
                ui.add(widget::get_level_label(*level));
                ui.add_space(12.0);

                for row in metrics.chunks(2) {
                    ui.columns(2, |columns| {
                        for (column, metric) in columns.iter_mut().zip(row) {
                            widget::show_metric(column, metric);
                        }
                    });
                }
            }
        }
    }
}

impl eframe::App for StressApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.read_channel();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Real-Time Stress Scanner");
            ui.add_space(8.0);

            // One press, one session
            let clicked = ui.add_enabled(!self.busy, widget::get_trigger_button()).clicked();
            if clicked {
                self.request_reading();
            }
            ui.add_space(12.0);

            self.show_view(ui);
        });

        if self.busy {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
