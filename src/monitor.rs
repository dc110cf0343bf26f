use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::{Sender as TokioSender, UnboundedReceiver};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::session::{self, Readings, Scanner, SessionError};
use crate::signal::{GuiSignal, MonitorSignal, SessionOutcome};


/// Hands out a fresh scanner for every session.
#[async_trait]
pub trait Connector: Send + Sync {
    type Scanner: Scanner;

    async fn open(&self) -> Result<Self::Scanner, SessionError>;
}


/// Runs one session per request from the GUI, never two at once.
pub struct MonitorManager<C> {
    connector: C,
    config: SessionConfig,
    tx_to_gui: TokioSender<MonitorSignal>,
    rx_from_gui: UnboundedReceiver<GuiSignal>,
    shutdown: CancellationToken,
}

impl<C: Connector> MonitorManager<C> {
    pub fn new(
        connector: C,
        config: SessionConfig,
        tx_to_gui: TokioSender<MonitorSignal>,
        rx_from_gui: UnboundedReceiver<GuiSignal>,
        shutdown: CancellationToken,
    ) -> Self {
        MonitorManager {
            connector,
            config,
            tx_to_gui,
            rx_from_gui,
            shutdown,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            let signal = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                signal = self.rx_from_gui.recv() => signal,
            };

            // GUI is gone
            let Some(signal) = signal else { break; };

            match signal {
                GuiSignal::ReadRequested => {
                    self.tx_to_gui.send(MonitorSignal::SessionStarted).await?;

                    // Sessions stop themselves on shutdown, after releasing the device.
                    let result = self.read_once().await;
                    if self.shutdown.is_cancelled() {
                        break;
                    }

                    let outcome = SessionOutcome::from(result);

                    if let SessionOutcome::Failed(ref description) = outcome {
                        warn!("Session failed: {description}");
                    }
                    self.tx_to_gui.send(MonitorSignal::SessionFinished(outcome)).await?;
                }
            }
        }

        info!("Monitor stopped");
        Ok(())
    }

    async fn read_once(&self) -> Result<Option<Readings>, SessionError> {
        let budget = self.config.session_timeout;

        // No device is connected while the adapter opens.
        let scanner = tokio::select! {
            _ = self.shutdown.cancelled() => return Err(SessionError::Cancelled),
            opened = tokio::time::timeout(budget, self.connector.open()) => {
                opened.unwrap_or(Err(SessionError::Timeout(budget)))?
            }
        };

        session::run_session(&scanner, &self.config, &self.shutdown).await
    }
}
