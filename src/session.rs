use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::reader::{self, CharacteristicSource, Reading, RetryPolicy};
use crate::stress::{self, StressLevel};


#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no Bluetooth adapter found")]
    NoAdapter,
    #[error(transparent)]
    Ble(#[from] btleplug::Error),
    #[error("could not connect to {name}: {source:#}")]
    Connect {
        name: String,
        source: anyhow::Error,
    },
    #[error("could not discover services on {name}: {source:#}")]
    Services {
        name: String,
        source: anyhow::Error,
    },
    #[error("no answer from the device within {0:?}")]
    Timeout(Duration),
    #[error("session cancelled")]
    Cancelled,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}


/// A peripheral found during discovery.
#[async_trait]
pub trait Device: CharacteristicSource {
    async fn name(&self) -> Option<String>;
    async fn connect(&self) -> Result<()>;
    async fn discover_services(&self) -> Result<()>;
    async fn disconnect(&self) -> Result<()>;
}

#[async_trait]
pub trait Scanner: Send + Sync {
    type Device: Device;

    /// A single discovery pass, returned in discovery order.
    async fn discover(&self, scan_duration: Duration) -> Result<Vec<Self::Device>, SessionError>;
}


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub heart_rate: Reading,
    pub hrv: Reading,
    pub temperature: Reading,
    pub gsr: Reading,
}

impl Readings {
    pub fn score(&self) -> u8 {
        stress::score(
            self.heart_rate.value_or_sentinel(),
            self.hrv.value_or_sentinel(),
            self.temperature.value_or_sentinel(),
            self.gsr.value_or_sentinel(),
        )
    }

    pub fn level(&self) -> StressLevel {
        StressLevel::from_score(self.score())
    }
}


/// Deadline and shutdown signal shared by every step of one session.
struct Budget<'a> {
    deadline: Instant,
    limit: Duration,
    shutdown: &'a CancellationToken,
}

impl Budget<'_> {
    async fn run<F: Future>(&self, work: F) -> Result<F::Output, SessionError> {
        tokio::select! {
            _ = self.shutdown.cancelled() => Err(SessionError::Cancelled),
            output = tokio::time::timeout_at(self.deadline, work) => {
                output.map_err(|_| SessionError::Timeout(self.limit))
            }
        }
    }
}


/// Connects to the first device whose name contains the configured filter
/// and reads all four characteristics. `Ok(None)` means nothing matched.
///
/// Once a connection has been attempted the device is always disconnected,
/// whether the reads finish, fail, run out of time or get cancelled.
pub async fn run_session<S: Scanner>(
    scanner: &S,
    config: &SessionConfig,
    shutdown: &CancellationToken,
) -> Result<Option<Readings>, SessionError> {
    let budget = Budget {
        deadline: Instant::now() + config.session_timeout,
        limit: config.session_timeout,
        shutdown,
    };

    info!("Scanning for BLE devices...");
    let devices = budget.run(scanner.discover(config.scan_duration)).await??;

    for device in devices {
        let Some(name) = budget.run(device.name()).await? else { continue; };
        if !name.contains(&config.name_filter) {
            continue;
        }

        info!("Found device: {name}");
        let result = budget.run(connect_and_read(&device, &name, config)).await;

        release(&device, &name, config.read_timeout).await;
        return result?.map(Some);
    }

    info!("No {} device found.", config.name_filter);
    Ok(None)
}

async fn connect_and_read<D: Device>(device: &D, name: &str, config: &SessionConfig) -> Result<Readings, SessionError> {
    device
        .connect()
        .await
        .map_err(|source| SessionError::Connect { name: name.to_string(), source })?;

    device
        .discover_services()
        .await
        .map_err(|source| SessionError::Services { name: name.to_string(), source })?;

    Ok(read_all(device, config).await)
}

async fn read_all<D: Device>(device: &D, config: &SessionConfig) -> Readings {
    tokio::time::sleep(config.settle_delay).await;

    let policy = RetryPolicy::from(config);
    Readings {
        heart_rate: reader::read_characteristic(device, reader::HEART_RATE, policy).await,
        hrv: reader::read_characteristic(device, reader::HRV, policy).await,
        temperature: reader::read_characteristic(device, reader::TEMPERATURE, policy).await,
        gsr: reader::read_characteristic(device, reader::GSR, policy).await,
    }
}

async fn release<D: Device>(device: &D, name: &str, limit: Duration) {
    match tokio::time::timeout(limit, device.disconnect()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!("Error disconnecting from {name}: {err:#}"),
        Err(_) => warn!("Disconnecting from {name} timed out after {limit:?}"),
    }
}
