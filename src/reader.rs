use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{SessionConfig, GSR_UUID, HEART_RATE_UUID, HRV_UUID, TEMPERATURE_UUID};
use crate::value;

pub use crate::value::Reading;


/// One scalar exposed by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Characteristic {
    pub uuid: Uuid,
    pub label: &'static str,
}

pub const HEART_RATE: Characteristic = Characteristic { uuid: HEART_RATE_UUID, label: "HR" };
pub const HRV: Characteristic = Characteristic { uuid: HRV_UUID, label: "HRV" };
pub const TEMPERATURE: Characteristic = Characteristic { uuid: TEMPERATURE_UUID, label: "Temp" };
pub const GSR: Characteristic = Characteristic { uuid: GSR_UUID, label: "GSR" };


/// Anything that can hand back the raw bytes of a characteristic.
#[async_trait]
pub trait CharacteristicSource: Send + Sync {
    async fn read(&self, uuid: Uuid) -> Result<Vec<u8>>;
}


#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
    pub timeout: Duration,
}

impl From<&SessionConfig> for RetryPolicy {
    fn from(config: &SessionConfig) -> Self {
        RetryPolicy {
            attempts: config.attempts,
            delay: config.retry_delay,
            timeout: config.read_timeout,
        }
    }
}

pub async fn read_characteristic<S>(source: &S, characteristic: Characteristic, policy: RetryPolicy) -> Reading
where
    S: CharacteristicSource + ?Sized,
{
    let label = characteristic.label;

    for attempt in 1..=policy.attempts {
        match tokio::time::timeout(policy.timeout, source.read(characteristic.uuid)).await {
            Ok(Ok(payload)) if !payload.is_empty() => {
                let reading = value::parse(&payload);
                info!("{label}: {reading:?}");
                return reading;
            }
            Ok(Ok(_)) => warn!("retry {label} ({attempt}/{}): empty payload", policy.attempts),
            Ok(Err(err)) => warn!("retry {label} ({attempt}/{}): {err:#}", policy.attempts),
            Err(_) => warn!("retry {label} ({attempt}/{}): timed out after {:?}", policy.attempts, policy.timeout),
        }

        if attempt < policy.attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    warn!("giving up on {label} after {} attempts", policy.attempts);
    Reading::Unavailable
}
