use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use btleplug::api::{Central, CharPropFlags, Manager as _, Peripheral, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral as PlatformPeripheral};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SERVICE_UUID;
use crate::monitor::Connector;
use crate::reader::CharacteristicSource;
use crate::session::{Device, Scanner, SessionError};


/// Opens the first Bluetooth adapter of the host.
pub struct BleConnector;

#[async_trait]
impl Connector for BleConnector {
    type Scanner = BleScanner;

    async fn open(&self) -> Result<BleScanner, SessionError> {
        let manager = Manager::new().await?;
        let adapter_list = manager.adapters().await?;

        for adapter in adapter_list.iter() {
            debug!("adapter: {}", adapter.adapter_info().await.unwrap_or("No name adapter".to_string()));
        }

        // TODO: let the user pick when the host has more than one adapter
        let adapter = adapter_list.into_iter().next().ok_or(SessionError::NoAdapter)?;
        Ok(BleScanner { adapter })
    }
}


pub struct BleScanner {
    adapter: Adapter,
}

#[async_trait]
impl Scanner for BleScanner {
    type Device = BlePeripheral;

    async fn discover(&self, scan_duration: Duration) -> Result<Vec<BlePeripheral>, SessionError> {
        self.adapter.start_scan(ScanFilter::default()).await?;
        tokio::time::sleep(scan_duration).await;

        // May contain peripherals that are no longer in range; connecting to those fails.
        let peripherals = self.adapter.peripherals().await;

        if let Err(err) = self.adapter.stop_scan().await {
            warn!("Error stopping scan: {err}");
        }

        let peripherals = peripherals?;
        info!("Discovered {} peripherals", peripherals.len());
        Ok(peripherals.into_iter().map(BlePeripheral).collect())
    }
}


pub struct BlePeripheral(PlatformPeripheral);

#[async_trait]
impl CharacteristicSource for BlePeripheral {
    async fn read(&self, uuid: Uuid) -> Result<Vec<u8>> {
        // Prefer the copy that lives in the monitor's own service.
        let characteristic = self
            .0
            .characteristics()
            .into_iter()
            .filter(|characteristic| characteristic.uuid == uuid)
            .max_by_key(|characteristic| characteristic.service_uuid == SERVICE_UUID)
            .ok_or_else(|| anyhow!("characteristic {uuid} not found"))?;

        if !characteristic.properties.contains(CharPropFlags::READ) {
            bail!("characteristic {uuid} is not readable");
        }

        Ok(self.0.read(&characteristic).await?)
    }
}

#[async_trait]
impl Device for BlePeripheral {
    async fn name(&self) -> Option<String> {
        let Ok(Some(properties)) = self.0.properties().await else { return None; };

        properties.local_name
    }

    async fn connect(&self) -> Result<()> {
        if !self.0.is_connected().await? {
            self.0.connect().await?;
        }
        Ok(())
    }

    async fn discover_services(&self) -> Result<()> {
        info!("Discover peripheral {} services...", self.0.address());
        self.0.discover_services().await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        info!("Disconnecting from peripheral {}...", self.0.address());
        self.0.disconnect().await?;
        Ok(())
    }
}
