use std::time::Duration;

use uuid::Uuid;


pub const DEVICE_NAME_FILTER: &str = "StressMonitor";

pub const SERVICE_UUID: Uuid = Uuid::from_u128(0x12345678_1234_1234_1234_1234567890ab);
pub const HEART_RATE_UUID: Uuid = Uuid::from_u128(0x00002a37_0000_1000_8000_00805f9b34fb);
pub const HRV_UUID: Uuid = Uuid::from_u128(0xbeb5483e_36e1_4688_b7f5_ea07361b26b9);
pub const TEMPERATURE_UUID: Uuid = Uuid::from_u128(0xbeb5483e_36e1_4688_b7f5_ea07361b26a8);
pub const GSR_UUID: Uuid = Uuid::from_u128(0xbada8f01_1111_2222_3333_abcdefabcdef);


/// Timings for one scan/connect/read cycle.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub name_filter: String,
    /// How long a single discovery pass listens for advertisements.
    pub scan_duration: Duration,
    /// Wait after connecting so the firmware can populate its values.
    pub settle_delay: Duration,
    pub read_timeout: Duration,
    pub retry_delay: Duration,
    pub attempts: u32,
    /// Upper bound for the whole cycle, discovery included.
    pub session_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            name_filter: DEVICE_NAME_FILTER.to_string(),
            scan_duration: Duration::from_secs(5),
            settle_delay: Duration::from_millis(1500),
            read_timeout: Duration::from_secs(2),
            retry_delay: Duration::from_secs(1),
            attempts: 3,
            session_timeout: Duration::from_secs(40),
        }
    }
}

impl SessionConfig {
    /// Longest a session can take when every read exhausts its attempts.
    pub fn worst_case(&self) -> Duration {
        let per_read = self.read_timeout * self.attempts
            + self.retry_delay * self.attempts.saturating_sub(1);

        self.scan_duration + self.settle_delay + per_read * 4
    }
}
