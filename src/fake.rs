// Scripted stand-ins for the BLE stack, used by the session and reader tests.
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::time::Instant;
use uuid::Uuid;

use crate::monitor::Connector;
use crate::reader::CharacteristicSource;
use crate::session::{Device, Scanner, SessionError};


enum Step {
    Respond(Vec<u8>),
    Fail,
    Hang,
}

#[derive(Default)]
struct Script {
    steps: HashMap<Uuid, VecDeque<Step>>,
    attempts: HashMap<Uuid, usize>,
    first_read_at: Option<Instant>,
}

/// Replays queued answers per characteristic; an exhausted queue fails.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, uuid: Uuid, step: Step) -> Self {
        self.script.lock().unwrap().steps.entry(uuid).or_default().push_back(step);
        self
    }

    pub fn respond(self, uuid: Uuid, payload: &[u8]) -> Self {
        self.push(uuid, Step::Respond(payload.to_vec()))
    }

    pub fn fail(self, uuid: Uuid) -> Self {
        self.push(uuid, Step::Fail)
    }

    pub fn hang(self, uuid: Uuid) -> Self {
        self.push(uuid, Step::Hang)
    }

    pub fn attempts(&self, uuid: Uuid) -> usize {
        self.script.lock().unwrap().attempts.get(&uuid).copied().unwrap_or(0)
    }

    pub fn first_read_at(&self) -> Option<Instant> {
        self.script.lock().unwrap().first_read_at
    }
}

#[async_trait]
impl CharacteristicSource for ScriptedSource {
    async fn read(&self, uuid: Uuid) -> Result<Vec<u8>> {
        let step = {
            let mut script = self.script.lock().unwrap();
            script.first_read_at.get_or_insert_with(Instant::now);
            *script.attempts.entry(uuid).or_default() += 1;
            script.steps.get_mut(&uuid).and_then(VecDeque::pop_front)
        };

        match step {
            Some(Step::Respond(payload)) => Ok(payload),
            Some(Step::Hang) => std::future::pending().await,
            Some(Step::Fail) | None => Err(anyhow!("GATT read of {uuid} failed")),
        }
    }
}


/// How the fake link behaves once a session decides to connect.
#[derive(Clone, Copy, PartialEq)]
enum Link {
    Accept,
    Refuse,
    /// The link comes up but `connect` never returns.
    Hang,
    /// Connects fine, then service discovery fails.
    BrokenServices,
}

struct DeviceState {
    name: Option<String>,
    source: ScriptedSource,
    link: Link,
    connected: AtomicBool,
    was_connected: AtomicBool,
    disconnects: AtomicUsize,
}

#[derive(Clone)]
pub struct FakeDevice {
    state: Arc<DeviceState>,
}

impl FakeDevice {
    pub fn new(name: Option<&str>, source: ScriptedSource) -> Self {
        Self::with_link(name.map(str::to_string), source, Link::Accept)
    }

    fn with_link(name: Option<String>, source: ScriptedSource, link: Link) -> Self {
        FakeDevice {
            state: Arc::new(DeviceState {
                name,
                source,
                link,
                connected: AtomicBool::new(false),
                was_connected: AtomicBool::new(false),
                disconnects: AtomicUsize::new(0),
            }),
        }
    }

    fn relink(self, link: Link) -> Self {
        Self::with_link(self.state.name.clone(), self.state.source.clone(), link)
    }

    pub fn refuse_connection(self) -> Self {
        self.relink(Link::Refuse)
    }

    pub fn hang_on_connect(self) -> Self {
        self.relink(Link::Hang)
    }

    pub fn break_service_discovery(self) -> Self {
        self.relink(Link::BrokenServices)
    }

    pub fn source(&self) -> &ScriptedSource {
        &self.state.source
    }

    pub fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    pub fn was_connected(&self) -> bool {
        self.state.was_connected.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.state.disconnects.load(Ordering::SeqCst)
    }

    fn link_up(&self) {
        self.state.connected.store(true, Ordering::SeqCst);
        self.state.was_connected.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CharacteristicSource for FakeDevice {
    async fn read(&self, uuid: Uuid) -> Result<Vec<u8>> {
        if !self.is_connected() {
            return Err(anyhow!("not connected"));
        }
        self.state.source.read(uuid).await
    }
}

#[async_trait]
impl Device for FakeDevice {
    async fn name(&self) -> Option<String> {
        self.state.name.clone()
    }

    async fn connect(&self) -> Result<()> {
        match self.state.link {
            Link::Refuse => Err(anyhow!("connection refused")),
            Link::Hang => {
                self.link_up();
                std::future::pending().await
            }
            Link::Accept | Link::BrokenServices => {
                self.link_up();
                Ok(())
            }
        }
    }

    async fn discover_services(&self) -> Result<()> {
        if self.state.link == Link::BrokenServices {
            return Err(anyhow!("GATT service discovery failed"));
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.state.disconnects.fetch_add(1, Ordering::SeqCst);
        self.state.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}


#[derive(Clone)]
pub struct FakeScanner {
    devices: Vec<FakeDevice>,
    failing: bool,
}

impl FakeScanner {
    pub fn new(devices: Vec<FakeDevice>) -> Self {
        FakeScanner { devices, failing: false }
    }

    pub fn failing() -> Self {
        FakeScanner { devices: vec![], failing: true }
    }
}

#[async_trait]
impl Scanner for FakeScanner {
    type Device = FakeDevice;

    async fn discover(&self, scan_duration: Duration) -> Result<Vec<FakeDevice>, SessionError> {
        if self.failing {
            return Err(SessionError::NoAdapter);
        }
        tokio::time::sleep(scan_duration).await;
        Ok(self.devices.clone())
    }
}


#[derive(Clone)]
pub struct FakeConnector {
    scanner: FakeScanner,
    opened: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn new(scanner: FakeScanner) -> Self {
        FakeConnector { scanner, opened: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Scanner = FakeScanner;

    async fn open(&self) -> Result<FakeScanner, SessionError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(self.scanner.clone())
    }
}
