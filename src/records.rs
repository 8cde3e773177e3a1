use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::model::{ShotRecord, StaffAccount};
use crate::seed::MASTER_STAFF_ID;
use crate::store::{KeyValueBackend, Store};

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("a record with id '{0}' already exists")]
    DuplicateId(String),
    #[error("the master account '{0}' cannot be deleted")]
    ProtectedAccount(String),
    #[error("invalid record: {0}")]
    Invalid(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// CRUD over the two collections. Every mutation re-reads the whole collection,
/// writes it back, and returns the result. There is no locking: concurrent
/// mutations against one collection can lose an update.
#[derive(Debug)]
pub struct RecordService<B> {
    store: Store<B>,
    latency: Duration,
}

impl<B: KeyValueBackend> RecordService<B> {
    pub fn new(store: Store<B>) -> Self {
        Self {
            store,
            latency: DEFAULT_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> &Store<B> {
        &self.store
    }

    pub fn new_shot_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn list_shots(&self) -> Vec<ShotRecord> {
        self.store.read_shots()
    }

    pub fn list_staff(&self) -> Vec<StaffAccount> {
        self.store.read_staff()
    }

    pub fn find_shot(&self, id: &str) -> Option<ShotRecord> {
        self.store.read_shots().into_iter().find(|shot| shot.id == id)
    }

    pub async fn add_shot(&self, shot: ShotRecord) -> Result<Vec<ShotRecord>, RecordError> {
        validate_shot(&shot)?;
        let mut shots = self.store.read_shots();
        if shots.iter().any(|existing| existing.id == shot.id) {
            return Err(RecordError::DuplicateId(shot.id));
        }
        info!(id = %shot.id, name = %shot.name, "adding shot");
        shots.push(shot);
        self.store.write_shots(&shots)?;
        self.settle().await;
        Ok(shots)
    }

    pub async fn update_shot(&self, shot: ShotRecord) -> Result<Vec<ShotRecord>, RecordError> {
        validate_shot(&shot)?;
        let mut shots = self.store.read_shots();
        if let Some(existing) = shots.iter_mut().find(|existing| existing.id == shot.id) {
            info!(id = %shot.id, "updating shot");
            *existing = shot;
        }
        self.store.write_shots(&shots)?;
        self.settle().await;
        Ok(shots)
    }

    pub async fn delete_shot(&self, id: &str) -> Result<Vec<ShotRecord>, RecordError> {
        let mut shots = self.store.read_shots();
        shots.retain(|shot| shot.id != id);
        info!(id, "deleting shot");
        self.store.write_shots(&shots)?;
        self.settle().await;
        Ok(shots)
    }

    pub async fn add_staff(&self, account: StaffAccount) -> Result<Vec<StaffAccount>, RecordError> {
        if account.id.trim().is_empty() || account.pw.is_empty() {
            return Err(RecordError::Invalid(
                "staff id and password are required".to_owned(),
            ));
        }
        let mut staff = self.store.read_staff();
        if staff.iter().any(|existing| existing.id == account.id) {
            return Err(RecordError::DuplicateId(account.id));
        }
        info!(id = %account.id, "adding staff account");
        staff.push(account);
        self.store.write_staff(&staff)?;
        self.settle().await;
        Ok(staff)
    }

    pub async fn delete_staff(&self, id: &str) -> Result<Vec<StaffAccount>, RecordError> {
        if id == MASTER_STAFF_ID {
            return Err(RecordError::ProtectedAccount(id.to_owned()));
        }
        let mut staff = self.store.read_staff();
        staff.retain(|account| account.id != id);
        info!(id, "deleting staff account");
        self.store.write_staff(&staff)?;
        self.settle().await;
        Ok(staff)
    }

    async fn settle(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn validate_shot(shot: &ShotRecord) -> Result<(), RecordError> {
    if shot.id.trim().is_empty() {
        return Err(RecordError::Invalid("shot id cannot be empty".to_owned()));
    }
    if shot.name.trim().is_empty() || shot.description.trim().is_empty() {
        return Err(RecordError::Invalid(
            "shot name and description are required".to_owned(),
        ));
    }
    let link = shot.link.trim();
    if !link.is_empty() && Url::parse(link).is_err() {
        warn!(id = %shot.id, link, "shot link is not an absolute URL");
    }
    Ok(())
}
