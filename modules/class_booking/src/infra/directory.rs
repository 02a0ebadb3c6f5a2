//! In-process adapter for the professor directory port.
//!
//! Production deployments wire the real user-directory client here; the
//! static variant serves embedded setups and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::{ProfessorDirectory, ProfessorProfile};

/// Directory backed by an in-memory table of professor profiles.
#[derive(Default)]
pub struct StaticDirectory {
    professors: RwLock<HashMap<Uuid, ProfessorProfile>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, id: Uuid, profile: ProfessorProfile) {
        if let Ok(mut map) = self.professors.write() {
            map.insert(id, profile);
        }
    }
}

#[async_trait]
impl ProfessorDirectory for StaticDirectory {
    async fn find_professor(&self, id: Uuid) -> Result<Option<ProfessorProfile>, DomainError> {
        let map = self
            .professors
            .read()
            .map_err(|_| DomainError::storage("professor directory lock poisoned"))?;
        Ok(map.get(&id).copied())
    }
}
