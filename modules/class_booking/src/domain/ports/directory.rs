use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// What the booking core needs to know about a professor. The directory is
/// an external collaborator; this core never writes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfessorProfile {
    /// Per-slot capacity ceiling; the configured default applies when unset.
    pub capacity: Option<u32>,
    pub active: bool,
}

/// Read-only lookup into the user/professor directory.
#[async_trait]
pub trait ProfessorDirectory: Send + Sync {
    async fn find_professor(&self, id: Uuid) -> Result<Option<ProfessorProfile>, DomainError>;
}
