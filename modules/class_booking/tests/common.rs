//! Shared test harness: fresh in-memory SQLite per test, migrations
//! applied, service wired over the SeaORM repository.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use class_booking::config::ClassBookingConfig;
use class_booking::contract::model::Slot;
use class_booking::domain::ports::ProfessorProfile;
use class_booking::domain::service::Service;
use class_booking::infra::directory::StaticDirectory;
use class_booking::infra::notify::TracingNotifier;
use class_booking::infra::publisher::TracingPublisher;
use class_booking::infra::storage::{
    migrations::Migrator, sea_orm_repo::SeaOrmClassBookingRepository,
};

pub struct TestContext {
    pub service: Arc<Service>,
    pub directory: Arc<StaticDirectory>,
    /// Direct repository handle for asserting on persisted state.
    pub repo: Arc<SeaOrmClassBookingRepository>,
}

/// Fresh in-memory database. A single pooled connection keeps concurrent
/// transactions strictly serialized, which is what the capacity boundary
/// tests rely on.
pub async fn create_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_context() -> TestContext {
    create_test_context_with_config(ClassBookingConfig::default()).await
}

pub async fn create_test_context_with_config(config: ClassBookingConfig) -> TestContext {
    let db = create_test_db().await;
    let repo = Arc::new(SeaOrmClassBookingRepository::new(db));
    let directory = Arc::new(StaticDirectory::new());
    let service = Service::new(
        repo.clone(),
        directory.clone(),
        Arc::new(TracingNotifier),
        Arc::new(TracingPublisher),
        config,
    );
    TestContext {
        service: Arc::new(service),
        directory,
        repo,
    }
}

impl TestContext {
    /// Register a professor with an optional capacity override.
    pub fn add_professor(&self, capacity: Option<u32>) -> Uuid {
        let id = Uuid::new_v4();
        self.directory.upsert(
            id,
            ProfessorProfile {
                capacity,
                active: true,
            },
        );
        id
    }
}

pub fn slot(day_of_week: u8, start_min: u16, end_min: u16) -> Slot {
    Slot::new(day_of_week, start_min, end_min).expect("valid test slot")
}
