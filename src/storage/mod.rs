//! Storage layer for the household ledger
//!
//! Provides the JSON household snapshot with atomic writes and the audit
//! trail every service mutation is recorded in.

pub mod file_io;
pub mod household;
pub mod init;

pub use file_io::{read_json, write_json_atomic};
pub use household::{HouseholdData, HouseholdRepository};
pub use init::initialize_storage;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator
pub struct Storage {
    paths: LedgerPaths,
    pub household: HouseholdRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            household: HouseholdRepository::new(paths.household_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.household.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.household.save()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Access the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a created entity
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an updated entity
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), LedgerError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a deleted entity
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
