//! Member service
//!
//! Approves household members and edits the income figures the split and
//! summary calculations read.

use tracing::info;

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{palette_color, User, UserId};
use crate::storage::Storage;

/// Service for household member management
pub struct MemberService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// Fields that can be changed on an existing member
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub monthly_income: Option<f64>,
    pub tax_rate: Option<f64>,
}

impl<'a> MemberService<'a> {
    /// Create a new member service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Approve a new member
    ///
    /// The member starts with no income, the configured default tax rate and
    /// the palette color at a freshly reserved slot.
    pub fn approve(&self, name: &str) -> LedgerResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Member name cannot be empty".into()));
        }

        if self.storage.household.get_user_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier: name.to_string(),
            });
        }

        let slot = self.storage.household.reserve_color_slot()?;
        let mut user = User::new(name, palette_color(slot));
        user.tax_rate = self.settings.default_tax_rate;

        user.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.household.upsert_user(user.clone())?;
        self.storage.household.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &user,
        )?;

        info!(user = %user.id, color = %user.color, slot, "approved member");
        Ok(user)
    }

    /// Find a member by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<User>> {
        if let Some(user) = self.storage.household.get_user_by_name(identifier)? {
            return Ok(Some(user));
        }
        self.storage
            .household
            .get_user(&UserId::from_string(identifier.trim()))
    }

    /// Find a member or fail with a not-found error
    pub fn resolve(&self, identifier: &str) -> LedgerResult<User> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::user_not_found(identifier))
    }

    /// All members in approval order
    pub fn list(&self) -> LedgerResult<Vec<User>> {
        self.storage.household.get_all_users()
    }

    /// Edit a member's name, income or tax rate
    ///
    /// Existing percentage splits keep their stored fractions; use
    /// `ExpenseService::rebalance` to recompute them from the new incomes.
    pub fn update(&self, id: &UserId, changes: MemberUpdate) -> LedgerResult<User> {
        let mut user = self
            .storage
            .household
            .get_user(id)?
            .ok_or_else(|| LedgerError::user_not_found(id.to_string()))?;

        let before = user.clone();

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if let Some(existing) = self.storage.household.get_user_by_name(&name)? {
                if existing.id != user.id {
                    return Err(LedgerError::Duplicate {
                        entity_type: "User",
                        identifier: name,
                    });
                }
            }
            user.name = name;
        }

        if let Some(income) = changes.monthly_income {
            user.monthly_income = income;
        }

        if let Some(tax_rate) = changes.tax_rate {
            user.tax_rate = tax_rate;
        }

        user.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.household.upsert_user(user.clone())?;
        self.storage.household.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &before,
            &user,
        )?;

        info!(user = %user.id, "updated member");
        Ok(user)
    }
}
