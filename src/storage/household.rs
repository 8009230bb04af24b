//! Household repository for JSON storage
//!
//! Holds members, expense categories (with their expenses), personal
//! categories and the color reservation counter, persisted to
//! household.json.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{
    CategoryId, Expense, ExpenseCategory, ExpenseId, PersonalCategoryId, PersonalExpenseCategory,
    User, UserId,
};

use super::file_io::{read_json, write_json_atomic};

/// Serializable household snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub categories: Vec<ExpenseCategory>,
    #[serde(default)]
    pub personal_categories: Vec<PersonalExpenseCategory>,
    /// Next palette slot to hand out
    #[serde(default)]
    pub next_color_slot: u64,
}

/// Repository for household persistence
pub struct HouseholdRepository {
    path: PathBuf,
    data: RwLock<HouseholdData>,
}

impl HouseholdRepository {
    /// Create a new household repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HouseholdData::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HouseholdData>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HouseholdData>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load the household from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: HouseholdData = read_json(&self.path)?;
        *self.write()? = file_data;
        Ok(())
    }

    /// Save the household to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.read()?;
        write_json_atomic(&self.path, &*data)
    }

    /// Clone of the full snapshot
    pub fn snapshot(&self) -> Result<HouseholdData, LedgerError> {
        Ok(self.read()?.clone())
    }

    /// Replace the full snapshot (used by `init`)
    pub fn replace(&self, data: HouseholdData) -> Result<(), LedgerError> {
        *self.write()? = data;
        Ok(())
    }

    // User operations

    /// All members in supplied order
    pub fn get_all_users(&self) -> Result<Vec<User>, LedgerError> {
        Ok(self.read()?.users.clone())
    }

    /// Get a member by ID
    pub fn get_user(&self, id: &UserId) -> Result<Option<User>, LedgerError> {
        Ok(self.read()?.users.iter().find(|u| &u.id == id).cloned())
    }

    /// Get a member by name (case-insensitive)
    pub fn get_user_by_name(&self, name: &str) -> Result<Option<User>, LedgerError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| u.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert or update a member
    pub fn upsert_user(&self, user: User) -> Result<(), LedgerError> {
        let mut data = self.write()?;
        match data.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => data.users.push(user),
        }
        Ok(())
    }

    /// Reserve the next palette slot
    ///
    /// The counter is advanced and written to disk while the write lock is
    /// held, so concurrent approvals always receive distinct slots.
    pub fn reserve_color_slot(&self) -> Result<u64, LedgerError> {
        let mut data = self.write()?;
        let slot = data.next_color_slot;
        data.next_color_slot += 1;
        if let Err(e) = write_json_atomic(&self.path, &*data) {
            data.next_color_slot = slot;
            return Err(e);
        }
        Ok(slot)
    }

    // Category operations

    /// All expense categories in stored order
    pub fn get_all_categories(&self) -> Result<Vec<ExpenseCategory>, LedgerError> {
        Ok(self.read()?.categories.clone())
    }

    /// Get a category by ID
    pub fn get_category(&self, id: &CategoryId) -> Result<Option<ExpenseCategory>, LedgerError> {
        Ok(self.read()?.categories.iter().find(|c| &c.id == id).cloned())
    }

    /// Get a category by name (case-insensitive)
    pub fn get_category_by_name(&self, name: &str) -> Result<Option<ExpenseCategory>, LedgerError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .read()?
            .categories
            .iter()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert or update a category (expenses included)
    pub fn upsert_category(&self, category: ExpenseCategory) -> Result<(), LedgerError> {
        let mut data = self.write()?;
        match data.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => data.categories.push(category),
        }
        Ok(())
    }

    /// Delete a category and return it
    pub fn delete_category(&self, id: &CategoryId) -> Result<Option<ExpenseCategory>, LedgerError> {
        let mut data = self.write()?;
        let position = data.categories.iter().position(|c| &c.id == id);
        Ok(position.map(|i| data.categories.remove(i)))
    }

    // Personal category operations

    /// All personal categories
    pub fn get_all_personal_categories(&self) -> Result<Vec<PersonalExpenseCategory>, LedgerError> {
        Ok(self.read()?.personal_categories.clone())
    }

    /// Get a personal category by ID
    pub fn get_personal_category(
        &self,
        id: &PersonalCategoryId,
    ) -> Result<Option<PersonalExpenseCategory>, LedgerError> {
        Ok(self
            .read()?
            .personal_categories
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }

    /// Get a personal category by name (case-insensitive)
    pub fn get_personal_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PersonalExpenseCategory>, LedgerError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .read()?
            .personal_categories
            .iter()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert or update a personal category
    pub fn upsert_personal_category(
        &self,
        category: PersonalExpenseCategory,
    ) -> Result<(), LedgerError> {
        let mut data = self.write()?;
        match data
            .personal_categories
            .iter_mut()
            .find(|c| c.id == category.id)
        {
            Some(existing) => *existing = category,
            None => data.personal_categories.push(category),
        }
        Ok(())
    }

    /// Delete a personal category, leaving expenses that reference it untouched
    pub fn delete_personal_category(
        &self,
        id: &PersonalCategoryId,
    ) -> Result<Option<PersonalExpenseCategory>, LedgerError> {
        let mut data = self.write()?;
        let position = data.personal_categories.iter().position(|c| &c.id == id);
        Ok(position.map(|i| data.personal_categories.remove(i)))
    }

    // Expense operations

    /// Find an expense and the category holding it
    pub fn find_expense(&self, id: &ExpenseId) -> Result<Option<(CategoryId, Expense)>, LedgerError> {
        let data = self.read()?;
        Ok(data.categories.iter().find_map(|c| {
            c.expense(id).map(|e| (c.id.clone(), e.clone()))
        }))
    }

    /// Find an expense by name (case-insensitive), optionally within one category
    pub fn find_expense_by_name(
        &self,
        name: &str,
        category: Option<&CategoryId>,
    ) -> Result<Option<(CategoryId, Expense)>, LedgerError> {
        let name_lower = name.to_lowercase();
        let data = self.read()?;
        Ok(data
            .categories
            .iter()
            .filter(|c| category.map_or(true, |id| &c.id == id))
            .find_map(|c| {
                c.expenses
                    .iter()
                    .find(|e| e.name.to_lowercase() == name_lower)
                    .map(|e| (c.id.clone(), e.clone()))
            }))
    }

    /// Append an expense to a category
    pub fn insert_expense(&self, category_id: &CategoryId, expense: Expense) -> Result<(), LedgerError> {
        let mut data = self.write()?;
        let category = data
            .categories
            .iter_mut()
            .find(|c| &c.id == category_id)
            .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?;
        category.expenses.push(expense);
        Ok(())
    }

    /// Replace an expense in place, keeping its position
    pub fn replace_expense(&self, expense: Expense) -> Result<(), LedgerError> {
        let mut data = self.write()?;
        let slot = data
            .categories
            .iter_mut()
            .flat_map(|c| c.expenses.iter_mut())
            .find(|e| e.id == expense.id)
            .ok_or_else(|| LedgerError::expense_not_found(expense.id.to_string()))?;
        *slot = expense;
        Ok(())
    }

    /// Remove an expense and return it with its category id
    pub fn remove_expense(&self, id: &ExpenseId) -> Result<Option<(CategoryId, Expense)>, LedgerError> {
        let mut data = self.write()?;
        for category in data.categories.iter_mut() {
            if let Some(position) = category.expenses.iter().position(|e| &e.id == id) {
                let expense = category.expenses.remove(position);
                return Ok(Some((category.id.clone(), expense)));
            }
        }
        Ok(None)
    }

    /// Number of expenses across all categories
    pub fn expense_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.categories.iter().map(|c| c.expenses.len()).sum())
    }
}
