//! Category service
//!
//! Provides business logic for top-level expense categories and personal
//! sub-categories: create, rename, delete and the persisted collapse flag.

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    CategoryId, ExpenseCategory, PersonalCategoryId, PersonalExpenseCategory,
};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    // === Expense categories ===

    /// Create a new expense category
    pub fn create(&self, name: &str) -> LedgerResult<ExpenseCategory> {
        let name = name.trim();
        if self.storage.household.get_category_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = ExpenseCategory::new(name);
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.household.upsert_category(category.clone())?;
        self.storage.household.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        info!(category = %category.id, "created category");
        Ok(category)
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<ExpenseCategory>> {
        if let Some(category) = self.storage.household.get_category_by_name(identifier)? {
            return Ok(Some(category));
        }
        self.storage
            .household
            .get_category(&CategoryId::from_string(identifier.trim()))
    }

    /// Find a category or fail with a not-found error
    pub fn resolve(&self, identifier: &str) -> LedgerResult<ExpenseCategory> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::category_not_found(identifier))
    }

    /// List categories in stored order
    pub fn list(&self) -> LedgerResult<Vec<ExpenseCategory>> {
        self.storage.household.get_all_categories()
    }

    /// Rename a category
    pub fn rename(&self, id: &CategoryId, name: &str) -> LedgerResult<ExpenseCategory> {
        let mut category = self
            .storage
            .household
            .get_category(id)?
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;
        let before = category.clone();

        let name = name.trim();
        if let Some(existing) = self.storage.household.get_category_by_name(name)? {
            if &existing.id != id {
                return Err(LedgerError::Duplicate {
                    entity_type: "Category",
                    identifier: name.to_string(),
                });
            }
        }

        category.name = name.to_string();
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.household.upsert_category(category.clone())?;
        self.storage.household.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &summary_of(&before),
            &summary_of(&category),
        )?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// The shared category cannot be deleted. A category that still holds
    /// expenses is only deleted when `force` is set, taking its expenses
    /// with it.
    pub fn delete(&self, id: &CategoryId, force: bool) -> LedgerResult<ExpenseCategory> {
        if id.is_shared() {
            return Err(LedgerError::Validation(
                "The shared category cannot be deleted".into(),
            ));
        }

        let category = self
            .storage
            .household
            .get_category(id)?
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;

        if !category.expenses.is_empty() && !force {
            return Err(LedgerError::Validation(format!(
                "Category '{}' has {} expense(s); use --force to delete it anyway",
                category.name,
                category.expenses.len()
            )));
        }

        self.storage.household.delete_category(id)?;
        self.storage.household.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        info!(category = %category.id, expenses = category.expenses.len(), "deleted category");
        Ok(category)
    }

    /// Flip the persisted collapse flag, returning the new value
    pub fn toggle_collapsed(&self, id: &CategoryId) -> LedgerResult<bool> {
        let mut category = self
            .storage
            .household
            .get_category(id)?
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;

        category.collapsed = !category.collapsed;
        let collapsed = category.collapsed;
        self.storage.household.upsert_category(category)?;
        self.storage.household.save()?;

        debug!(category = %id, collapsed, "toggled category");
        Ok(collapsed)
    }

    // === Personal categories ===

    /// Create a personal sub-category
    pub fn create_personal(&self, name: &str) -> LedgerResult<PersonalExpenseCategory> {
        let name = name.trim();
        if self
            .storage
            .household
            .get_personal_category_by_name(name)?
            .is_some()
        {
            return Err(LedgerError::Duplicate {
                entity_type: "Personal Category",
                identifier: name.to_string(),
            });
        }

        let category = PersonalExpenseCategory::new(name);
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage
            .household
            .upsert_personal_category(category.clone())?;
        self.storage.household.save()?;

        self.storage.log_create(
            EntityType::PersonalCategory,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Find a personal category by name or ID string
    pub fn find_personal(&self, identifier: &str) -> LedgerResult<Option<PersonalExpenseCategory>> {
        if let Some(category) = self
            .storage
            .household
            .get_personal_category_by_name(identifier)?
        {
            return Ok(Some(category));
        }
        self.storage
            .household
            .get_personal_category(&PersonalCategoryId::from_string(identifier.trim()))
    }

    /// Find a personal category or fail with a not-found error
    pub fn resolve_personal(&self, identifier: &str) -> LedgerResult<PersonalExpenseCategory> {
        self.find_personal(identifier)?
            .ok_or_else(|| LedgerError::personal_category_not_found(identifier))
    }

    /// List personal categories
    pub fn list_personal(&self) -> LedgerResult<Vec<PersonalExpenseCategory>> {
        self.storage.household.get_all_personal_categories()
    }

    /// Rename a personal sub-category
    pub fn rename_personal(
        &self,
        id: &PersonalCategoryId,
        name: &str,
    ) -> LedgerResult<PersonalExpenseCategory> {
        let mut category = self
            .storage
            .household
            .get_personal_category(id)?
            .ok_or_else(|| LedgerError::personal_category_not_found(id.to_string()))?;
        let before = category.clone();

        let name = name.trim();
        if let Some(existing) = self.storage.household.get_personal_category_by_name(name)? {
            if &existing.id != id {
                return Err(LedgerError::Duplicate {
                    entity_type: "Personal Category",
                    identifier: name.to_string(),
                });
            }
        }

        category.name = name.to_string();
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage
            .household
            .upsert_personal_category(category.clone())?;
        self.storage.household.save()?;

        self.storage.log_update(
            EntityType::PersonalCategory,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a personal sub-category
    ///
    /// Expenses pointing at it keep the reference and are reported under
    /// Uncategorized from then on.
    pub fn delete_personal(&self, id: &PersonalCategoryId) -> LedgerResult<PersonalExpenseCategory> {
        let category = self
            .storage
            .household
            .delete_personal_category(id)?
            .ok_or_else(|| LedgerError::personal_category_not_found(id.to_string()))?;
        self.storage.household.save()?;

        self.storage.log_delete(
            EntityType::PersonalCategory,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }
}

/// Category fields worth auditing on rename (expenses are audited separately)
fn summary_of(category: &ExpenseCategory) -> serde_json::Value {
    serde_json::json!({
        "name": category.name,
        "collapsed": category.collapsed,
        "expenseCount": category.expenses.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::config::Settings;
    use crate::engine::group_personal_expenses;
    use crate::models::{Amount, Frequency, SplitStrategy};
    use crate::services::{ExpenseService, MemberService, NewExpense};
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let groceries = service.create("Groceries").unwrap();
        assert_eq!(service.resolve("groceries").unwrap().id, groceries.id);
        assert_eq!(service.resolve(groceries.id.as_str()).unwrap().name, "Groceries");
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert!(matches!(
            service.create("shared"),
            Err(LedgerError::Duplicate { .. })
        ));
        assert!(service.create("  ").unwrap_err().is_validation());
    }

    #[test]
    fn test_rename() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service.create("Food").unwrap();

        let renamed = service.rename(&category.id, "Groceries").unwrap();
        assert_eq!(renamed.name, "Groceries");
        assert!(matches!(
            service.rename(&category.id, "Shared"),
            Err(LedgerError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_shared_category_cannot_be_deleted() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let err = service.delete(&CategoryId::shared(), true).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_delete_non_empty_requires_force() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let ana = MemberService::new(&storage, &settings).approve("Ana").unwrap();
        let service = CategoryService::new(&storage);
        let category = service.create("Ana").unwrap();

        ExpenseService::new(&storage, &settings)
            .create(NewExpense {
                category_id: category.id.clone(),
                name: "Gym".into(),
                amount: Amount::new(40.0).unwrap(),
                frequency: Frequency::Monthly,
                split: SplitStrategy::Fixed {
                    owner: ana.id.clone(),
                },
                paid_by: ana.id.clone(),
                personal_category_id: None,
                is_budgeted: false,
            })
            .unwrap();

        assert!(service.delete(&category.id, false).unwrap_err().is_validation());
        let removed = service.delete(&category.id, true).unwrap();
        assert_eq!(removed.expenses.len(), 1);
        assert_eq!(storage.household.expense_count().unwrap(), 0);
    }

    #[test]
    fn test_toggle_collapsed_persists() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let shared = CategoryId::shared();

        assert!(service.toggle_collapsed(&shared).unwrap());
        assert!(storage.household.get_category(&shared).unwrap().unwrap().collapsed);
        assert!(!service.toggle_collapsed(&shared).unwrap());
    }

    #[test]
    fn test_personal_lifecycle_leaves_orphans() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let ana = MemberService::new(&storage, &settings).approve("Ana").unwrap();
        let service = CategoryService::new(&storage);

        let hobbies = service.create_personal("Hobbies").unwrap();
        let renamed = service.rename_personal(&hobbies.id, "Crafts").unwrap();
        assert_eq!(renamed.name, "Crafts");

        let expense = ExpenseService::new(&storage, &settings)
            .create(NewExpense {
                category_id: CategoryId::shared(),
                name: "Yarn".into(),
                amount: Amount::new(15.0).unwrap(),
                frequency: Frequency::Monthly,
                split: SplitStrategy::Fixed {
                    owner: ana.id.clone(),
                },
                paid_by: ana.id.clone(),
                personal_category_id: Some(hobbies.id.clone()),
                is_budgeted: true,
            })
            .unwrap();

        service.delete_personal(&hobbies.id).unwrap();
        assert!(service.list_personal().unwrap().is_empty());

        let groups = group_personal_expenses(&[expense], &service.list_personal().unwrap());
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_uncategorized());
    }
}
