//! Expense service
//!
//! Provides the expense lifecycle: create, partial update, delete, lookup and
//! listing, plus share computation and rebalancing of income-weighted splits.
//! Every mutation is validated in full before anything is written.

use tracing::{debug, info};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::engine::{
    compute_monthly_shares, compute_shares, default_percentage_shares, sort_expenses,
    validate_split, Shares, SortKey, SortOrder,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Amount, CategoryId, Expense, ExpenseId, Frequency, PersonalCategoryId, SplitStrategy, User,
    UserId,
};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// Input for creating a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category_id: CategoryId,
    pub name: String,
    pub amount: Amount,
    pub frequency: Frequency,
    /// A percentage split with no shares is filled with income-weighted defaults
    pub split: SplitStrategy,
    pub paid_by: UserId,
    pub personal_category_id: Option<PersonalCategoryId>,
    pub is_budgeted: bool,
}

/// Partial update for an existing expense
///
/// `None` leaves a field unchanged. `personal_category_id: Some(None)`
/// clears the sub-category.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub amount: Option<Amount>,
    pub frequency: Option<Frequency>,
    pub split: Option<SplitStrategy>,
    pub paid_by: Option<UserId>,
    pub personal_category_id: Option<Option<PersonalCategoryId>>,
    pub is_budgeted: Option<bool>,
    pub category_id: Option<CategoryId>,
}

impl ExpenseUpdate {
    /// Whether the update changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.frequency.is_none()
            && self.split.is_none()
            && self.paid_by.is_none()
            && self.personal_category_id.is_none()
            && self.is_budgeted.is_none()
            && self.category_id.is_none()
    }
}

/// Options for filtering expense listings
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category_id: Option<CategoryId>,
    /// `Some(true)` keeps shared expenses only, `Some(false)` personal only
    pub shared: Option<bool>,
    pub budgeted: Option<bool>,
}

/// An expense with the category holding it
#[derive(Debug, Clone)]
pub struct LocatedExpense {
    pub category_id: CategoryId,
    pub expense: Expense,
}

/// Checks that depend on the current household rather than the expense alone
#[derive(Debug, Clone, Copy)]
struct Checks {
    split: bool,
    personal_category: bool,
}

impl Checks {
    const ALL: Self = Self {
        split: true,
        personal_category: true,
    };
}

/// Per-member shares of one expense
#[derive(Debug, Clone)]
pub struct ExpenseShares {
    pub expense: Expense,
    /// Shares of the stated amount
    pub stated: Shares,
    /// Shares of the monthly-normalized amount
    pub monthly: Shares,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Create a new expense
    pub fn create(&self, input: NewExpense) -> LedgerResult<Expense> {
        let users = self.storage.household.get_all_users()?;

        self.storage
            .household
            .get_category(&input.category_id)?
            .ok_or_else(|| LedgerError::category_not_found(input.category_id.to_string()))?;

        let mut expense = Expense::new(
            input.name.trim(),
            input.amount,
            input.frequency,
            self.snapshot_split(input.split, &users)?,
            input.paid_by,
        )
        .budgeted(input.is_budgeted);
        expense.personal_category_id = input.personal_category_id;

        self.validate(&expense, &users, Checks::ALL)?;

        self.storage
            .household
            .insert_expense(&input.category_id, expense.clone())?;
        self.storage.household.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.name.clone()),
            &expense,
        )?;

        info!(expense = %expense.id, category = %input.category_id, split = %expense.split_type(), "created expense");
        Ok(expense)
    }

    /// Get an expense by ID
    pub fn get(&self, id: &ExpenseId) -> LedgerResult<Option<LocatedExpense>> {
        Ok(self
            .storage
            .household
            .find_expense(id)?
            .map(|(category_id, expense)| LocatedExpense {
                category_id,
                expense,
            }))
    }

    /// Find an expense by ID or name (case-insensitive)
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<LocatedExpense>> {
        let identifier = identifier.trim();
        if let Some(found) = self.get(&ExpenseId::from_string(identifier))? {
            return Ok(Some(found));
        }

        Ok(self
            .storage
            .household
            .find_expense_by_name(identifier, None)?
            .map(|(category_id, expense)| LocatedExpense {
                category_id,
                expense,
            }))
    }

    /// Find an expense or fail with a not-found error
    pub fn resolve(&self, identifier: &str) -> LedgerResult<LocatedExpense> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::expense_not_found(identifier))
    }

    /// List expenses matching a filter, sorted
    pub fn list(
        &self,
        filter: &ExpenseFilter,
        key: SortKey,
        order: SortOrder,
    ) -> LedgerResult<Vec<Expense>> {
        let expenses: Vec<Expense> = self
            .storage
            .household
            .get_all_categories()?
            .into_iter()
            .filter(|c| filter.category_id.as_ref().map_or(true, |id| &c.id == id))
            .flat_map(|c| c.expenses)
            .filter(|e| filter.shared.map_or(true, |shared| e.is_shared() == shared))
            .filter(|e| filter.budgeted.map_or(true, |b| e.is_budgeted == b))
            .collect();

        Ok(sort_expenses(&expenses, key, order))
    }

    /// Apply a partial update
    ///
    /// The updated expense keeps its id and position. If any field is
    /// invalid the stored expense is left untouched. The split and the
    /// personal category are only checked against the household when the
    /// update sets them, so a stored snapshot or an orphaned sub-category
    /// never blocks an unrelated edit.
    pub fn update(&self, id: &ExpenseId, changes: ExpenseUpdate) -> LedgerResult<Expense> {
        let (current_category, before) = self
            .storage
            .household
            .find_expense(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;

        let users = self.storage.household.get_all_users()?;
        let mut expense = before.clone();
        let checks = Checks {
            split: changes.split.is_some(),
            personal_category: matches!(changes.personal_category_id, Some(Some(_))),
        };

        if let Some(name) = changes.name {
            expense.name = name.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(frequency) = changes.frequency {
            expense.frequency = frequency;
        }
        if let Some(split) = changes.split {
            expense.split = self.snapshot_split(split, &users)?;
        }
        if let Some(paid_by) = changes.paid_by {
            expense.paid_by = paid_by;
        }
        if let Some(personal) = changes.personal_category_id {
            expense.personal_category_id = personal;
        }
        if let Some(is_budgeted) = changes.is_budgeted {
            expense.is_budgeted = is_budgeted;
        }

        self.validate(&expense, &users, checks)?;

        match changes.category_id {
            Some(target) if target != current_category => {
                self.storage
                    .household
                    .get_category(&target)?
                    .ok_or_else(|| LedgerError::category_not_found(target.to_string()))?;
                self.storage.household.remove_expense(id)?;
                self.storage.household.insert_expense(&target, expense.clone())?;
                debug!(expense = %id, from = %current_category, to = %target, "moved expense");
            }
            _ => self.storage.household.replace_expense(expense.clone())?,
        }
        self.storage.household.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.name.clone()),
            &before,
            &expense,
        )?;

        info!(expense = %expense.id, "updated expense");
        Ok(expense)
    }

    /// Delete an expense
    pub fn delete(&self, id: &ExpenseId) -> LedgerResult<Expense> {
        let (category_id, expense) = self
            .storage
            .household
            .remove_expense(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
        self.storage.household.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.name.clone()),
            &expense,
        )?;

        info!(expense = %expense.id, category = %category_id, "deleted expense");
        Ok(expense)
    }

    /// Each member's share of an expense, stated and monthly
    pub fn shares(&self, id: &ExpenseId) -> LedgerResult<ExpenseShares> {
        let (_, expense) = self
            .storage
            .household
            .find_expense(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
        let users = self.storage.household.get_all_users()?;

        let stated = compute_shares(&expense, &users)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        let monthly = compute_monthly_shares(&expense, &users)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        Ok(ExpenseShares {
            expense,
            stated,
            monthly,
        })
    }

    /// Recompute a percentage split from current member incomes
    pub fn rebalance(&self, id: &ExpenseId) -> LedgerResult<Expense> {
        let located = self
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;

        if !matches!(located.expense.split, SplitStrategy::Percentage { .. }) {
            return Err(LedgerError::Validation(format!(
                "Only percentage splits can be rebalanced ('{}' uses a {} split)",
                located.expense.name,
                located.expense.split_type()
            )));
        }

        self.update(
            id,
            ExpenseUpdate {
                split: Some(SplitStrategy::Percentage {
                    shares: Default::default(),
                }),
                ..Default::default()
            },
        )
    }

    /// Rebalance every percentage split, returning the updated expenses
    ///
    /// Either every percentage split is rebalanced or none is: all of them
    /// are validated before the first one is written.
    pub fn rebalance_all(&self) -> LedgerResult<Vec<Expense>> {
        let targets: Vec<Expense> = self
            .list(&ExpenseFilter::default(), SortKey::Name, SortOrder::Asc)?
            .into_iter()
            .filter(|e| matches!(e.split, SplitStrategy::Percentage { .. }))
            .collect();

        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.storage.household.get_all_users()?;
        let shares =
            default_percentage_shares(&users).map_err(|e| LedgerError::Validation(e.to_string()))?;

        let mut rebalanced = Vec::with_capacity(targets.len());
        for before in &targets {
            let mut after = before.clone();
            after.split = SplitStrategy::Percentage {
                shares: shares.clone(),
            };
            self.validate(
                &after,
                &users,
                Checks {
                    split: true,
                    personal_category: false,
                },
            )
            .map_err(|e| {
                LedgerError::Validation(format!(
                    "Nothing rebalanced; '{}' failed: {}",
                    before.name, e
                ))
            })?;
            rebalanced.push(after);
        }

        for expense in &rebalanced {
            self.storage.household.replace_expense(expense.clone())?;
        }
        self.storage.household.save()?;

        for (before, after) in targets.iter().zip(&rebalanced) {
            self.storage.log_update(
                EntityType::Expense,
                after.id.to_string(),
                Some(after.name.clone()),
                before,
                after,
            )?;
        }

        info!(count = rebalanced.len(), "rebalanced percentage splits");
        Ok(rebalanced)
    }

    /// Fill an empty percentage split with the income-weighted default
    fn snapshot_split(&self, split: SplitStrategy, users: &[User]) -> LedgerResult<SplitStrategy> {
        match split {
            SplitStrategy::Percentage { shares } if shares.is_empty() => {
                let shares = default_percentage_shares(users)
                    .map_err(|e| LedgerError::Validation(e.to_string()))?;
                debug!(members = shares.len(), "snapshotted income-weighted shares");
                Ok(SplitStrategy::Percentage { shares })
            }
            other => Ok(other),
        }
    }

    fn validate(&self, expense: &Expense, users: &[User], checks: Checks) -> LedgerResult<()> {
        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if checks.split {
            validate_split(&expense.split, users, self.settings.split_tolerance)
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
        }

        if !users.iter().any(|u| u.id == expense.paid_by) {
            return Err(LedgerError::Validation(format!(
                "Payer is not a household member: {}",
                expense.paid_by
            )));
        }

        if let Some(personal_id) = expense
            .personal_category_id
            .as_ref()
            .filter(|_| checks.personal_category)
        {
            if self
                .storage
                .household
                .get_personal_category(personal_id)?
                .is_none()
            {
                return Err(LedgerError::personal_category_not_found(personal_id.to_string()));
            }
        }

        Ok(())
    }
}
