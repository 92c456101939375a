// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::{Budget, BudgetWithDetails, Transaction, TransactionType};
use crate::utils::prev_month_key;

/// Sum of expense amounts for one category in one YYYY-MM month. Matching
/// is a string-prefix match of the ISO date against the month key.
fn spent_in_month(transactions: &[Transaction], category: &str, month_year: &str) -> Decimal {
    transactions
        .iter()
        .filter(|t| {
            t.r#type == TransactionType::Expense
                && t.category == category
                && t.date.to_string().starts_with(month_year)
        })
        .map(|t| t.amount)
        .sum()
}

/// Budgets for one month with computed spent, rollover, and effective target.
///
/// Rollover consults exactly one month back, and only when both this budget
/// and the prior month's budget for the same category opted in. The carry
/// can be negative (overspend travels forward as a debit); the effective
/// target never drops below zero. Duplicate budgets for one
/// (category, month) pair are each computed independently.
pub fn budgets_for_month(
    month_year: &str,
    transactions: &[Transaction],
    budgets: &[Budget],
) -> Vec<BudgetWithDetails> {
    budgets
        .iter()
        .filter(|b| b.month_year == month_year)
        .map(|budget| {
            let spent = spent_in_month(transactions, &budget.category, &budget.month_year);

            let mut rollover = Decimal::ZERO;
            let mut effective = budget.target_amount;

            if budget.allow_rollover {
                if let Ok(prev_month) = prev_month_key(&budget.month_year) {
                    let prior = budgets.iter().find(|b| {
                        b.category == budget.category
                            && b.month_year == prev_month
                            && b.allow_rollover
                    });
                    if let Some(prior) = prior {
                        let spent_prior =
                            spent_in_month(transactions, &prior.category, &prior.month_year);
                        rollover = prior.target_amount - spent_prior;
                        effective += rollover;
                    }
                }
            }

            BudgetWithDetails {
                budget: budget.clone(),
                spent_amount: spent,
                rollover_amount: rollover,
                effective_target_amount: effective.max(Decimal::ZERO),
            }
        })
        .collect()
}
