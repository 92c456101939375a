// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Datelike, Days, NaiveDate};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    NewRecurringTransaction, NewTransaction, RecurringFrequency, RecurringTransaction,
    DEFAULT_USER_ID,
};
use crate::repo;
use crate::store::{Store, RECURRING_KEY};
use crate::utils::{days_in_month, new_record_id};

#[derive(Debug, Error)]
pub enum AdvanceError {
    #[error("no representable {frequency} due date after {from}")]
    OutOfRange {
        frequency: &'static str,
        from: NaiveDate,
    },
}

/// The next due date after `current` for the given frequency.
///
/// MONTHLY keeps the start date's day-of-month as the anchor, clamped to the
/// length of the target month: a template anchored on the 31st lands on the
/// 28th/29th/30th in short months and returns to the 31st afterwards.
/// YEARLY re-anchors to the start date's month and day in the following year.
pub fn advance_due_date(
    current: NaiveDate,
    frequency: RecurringFrequency,
    start: NaiveDate,
) -> Result<NaiveDate, AdvanceError> {
    let out_of_range = || AdvanceError::OutOfRange {
        frequency: frequency.as_str(),
        from: current,
    };
    match frequency {
        RecurringFrequency::Daily => current.checked_add_days(Days::new(1)).ok_or_else(out_of_range),
        RecurringFrequency::Weekly => current.checked_add_days(Days::new(7)).ok_or_else(out_of_range),
        RecurringFrequency::Monthly => {
            let (year, month) = if current.month() == 12 {
                (current.year() + 1, 1)
            } else {
                (current.year(), current.month() + 1)
            };
            let day = start.day().min(days_in_month(year, month));
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_range)
        }
        RecurringFrequency::Yearly => {
            NaiveDate::from_ymd_opt(current.year() + 1, start.month(), start.day())
                .ok_or_else(out_of_range)
        }
    }
}

#[derive(Debug, Default)]
pub struct ProcessOutcome {
    pub created_count: usize,
    pub errors: Vec<String>,
}

/// Walk every active template up to `today`, materializing one transaction
/// per missed due date. Templates past their end date deactivate without
/// generating the overshoot instance; templates whose due date cannot be
/// advanced are deactivated and reported, so a bad template never spins
/// forever on subsequent runs. All templates are written back in one
/// full-collection save at the end.
pub fn process_due(store: &Store, today: NaiveDate) -> Result<ProcessOutcome> {
    let mut templates: Vec<RecurringTransaction> = store.load(RECURRING_KEY);
    let mut outcome = ProcessOutcome::default();

    for rtx in templates.iter_mut() {
        if !rtx.is_active {
            continue;
        }

        while rtx.is_active && rtx.next_due_date <= today {
            if let Some(end) = rtx.end_date {
                if rtx.next_due_date > end {
                    rtx.is_active = false;
                    break;
                }
            }

            // Already materialized for this due date by a prior partial run;
            // advance without creating a duplicate.
            if rtx.last_generated_date == Some(rtx.next_due_date) {
                debug!(
                    "instance for '{}' on {} already generated, advancing",
                    rtx.description, rtx.next_due_date
                );
                match advance_due_date(rtx.next_due_date, rtx.frequency, rtx.start_date) {
                    Ok(next) => rtx.next_due_date = next,
                    Err(e) => {
                        outcome
                            .errors
                            .push(format!("{}: {}", rtx.description, e));
                        rtx.is_active = false;
                        break;
                    }
                }
                continue;
            }

            repo::add(
                store,
                NewTransaction {
                    description: rtx.description.clone(),
                    amount: rtx.amount,
                    r#type: rtx.r#type,
                    category: rtx.category.clone(),
                    date: rtx.next_due_date,
                    tags: rtx.tags.clone(),
                },
            )?;
            outcome.created_count += 1;
            rtx.last_generated_date = Some(rtx.next_due_date);

            match advance_due_date(rtx.next_due_date, rtx.frequency, rtx.start_date) {
                Ok(next) => rtx.next_due_date = next,
                Err(e) => {
                    outcome
                        .errors
                        .push(format!("{}: {}", rtx.description, e));
                    rtx.is_active = false;
                    break;
                }
            }

            if let Some(end) = rtx.end_date {
                if rtx.next_due_date > end {
                    rtx.is_active = false;
                }
            }
        }
    }

    store.save(RECURRING_KEY, &templates)?;
    Ok(outcome)
}

pub fn get_all(store: &Store) -> Vec<RecurringTransaction> {
    store.load(RECURRING_KEY)
}

/// New templates start active with the first instance due on the start date.
pub fn add(store: &Store, data: NewRecurringTransaction) -> Result<RecurringTransaction> {
    let mut templates = get_all(store);
    let rtx = RecurringTransaction {
        id: new_record_id("rectxn"),
        user_id: DEFAULT_USER_ID.to_string(),
        description: data.description,
        amount: data.amount,
        r#type: data.r#type,
        category: data.category,
        frequency: data.frequency,
        start_date: data.start_date,
        end_date: data.end_date,
        next_due_date: data.start_date,
        last_generated_date: None,
        is_active: true,
        tags: data.tags,
    };
    templates.push(rtx.clone());
    store.save(RECURRING_KEY, &templates)?;
    Ok(rtx)
}

/// Replace a template in place. When the start date changes before any
/// instance was generated, the due date re-seeds to the new start date.
pub fn update(store: &Store, mut updated: RecurringTransaction) -> Result<Option<RecurringTransaction>> {
    let mut templates = get_all(store);
    let Some(index) = templates.iter().position(|t| t.id == updated.id) else {
        warn!("recurring transaction '{}' not found for update", updated.id);
        return Ok(None);
    };
    if templates[index].start_date != updated.start_date && updated.last_generated_date.is_none() {
        updated.next_due_date = updated.start_date;
    }
    templates[index] = updated.clone();
    store.save(RECURRING_KEY, &templates)?;
    Ok(Some(updated))
}

/// Flip the active flag. Re-activation does not recompute the due date;
/// catch-up happens on the next processing run.
pub fn toggle(store: &Store, id: &str) -> Result<Option<bool>> {
    let mut templates = get_all(store);
    let Some(rtx) = templates.iter_mut().find(|t| t.id == id) else {
        warn!("recurring transaction '{}' not found for toggle", id);
        return Ok(None);
    };
    rtx.is_active = !rtx.is_active;
    let now_active = rtx.is_active;
    store.save(RECURRING_KEY, &templates)?;
    Ok(Some(now_active))
}

/// Hard delete. Already-materialized transactions are unaffected.
pub fn delete(store: &Store, id: &str) -> Result<bool> {
    let mut templates = get_all(store);
    let before = templates.len();
    templates.retain(|t| t.id != id);
    if templates.len() == before {
        warn!("recurring transaction '{}' not found for deletion", id);
        return Ok(false);
    }
    store.save(RECURRING_KEY, &templates)?;
    Ok(true)
}
