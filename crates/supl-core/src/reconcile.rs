//! Conflict resolution between whole-class cancellations and subgroup rows.
//!
//! Raw exports often carry, for the same timetable slot, a cancellation of
//! the whole class next to one or more substitutions for a subgroup (a class
//! split into elective groups where only one group is actually replaced).
//! [`reconcile`] collapses every `(Class, Period)` slot into the rows that
//! should be shown:
//!
//! 1. Records are grouped by [`SlotKey`], keeping first-seen order of slots
//!    and of records within a slot.
//! 2. A record with no group and a cancelled resolution is the slot's general
//!    cancellation. If several exist, the last one in document order wins.
//! 3. If the slot has at least one record that is not a cancellation, only
//!    those records are emitted. Each of them with an empty note receives
//!    `"in place of <subject>"` taken from the general cancellation.
//! 4. Otherwise the general cancellation is emitted alone, or, if there is
//!    none, the slot is emitted unchanged.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::record::{CandidateRecord, IN_PLACE_OF_PREFIX, SlotKey};

/// Reconciles candidate records into one authoritative set of rows per slot.
///
/// Running it again on its own output returns that output unchanged.
pub fn reconcile(records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    let total = records.len();
    let slots = group_by_slot(records);
    let slot_count = slots.len();

    let reconciled: Vec<CandidateRecord> = slots.into_iter().flat_map(reconcile_slot).collect();

    debug!(
        input = total,
        slots = slot_count,
        output = reconciled.len(),
        "reconciled substitution records"
    );
    reconciled
}

/// Groups records by slot, preserving first-seen order.
fn group_by_slot(records: Vec<CandidateRecord>) -> Vec<Vec<CandidateRecord>> {
    let mut positions: HashMap<SlotKey, usize> = HashMap::new();
    let mut slots: Vec<Vec<CandidateRecord>> = Vec::new();

    for record in records {
        match positions.entry(record.slot_key()) {
            Entry::Occupied(entry) => slots[*entry.get()].push(record),
            Entry::Vacant(entry) => {
                entry.insert(slots.len());
                slots.push(vec![record]);
            }
        }
    }

    slots
}

fn reconcile_slot(records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    let mut general: Option<CandidateRecord> = None;
    let mut specific = Vec::with_capacity(records.len());

    for record in records {
        if record.is_general_cancellation() {
            if let Some(previous) = general.replace(record) {
                debug!(
                    class = %previous.class,
                    period = %previous.period,
                    "duplicate general cancellation, keeping the later one"
                );
            }
        } else {
            specific.push(record);
        }
    }

    if specific.iter().any(CandidateRecord::is_substitution) {
        let mut substitutions: Vec<CandidateRecord> = specific
            .into_iter()
            .filter(CandidateRecord::is_substitution)
            .collect();

        if let Some(cancelled) = general.as_ref() {
            backfill_notes(&mut substitutions, cancelled);
        }
        return substitutions;
    }

    match general {
        Some(cancelled) => vec![cancelled],
        None => specific,
    }
}

fn backfill_notes(substitutions: &mut [CandidateRecord], cancelled: &CandidateRecord) {
    let subject = cancelled.subject.trim();
    if subject.is_empty() {
        return;
    }

    for record in substitutions
        .iter_mut()
        .filter(|r| r.note.trim().is_empty())
    {
        record.note = format!("{IN_PLACE_OF_PREFIX} {subject}");
    }
}
