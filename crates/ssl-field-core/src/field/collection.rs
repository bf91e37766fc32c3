//! Keeps a record collection, its tree node and its count leaf in sync.

use std::sync::Arc;

use crate::error::FieldError;
use crate::record::FieldMarking;
use crate::var::{VarInt, VarList};

pub(super) fn count_value(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Rebuilds `records` from the children of `list`.
///
/// Children already backing a record keep it; other children are adopted,
/// or removed from `list` if they do not match the record schema. Records
/// whose node is no longer a child are dropped. The result follows the
/// child order of `list`.
pub(super) fn reconcile<R: FieldMarking>(records: &mut Vec<R>, list: &VarList, count: &VarInt) {
    let mut previous: Vec<Option<R>> = records.drain(..).map(Some).collect();
    let mut adopted = 0usize;

    for child in list.children() {
        let existing = previous
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|r| Arc::ptr_eq(r.node(), &child)))
            .and_then(Option::take);
        if let Some(record) = existing {
            records.push(record);
            continue;
        }

        match R::from_var_list(&child) {
            Ok(record) => {
                records.push(record);
                adopted += 1;
            }
            Err(err) => {
                tracing::warn!(
                    "[field] Dropping malformed {} '{}': {err}",
                    R::KIND,
                    child.name()
                );
                list.remove_child(&child);
            }
        }
    }

    let stale = previous.into_iter().flatten().count();
    count.set(count_value(records.len()));
    tracing::debug!(
        "[field] Reconciled {} {}s ({adopted} adopted, {stale} dropped)",
        records.len(),
        R::KIND
    );
}

/// Appends default records or drops trailing ones until `records` matches
/// the value of `count`. Negative counts mean zero.
pub(super) fn resize<R: FieldMarking>(records: &mut Vec<R>, list: &VarList, count: &VarInt) {
    let target = usize::try_from(count.get()).unwrap_or(0);
    let old_len = records.len();

    if target < old_len {
        for record in records.drain(target..) {
            list.remove_child(record.node());
        }
    }
    while records.len() < target {
        let record = R::with_name(&R::default_name(records.len()));
        list.add_child(Arc::clone(record.node()));
        records.push(record);
    }

    count.set(count_value(records.len()));
    if old_len != records.len() {
        tracing::debug!("[field] Resized {}s: {old_len} -> {}", R::KIND, records.len());
    }
}

/// Verifies that `records`, the children of `list` and `count` agree, and
/// that record `i` is backed by child `i`.
pub(super) fn check<R: FieldMarking>(
    records: &[R],
    list: &VarList,
    count: &VarInt,
) -> Result<(), FieldError> {
    let children = list.children();
    if records.len() != children.len() || count.get() != count_value(records.len()) {
        return Err(FieldError::Inconsistent {
            kind: R::KIND,
            records: records.len(),
            children: children.len(),
            count: count.get(),
        });
    }
    match records
        .iter()
        .zip(&children)
        .position(|(record, child)| !Arc::ptr_eq(record.node(), child))
    {
        Some(index) => Err(FieldError::Misplaced {
            kind: R::KIND,
            index,
        }),
        None => Ok(()),
    }
}
