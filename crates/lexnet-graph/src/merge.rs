//! Merging annotation session tapes.
//!
//! A merge folds a reference tape (usually the target session's prior
//! state) into an incoming tape. An incoming edit supersedes the
//! reference record with the same id; reference records nobody touched
//! are carried over and re-tagged to the merge-target session.

use lexnet_core::{AnnotAction, AnnotId, AnnotRecord};
use std::collections::HashSet;

/// Merges `incoming` over `reference`, producing the combined tape.
///
/// Incoming deletes of a referenced id drop both records; incoming
/// deletes of an unknown id are kept so a later merge can still apply
/// them.
pub fn merge(
    incoming: &[AnnotRecord],
    reference: &[AnnotRecord],
    target_session: &str,
) -> Vec<AnnotRecord> {
    let reference_ids: HashSet<&AnnotId> = reference.iter().map(|rec| &rec.annot_id).collect();
    let mut superseded: HashSet<&AnnotId> = HashSet::new();

    let mut out = Vec::new();
    for rec in incoming {
        if reference_ids.contains(&rec.annot_id) {
            superseded.insert(&rec.annot_id);
            if rec.action != AnnotAction::Delete {
                out.push(rec.clone());
            }
        } else {
            out.push(rec.clone());
        }
    }
    for rec in reference {
        if superseded.contains(&rec.annot_id) {
            continue;
        }
        let mut carried = rec.clone();
        carried.session = target_session.to_string();
        out.push(carried);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexnet_core::EntityKind;

    fn edit(id: &str, session: &str) -> AnnotRecord {
        AnnotRecord::new(
            AnnotId::node(id),
            AnnotAction::Edit,
            EntityKind::Sense,
            session,
        )
    }

    fn delete(id: &str, session: &str) -> AnnotRecord {
        AnnotRecord::new(
            AnnotId::node(id),
            AnnotAction::Delete,
            EntityKind::Sense,
            session,
        )
    }

    #[test]
    fn test_incoming_edit_supersedes_reference() {
        let incoming = vec![edit("x1", "sess")];
        let reference = vec![edit("x1", "base"), edit("x2", "base")];

        let merged = merge(&incoming, &reference, "base");
        assert_eq!(merged.len(), 2);
        // The incoming version of x1 wins and keeps its own session.
        assert_eq!(merged[0].annot_id, AnnotId::node("x1"));
        assert_eq!(merged[0].session, "sess");
        // The untouched reference record is carried over, re-tagged.
        assert_eq!(merged[1].annot_id, AnnotId::node("x2"));
        assert_eq!(merged[1].session, "base");
    }

    #[test]
    fn test_delete_of_referenced_id_drops_both() {
        let incoming = vec![delete("x1", "sess")];
        let reference = vec![edit("x1", "base")];

        let merged = merge(&incoming, &reference, "base");
        assert!(merged.is_empty());
    }

    #[test]
    fn test_delete_of_unknown_id_is_kept() {
        let incoming = vec![delete("ghost", "sess")];
        let reference = vec![edit("x1", "base")];

        let merged = merge(&incoming, &reference, "base");
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].action, AnnotAction::Delete);
    }

    #[test]
    fn test_carried_records_are_retagged() {
        let incoming = vec![edit("a", "sess")];
        let reference = vec![edit("b", "old_session")];

        let merged = merge(&incoming, &reference, "merged");
        assert_eq!(merged[1].session, "merged");
    }

    #[test]
    fn test_merging_a_tape_with_itself_is_idempotent() {
        let tape = vec![edit("a", "sess"), edit("b", "sess")];
        let merged = merge(&tape, &tape, "sess");
        assert_eq!(merged, tape);
    }
}
