//! Bounding-box collision pass.
//!
//! A pass takes one subject and sweeps it against every live actor; each
//! overlapping pair is notified in both directions. The world runs a pass per
//! shot and one for the player, never the full n² pair set.

use crate::entities::Actor;

/// Sweep `subject` against `others`, notifying both sides of every overlap.
///
/// Actors already pending removal count as absent and are skipped. Returns the
/// number of overlapping pairs found.
///
/// A pair is notified once per side per pass. Two overlapping shots are both
/// pass subjects, so such a pair sees two passes in one step; shot responses
/// must not depend on being told only once.
pub fn collide(others: &mut [Actor], subject: &mut Actor) -> usize {
    let bounds = subject.bounds();
    let mut hits = 0;
    for other in others.iter_mut() {
        if other.is_removal_pending() || !bounds.intersects(&other.bounds()) {
            continue;
        }
        let other_kind = other.kind;
        other.on_collision(&subject.kind);
        subject.on_collision(&other_kind);
        hits += 1;
    }
    hits
}

/// Run a pass for the actor at `index` against the rest of the slice. An
/// index past the end runs no pass.
pub fn collide_at(actors: &mut [Actor], index: usize) -> usize {
    if index >= actors.len() {
        return 0;
    }
    let (before, rest) = actors.split_at_mut(index);
    let Some((subject, after)) = rest.split_first_mut() else {
        return 0;
    };
    collide(before, subject) + collide(after, subject)
}
