/*!
The verifier (C8): an independent re-check of a candidate assignment
against every active constraint.

Deliberately thin — it does not consult anything the back-end built during
search, only the [Instance](crate::instance::Instance) and the
[Assignment](crate::instance::Assignment) themselves, calling the same
[ConstraintCapability::verify](crate::constraints::ConstraintCapability::verify)
each constraint's `encode` was supposed to make true. A [Context](crate::context::Context)
treats a non-empty result here as proof of a back-end bug: a `Sat`
outcome carrying violations must be reported as
[InternalError::VerifierFoundViolations](crate::types::err::InternalError::VerifierFoundViolations),
never returned to the caller as-is.
*/

use crate::config::ActiveConstraints;
use crate::constraints::{ConstraintCapability, Violation};
use crate::instance::{Assignment, Instance};

/// Re-evaluates every constraint family `active` turns on against
/// `assignment`, independent of how (or whether) the back-end encoded it.
/// Constraints of an inactive family are skipped; `active_constraints` is
/// the single source of truth for what a solve was asked to respect.
pub fn verify(instance: &Instance, assignment: &Assignment, active: &ActiveConstraints) -> Vec<Violation> {
    instance
        .constraints()
        .iter()
        .filter(|c| active.is_active(c.kind.family()))
        .flat_map(|c| c.verify(assignment))
        .collect()
}
