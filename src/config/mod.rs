/*!
Configuration of a solve.

One aggregate `Config` struct holds the knobs of a solve, rather than
threading individual parameters through every call: which constraint
families are active, the deadline, and whether to pay for a uniqueness
check.
*/

use std::time::Duration;

use crate::instance::ConstraintFamily;

/// Which constraint families are encoded and checked during a solve.
///
/// Authorization is effectively mandatory — disabling it is a
/// caller-owned decision the interface tolerates rather than one it
/// recommends; without it every step may be assigned to any user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActiveConstraints {
    pub authorization: bool,
    pub separation_of_duty: bool,
    pub binding_of_duty: bool,
    pub at_most_k: bool,
    pub one_team: bool,
    pub super_user_at_least: bool,
    pub wang_li: bool,
    pub assignment_dependent: bool,
}

impl ActiveConstraints {
    /// Every constraint family enabled — the CLI's default.
    pub const fn all() -> Self {
        ActiveConstraints {
            authorization: true,
            separation_of_duty: true,
            binding_of_duty: true,
            at_most_k: true,
            one_team: true,
            super_user_at_least: true,
            wang_li: true,
            assignment_dependent: true,
        }
    }

    /// Whether a given family is active.
    pub fn is_active(&self, family: ConstraintFamily) -> bool {
        match family {
            ConstraintFamily::Authorization => self.authorization,
            ConstraintFamily::SeparationOfDuty => self.separation_of_duty,
            ConstraintFamily::BindingOfDuty => self.binding_of_duty,
            ConstraintFamily::AtMostK => self.at_most_k,
            ConstraintFamily::OneTeam => self.one_team,
            ConstraintFamily::SuperUserAtLeast => self.super_user_at_least,
            ConstraintFamily::WangLi => self.wang_li,
            ConstraintFamily::AssignmentDependent => self.assignment_dependent,
        }
    }

    /// Disables a family, returning the updated set (builder-style, for
    /// concise toggling in tests and the CLI).
    pub fn without(mut self, family: ConstraintFamily) -> Self {
        match family {
            ConstraintFamily::Authorization => self.authorization = false,
            ConstraintFamily::SeparationOfDuty => self.separation_of_duty = false,
            ConstraintFamily::BindingOfDuty => self.binding_of_duty = false,
            ConstraintFamily::AtMostK => self.at_most_k = false,
            ConstraintFamily::OneTeam => self.one_team = false,
            ConstraintFamily::SuperUserAtLeast => self.super_user_at_least = false,
            ConstraintFamily::WangLi => self.wang_li = false,
            ConstraintFamily::AssignmentDependent => self.assignment_dependent = false,
        }
        self
    }
}

impl Default for ActiveConstraints {
    fn default() -> Self {
        Self::all()
    }
}

/// The primary configuration structure for a [Context](crate::context::Context).
#[derive(Clone, Debug)]
pub struct Config {
    /// Which constraint families to encode and check.
    pub active: ActiveConstraints,

    /// The time budget for a single `solve` call. A zero duration means no
    /// deadline.
    pub deadline: Duration,

    /// Whether to run the blocking-assignment uniqueness search after the
    /// first model is found. Disabling this leaves
    /// [Outcome::Sat::unique](crate::solve::Outcome::Sat) at
    /// [Tri::Unknown](crate::solve::Tri), saving a second search when the
    /// caller only needs *a* solution.
    pub check_uniqueness: bool,
}

impl Default for Config {
    /// The default configuration: every constraint family active, no
    /// deadline, and uniqueness checked.
    fn default() -> Self {
        Config {
            active: ActiveConstraints::default(),
            deadline: Duration::from_secs(0),
            check_uniqueness: true,
        }
    }
}

impl Config {
    /// Whether a deadline has been set at all.
    pub fn has_deadline(&self) -> bool {
        !self.deadline.is_zero()
    }
}
