/*!
The eight constraint kinds, and the opaque id every constraint carries.
*/

use super::{Step, User};

/// An opaque identifier for a constraint, stable for the lifetime of an
/// instance. Assigned in declaration order by [parse](crate::parse)
/// starting from zero; used to report conflicts and violations without
/// re-deriving "which constraint was this" from its contents.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub u32);

impl std::fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the eight constraint families, plus the implicit Authorization
/// family which is represented explicitly so it may be toggled
/// independently of the matrix it reads.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ConstraintFamily {
    Authorization,
    SeparationOfDuty,
    BindingOfDuty,
    AtMostK,
    OneTeam,
    SuperUserAtLeast,
    WangLi,
    AssignmentDependent,
}

impl ConstraintFamily {
    /// All families, in deterministic encoding order: Authorization first,
    /// then SoD, BoD, AtMostK, OneTeam, SUAL, WangLi, AssignmentDependent.
    pub const ENCODING_ORDER: [ConstraintFamily; 8] = [
        ConstraintFamily::Authorization,
        ConstraintFamily::SeparationOfDuty,
        ConstraintFamily::BindingOfDuty,
        ConstraintFamily::AtMostK,
        ConstraintFamily::OneTeam,
        ConstraintFamily::SuperUserAtLeast,
        ConstraintFamily::WangLi,
        ConstraintFamily::AssignmentDependent,
    ];
}

impl std::fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Authorization => "authorization",
            Self::SeparationOfDuty => "separation-of-duty",
            Self::BindingOfDuty => "binding-of-duty",
            Self::AtMostK => "at-most-k",
            Self::OneTeam => "one-team",
            Self::SuperUserAtLeast => "super-user-at-least",
            Self::WangLi => "wang-li",
            Self::AssignmentDependent => "assignment-dependent",
        };
        write!(f, "{name}")
    }
}

/// The data carried by one constraint, tagged by family. A plain sum type
/// rather than a trait object per the "dynamic polymorphism over constraint
/// kinds" design note: one dispatch table (see
/// [constraints](crate::constraints)) is keyed on this tag rather than one
/// class per kind.
#[derive(Clone, Debug)]
pub enum ConstraintKind {
    /// `s1 != s2`; `assignee(s1) != assignee(s2)`.
    SeparationOfDuty { s1: Step, s2: Step },

    /// `assignee(s1) == assignee(s2)`.
    BindingOfDuty { s1: Step, s2: Step },

    /// No user appears in more than `k` of `steps`. `k >= 1`, `steps.len() >= 2`.
    AtMostK { k: usize, steps: Vec<Step> },

    /// Every assignee of a step in `steps` lies in some single team of `teams`.
    OneTeam {
        steps: Vec<Step>,
        teams: Vec<Vec<User>>,
    },

    /// If the number of distinct users assigned over `steps` is `<= h`, at
    /// least one of them must be in `supers`.
    SuperUserAtLeast {
        steps: Vec<Step>,
        h: usize,
        supers: Vec<User>,
    },

    /// Like [OneTeam](ConstraintKind::OneTeam), with `departments` as the
    /// covering sets.
    WangLi {
        steps: Vec<Step>,
        departments: Vec<Vec<User>>,
    },

    /// If `assignee(s1)` is in `source`, `assignee(s2)` must be in `target`.
    AssignmentDependent {
        s1: Step,
        s2: Step,
        source: Vec<User>,
        target: Vec<User>,
    },
}

impl ConstraintKind {
    /// The family this constraint belongs to.
    pub fn family(&self) -> ConstraintFamily {
        match self {
            Self::SeparationOfDuty { .. } => ConstraintFamily::SeparationOfDuty,
            Self::BindingOfDuty { .. } => ConstraintFamily::BindingOfDuty,
            Self::AtMostK { .. } => ConstraintFamily::AtMostK,
            Self::OneTeam { .. } => ConstraintFamily::OneTeam,
            Self::SuperUserAtLeast { .. } => ConstraintFamily::SuperUserAtLeast,
            Self::WangLi { .. } => ConstraintFamily::WangLi,
            Self::AssignmentDependent { .. } => ConstraintFamily::AssignmentDependent,
        }
    }

    /// The steps this constraint's scope touches, in the order relevant to
    /// decomposing it into per-step effects (used when building the
    /// constraint graph for variable ordering, see
    /// [solve](crate::solve::search)).
    pub fn scope(&self) -> Vec<Step> {
        match self {
            Self::SeparationOfDuty { s1, s2 } | Self::BindingOfDuty { s1, s2 } => vec![*s1, *s2],
            Self::AtMostK { steps, .. } | Self::OneTeam { steps, .. } => steps.clone(),
            Self::SuperUserAtLeast { steps, .. } | Self::WangLi { steps, .. } => steps.clone(),
            Self::AssignmentDependent { s1, s2, .. } => vec![*s1, *s2],
        }
    }
}

/// One constraint: an opaque id plus its tagged data.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub id: ConstraintId,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn new(id: ConstraintId, kind: ConstraintKind) -> Self {
        Constraint { id, kind }
    }
}
