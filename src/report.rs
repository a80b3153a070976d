/*!
The reporter (C9): renders a [solve::Outcome](crate::solve::Outcome) as two
forms — a human-readable record and a machine-readable mapping — plus an
analysis appendix attached to both `Sat` and `Unsat` solution files.

[solve::Outcome] already arrives fully-formed from a solve; this module
only has to format it, not decide it. [machine] renders it as
`serde_json` for machine consumption.
*/

pub mod machine;
pub mod text;

pub use machine::MachineResult;
pub use text::render_text;
