/*!
A library for deciding the Workflow Satisfiability Problem (WSP).

wsp_sat determines whether every step of a workflow can be assigned to
exactly one authorized user such that a collection of separation-of-duty,
binding-of-duty, cardinality, and team constraints all hold — and, if so,
produces an assignment and decides whether it is the only one.

# Orientation

The library is designed around the core structure of a [context].

An [Instance](instance::Instance) is built once, by [parsing](parse) the
textual instance format. The [analysis] module performs static,
polynomial-time feasibility checks before any search begins. The
[constraints] module implements the *feasibility / encode / verify*
capability for each constraint family. The [context::Context] ties an
instance, a [config::Config], and the [vars::VariableManager] together and
exposes the Solver Interface: `build`, `solve`, `check_unique`. The
[solve] module is the reference backtracking back-end. The [verify] module
independently re-checks a candidate assignment. The [report] module
renders a [solve::Outcome] as text or as machine-readable JSON.

# Example

```rust
use wsp_sat::{config::Config, context::Context, parse};

let text = "\
#Steps: 2
#Users: 2
#Constraints: 1
Authorisations u1 s1 s2
Authorisations u2 s1 s2
Binding-of-duty s1 s2
";

let instance = parse::parse(text).expect("valid instance");
let mut context = Context::new(instance, Config::default());
let outcome = context.solve();

assert!(outcome.is_sat());
```
*/

pub mod analysis;
pub mod config;
pub mod constraints;
pub mod context;
pub mod instance;
pub mod logging;
pub mod parse;
pub mod report;
pub mod solve;
pub mod types;
pub mod vars;
pub mod verify;
