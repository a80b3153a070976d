/*!
The instance parser (C2): reads the textual instance format into an
[Instance](crate::instance::Instance), or rejects it.

# Grammar

```text
#Steps: <int>
#Users: <int>
#Constraints: <int>
Authorisations u<i> (s<j>)*
Separation-of-duty s<i> s<j>
Binding-of-duty s<i> s<j>
At-most-k <k> (s<j>)+
One-team (s<j>)+ ( (u<j>)+ )+
Super-user-at-least <h> (s<j>)+ (u<j>)+
Wang-li (s<j>)+ ( (u<j>)+ )+
Assignment-dependent s<i> s<j> ( (u<j>)+ ) ( (u<j>)+ )
```

Keywords are case-insensitive. All indices are 1-based in text, 0-based
internally. Blank lines and lines starting with `c`/`C` are comments and
are skipped. The header must appear, in order, as the first three
significant lines; the declared `#Constraints` count is not checked
against the number of constraint lines actually present.
*/

mod line;

use std::path::Path;

use crate::instance::{Constraint, ConstraintId, Instance};
pub use crate::types::err::ParseError;

use line::LineEffect;

/// Parses the textual instance format from `text`.
pub fn parse(text: &str) -> Result<Instance, ParseError> {
    let significant: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !is_blank_or_comment(line))
        .collect();

    let mut rest = significant.into_iter();

    let num_steps = read_header(&mut rest, "#Steps")?;
    let num_users = read_header(&mut rest, "#Users")?;
    let _num_constraints = read_header(&mut rest, "#Constraints")?;

    let mut auth = vec![vec![false; num_users]; num_steps];
    let mut constraints = Vec::new();
    let mut next_id = 0u32;

    for (line_no, text) in rest {
        match line::parse_line(text, line_no, num_steps, num_users)? {
            LineEffect::Authorization { user, steps } => {
                for step in steps {
                    auth[step][user] = true;
                }
            }
            LineEffect::Constraint(kind) => {
                constraints.push(Constraint::new(ConstraintId(next_id), kind));
                next_id += 1;
            }
        }
    }

    Ok(Instance::new(auth, constraints))
}

/// Parses the textual instance format from the file at `path`.
pub fn parse_path(path: impl AsRef<Path>) -> Result<Instance, ParseError> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(|_| ParseError::BadLine {
        line_no: 0,
        excerpt: format!("could not read {}", path.as_ref().display()),
    })?;
    parse(&text)
}

fn is_blank_or_comment(line: &str) -> bool {
    line.is_empty() || line.starts_with('c') || line.starts_with('C')
}

/// Reads the next significant line and checks it is the header `name: <int>`.
fn read_header(
    lines: &mut impl Iterator<Item = (usize, &str)>,
    name: &'static str,
) -> Result<usize, ParseError> {
    let (line_no, text) = lines.next().ok_or(ParseError::MissingHeader(name))?;

    let (keyword, rest) = text.split_once(':').ok_or(ParseError::MissingHeader(name))?;

    if !keyword.trim().eq_ignore_ascii_case(name) {
        return Err(ParseError::MissingHeader(name));
    }

    rest.trim()
        .parse::<usize>()
        .map_err(|_| ParseError::BadHeaderValue { header: name, line_no })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_instance() {
        let text = "\
#Steps: 2
#Users: 2
#Constraints: 1
Authorisations u1 s1 s2
Authorisations u2 s1 s2
Binding-of-duty s1 s2
";
        let instance = parse(text).expect("valid instance");
        assert_eq!(instance.num_steps(), 2);
        assert_eq!(instance.num_users(), 2);
        assert_eq!(instance.constraints().len(), 1);
    }

    #[test]
    fn rejects_missing_header() {
        let text = "#Steps: 2\n#Users: 2\n";
        assert!(matches!(
            parse(text),
            Err(ParseError::MissingHeader("#Constraints"))
        ));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let text = "\
#Steps: 1
#Users: 1
#Constraints: 1
Separation-of-duty s1 s2
";
        assert!(matches!(
            parse(text),
            Err(ParseError::IndexOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "\
c this is a comment
#Steps: 1
#Users: 1

c another comment
#Constraints: 0
";
        let instance = parse(text).expect("valid instance");
        assert_eq!(instance.num_steps(), 1);
    }

    #[test]
    fn omitting_a_users_step_list_leaves_them_unauthorized() {
        let text = "\
#Steps: 1
#Users: 2
#Constraints: 0
Authorisations u1 s1
";
        let instance = parse(text).unwrap();
        assert!(instance.is_authorized(0, 0));
        assert!(!instance.is_authorized(0, 1));
    }
}
