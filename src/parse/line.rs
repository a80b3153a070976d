//! Per-line grammar: tokenizing one significant line and dispatching on its
//! leading keyword. Grounded in the exact wire format written by the
//! generator this format was distilled from (`write_instance`): SUAL gives
//! its threshold before any index, OneTeam/WangLi each parenthesize one
//! team/department at a time, and AssignmentDependent takes exactly two
//! parenthesized user groups.

use crate::instance::{ConstraintKind, Step, User};
use crate::types::err::ParseError;

/// What one significant, non-header line contributes to the instance under
/// construction.
pub enum LineEffect {
    Authorization { user: User, steps: Vec<Step> },
    Constraint(ConstraintKind),
}

/// Splits a line into tokens, treating `(` and `)` as standalone tokens so
/// that grouped lists (`One-team`, `Wang-li`, `Assignment-dependent`) can be
/// read without a separate grammar per bracketed form.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(stripped) = rest.strip_prefix('(') {
            tokens.push("(");
            rest = stripped;
            continue;
        }
        if let Some(stripped) = rest.strip_prefix(')') {
            tokens.push(")");
            rest = stripped;
            continue;
        }
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(rest.len());
        tokens.push(&rest[..end]);
        rest = &rest[end..];
    }
    tokens
}

/// Parses an `s<N>` or `u<N>` token into a 0-based index, checking it is
/// within `[1, count]` in the 1-based text form.
fn parse_index(tok: &str, prefix: char, count: usize, line_no: usize) -> Result<usize, ParseError> {
    let mut chars = tok.chars();
    let head = chars.next();
    if head.map(|c| c.to_ascii_lowercase()) != Some(prefix) {
        return Err(ParseError::BadLine {
            line_no,
            excerpt: tok.to_string(),
        });
    }
    let digits: &str = chars.as_str();
    let one_based: usize = digits.parse().map_err(|_| ParseError::BadLine {
        line_no,
        excerpt: tok.to_string(),
    })?;
    if one_based == 0 || one_based > count {
        return Err(ParseError::IndexOutOfRange {
            line_no,
            index: one_based,
        });
    }
    Ok(one_based - 1)
}

/// Consumes a `(` `)`-wrapped run of `u<N>` tokens starting at `tokens[*pos]`,
/// advancing `*pos` past the closing paren.
fn parse_user_group(
    tokens: &[&str],
    pos: &mut usize,
    num_users: usize,
    line_no: usize,
) -> Result<Vec<User>, ParseError> {
    if tokens.get(*pos) != Some(&"(") {
        return Err(ParseError::BadLine {
            line_no,
            excerpt: "expected '('".to_string(),
        });
    }
    *pos += 1;
    let mut users = Vec::new();
    while let Some(&tok) = tokens.get(*pos) {
        if tok == ")" {
            *pos += 1;
            if users.is_empty() {
                return Err(ParseError::EmptyTeamList { line_no });
            }
            return Ok(users);
        }
        users.push(parse_index(tok, 'u', num_users, line_no)?);
        *pos += 1;
    }
    Err(ParseError::BadLine {
        line_no,
        excerpt: "unterminated '('".to_string(),
    })
}

/// Parses one significant line into the effect it has on the instance under
/// construction.
pub fn parse_line(
    text: &str,
    line_no: usize,
    num_steps: usize,
    num_users: usize,
) -> Result<LineEffect, ParseError> {
    let tokens = tokenize(text);
    let (keyword, args) = tokens.split_first().ok_or(ParseError::BadLine {
        line_no,
        excerpt: text.to_string(),
    })?;

    let bad_line = || ParseError::BadLine {
        line_no,
        excerpt: text.to_string(),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "authorisations" | "authorizations" => {
            let (user_tok, step_toks) = args.split_first().ok_or_else(bad_line)?;
            let user = parse_index(user_tok, 'u', num_users, line_no)?;
            let steps = step_toks
                .iter()
                .map(|&tok| parse_index(tok, 's', num_steps, line_no))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LineEffect::Authorization { user, steps })
        }

        "separation-of-duty" => {
            let [s1, s2] = args else { return Err(bad_line()) };
            Ok(LineEffect::Constraint(ConstraintKind::SeparationOfDuty {
                s1: parse_index(s1, 's', num_steps, line_no)?,
                s2: parse_index(s2, 's', num_steps, line_no)?,
            }))
        }

        "binding-of-duty" => {
            let [s1, s2] = args else { return Err(bad_line()) };
            Ok(LineEffect::Constraint(ConstraintKind::BindingOfDuty {
                s1: parse_index(s1, 's', num_steps, line_no)?,
                s2: parse_index(s2, 's', num_steps, line_no)?,
            }))
        }

        "at-most-k" => {
            let (k_tok, step_toks) = args.split_first().ok_or_else(bad_line)?;
            let k: usize = k_tok.parse().map_err(|_| bad_line())?;
            let steps = step_toks
                .iter()
                .map(|&tok| parse_index(tok, 's', num_steps, line_no))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LineEffect::Constraint(ConstraintKind::AtMostK { k, steps }))
        }

        "one-team" => {
            let (steps, teams) = parse_steps_then_groups(args, num_steps, num_users, line_no)?;
            Ok(LineEffect::Constraint(ConstraintKind::OneTeam { steps, teams }))
        }

        "wang-li" => {
            let (steps, departments) =
                parse_steps_then_groups(args, num_steps, num_users, line_no)?;
            Ok(LineEffect::Constraint(ConstraintKind::WangLi {
                steps,
                departments,
            }))
        }

        "super-user-at-least" => {
            let (h_tok, rest) = args.split_first().ok_or_else(bad_line)?;
            let h: usize = h_tok.parse().map_err(|_| bad_line())?;
            // Bare step tokens run until the first bare user token; the
            // generator never mixes the two, so the first `u`-prefixed
            // token marks the boundary.
            let split_at = rest
                .iter()
                .position(|tok| tok.to_ascii_lowercase().starts_with('u'))
                .unwrap_or(rest.len());
            let (step_toks, super_toks) = rest.split_at(split_at);
            let steps = step_toks
                .iter()
                .map(|&tok| parse_index(tok, 's', num_steps, line_no))
                .collect::<Result<Vec<_>, _>>()?;
            let supers = super_toks
                .iter()
                .map(|&tok| parse_index(tok, 'u', num_users, line_no))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LineEffect::Constraint(ConstraintKind::SuperUserAtLeast {
                steps,
                h,
                supers,
            }))
        }

        "assignment-dependent" => {
            let (s1, rest) = args.split_first().ok_or_else(bad_line)?;
            let (s2, rest) = rest.split_first().ok_or_else(bad_line)?;
            let mut pos = 0;
            let source = parse_user_group(rest, &mut pos, num_users, line_no)?;
            let target = parse_user_group(rest, &mut pos, num_users, line_no)?;
            Ok(LineEffect::Constraint(ConstraintKind::AssignmentDependent {
                s1: parse_index(s1, 's', num_steps, line_no)?,
                s2: parse_index(s2, 's', num_steps, line_no)?,
                source,
                target,
            }))
        }

        _ => Err(bad_line()),
    }
}

/// Shared shape of `One-team`/`Wang-li`: a run of bare step tokens followed
/// by one or more parenthesized user groups.
fn parse_steps_then_groups(
    args: &[&str],
    num_steps: usize,
    num_users: usize,
    line_no: usize,
) -> Result<(Vec<Step>, Vec<Vec<User>>), ParseError> {
    let split_at = args.iter().position(|&tok| tok == "(").ok_or(ParseError::BadLine {
        line_no,
        excerpt: "missing team list".to_string(),
    })?;
    let (step_toks, rest) = args.split_at(split_at);
    let steps = step_toks
        .iter()
        .map(|&tok| parse_index(tok, 's', num_steps, line_no))
        .collect::<Result<Vec<_>, _>>()?;

    let mut pos = 0;
    let mut groups = Vec::new();
    while pos < rest.len() {
        groups.push(parse_user_group(rest, &mut pos, num_users, line_no)?);
    }
    if groups.is_empty() {
        return Err(ParseError::EmptyTeamList { line_no });
    }
    Ok((steps, groups))
}
