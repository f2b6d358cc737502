//! Dotted and indexed path resolution against variable bindings
//!
//! `a.b.c`, `a.0.b` and `a[0].b` walk the bindings one segment at a time.
//! Any segment that cannot be followed short-circuits the whole path to
//! [`Value::Null`]; resolution never fails. Getter bindings are not forced
//! anywhere along a path.

use super::VariableMap;
use super::value::Value;

/// Split a path token into its segments, turning `[n]` suffixes into `n` segments
pub fn segments(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for part in path.split('.') {
        let mut rest = part;
        match rest.find('[') {
            Some(open) => {
                out.push(&rest[..open]);
                rest = &rest[open..];
                while let Some(inner) = rest.strip_prefix('[') {
                    match inner.find(']') {
                        Some(close) => {
                            out.push(&inner[..close]);
                            rest = &inner[close + 1..];
                        }
                        None => {
                            out.push(inner);
                            rest = "";
                        }
                    }
                }
            }
            None => out.push(rest),
        }
    }
    out
}

/// Resolve a path token against the bindings
pub fn resolve(variables: &VariableMap, path: &str) -> Value {
    let segments = segments(path);
    let Some((first, rest)) = segments.split_first() else {
        return Value::Null;
    };

    let Some(mut current) = variables.get(*first) else {
        return Value::Null;
    };
    for (i, segment) in rest.iter().enumerate() {
        match step(current, segment) {
            Step::Into(next) => current = next,
            // `length` only terminates a path; nothing can be read from it
            Step::Length(len) if i + 1 == rest.len() => return Value::from(len),
            Step::Length(_) | Step::Missing => return Value::Null,
        }
    }
    current.clone()
}

enum Step<'v> {
    Into(&'v Value),
    Length(usize),
    Missing,
}

fn step<'v>(current: &'v Value, segment: &str) -> Step<'v> {
    match current {
        Value::Object(map) => map.get(segment).map_or(Step::Missing, Step::Into),
        Value::Array(items) => {
            if segment == "length" {
                return Step::Length(items.len());
            }
            segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .map_or(Step::Missing, Step::Into)
        }
        _ => Step::Missing,
    }
}
