//! Lua fragment generators.
//!
//! Each generator turns the planned terms into one block of Lua source:
//!
//! - **Classes**: `GET_ALL = ast('GET_ALL', {tt = 78, st = 'get_all'})`
//! - **Methods**: `get_all = function(...) return GET_ALL(get_opts(...)) end`
//! - **Names**: `local ADD, AND, APPEND, ...` forward declarations

use super::arity::WrapperStrategy;
use super::TermPlan;

/// Separator between method table entries
const METHOD_SEPARATOR: &str = ",\n  ";

/// Quote `s` as a single-quoted Lua string literal
pub fn lua_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// One class declaration per term, newline separated
pub fn ast_classes(plans: &[TermPlan<'_>]) -> String {
    plans
        .iter()
        .map(|plan| {
            format!(
                "{} = ast({}, {{tt = {}, st = {}}})",
                plan.term.identifier,
                lua_string(&plan.term.identifier),
                plan.term.tag,
                lua_string(&plan.method)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Method table entry for a single term
pub fn method_entry(plan: &TermPlan<'_>) -> String {
    let class = &plan.term.identifier;
    match plan.strategy {
        WrapperStrategy::Plain => format!(
            "{} = function(...) return {}({{}}, ...) end",
            plan.method, class
        ),
        WrapperStrategy::OptionsTail => format!(
            "{} = function(...) return {}(get_opts(...)) end",
            plan.method, class
        ),
        WrapperStrategy::FixedArity(arity) => {
            let args: Vec<String> = (0..arity).map(|n| format!("arg{}", n)).collect();
            let mut params = args.clone();
            params.push("opts".to_string());
            let mut call = vec!["opts".to_string()];
            call.extend(args);
            format!(
                "{} = function({}) return {}({}) end",
                plan.method,
                params.join(", "),
                class,
                call.join(", ")
            )
        }
    }
}

/// Method table body, entries joined with an indented separator
pub fn ast_methods(plans: &[TermPlan<'_>]) -> String {
    plans
        .iter()
        .map(method_entry)
        .collect::<Vec<_>>()
        .join(METHOD_SEPARATOR)
}

/// Forward declarations packed greedily into lines shorter than `wrap_width`.
///
/// An identifier that alone is too long still gets its own line.
pub fn ast_names<'a, I>(identifiers: I, wrap_width: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lines: Vec<String> = Vec::new();
    for name in identifiers {
        match lines.last_mut() {
            Some(line) if line.len() + 2 + name.len() < wrap_width => {
                line.push_str(", ");
                line.push_str(name);
            }
            _ => lines.push(format!("local {}", name)),
        }
    }
    lines.join("\n")
}
