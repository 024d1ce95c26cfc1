//! Auto-print of a trailing expression.
//!
//! A line-based heuristic, not a parser. It only looks at the last
//! non-blank line and decides by prefix:
//!
//! - `let`/`var` declarations get a print of the declared name appended.
//! - Lines opening a statement (`func`, `if`, `return`, ...) are left alone.
//! - Anything else is taken as an expression and wrapped in a print call.
//!
//! Prefixes are matched on raw text, so identifiers such as `letter`,
//! `format` or `do_work` are misread as keywords, and a multi-line trailing
//! expression only has its last line wrapped.

/// Prefixes treated as variable declarations.
const DECLARATION_PREFIXES: [&str; 2] = ["let", "var"];

/// Prefixes treated as statements that have no value to print.
const STATEMENT_PREFIXES: [&str; 14] = [
    "func", "class", "struct", "enum", "import", "return", "if", "while", "for", "switch",
    "guard", "do", "try", "throw",
];

/// Make the value of the last line visible by printing it.
///
/// # Example
///
/// ```
/// use mdplay_runner::wrap_last_expression_in_print;
///
/// assert_eq!(
///     wrap_last_expression_in_print("let x = 1\n1 + 1", "print"),
///     "let x = 1\nprint(1 + 1)"
/// );
/// assert_eq!(
///     wrap_last_expression_in_print("let x = 1", "print"),
///     "let x = 1\nprint(x)"
/// );
/// ```
pub fn wrap_last_expression_in_print(code: &str, print_function: &str) -> String {
    let lines: Vec<&str> = code.split('\n').collect();

    let Some(last_index) = lines.iter().rposition(|line| !trim_blank(line).is_empty()) else {
        return code.to_string();
    };
    let last_line = trim_blank(lines[last_index]);

    if DECLARATION_PREFIXES
        .iter()
        .any(|prefix| last_line.starts_with(prefix))
    {
        return match declared_name(last_line) {
            Some(name) => format!("{}\n{}({})", code, print_function, name),
            None => code.to_string(),
        };
    }

    if STATEMENT_PREFIXES
        .iter()
        .any(|prefix| last_line.starts_with(prefix))
    {
        return code.to_string();
    }

    let wrapped = format!("{}({})", print_function, last_line);
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| if index == last_index { wrapped.as_str() } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Name declared by `let name = ...`: the second token, cut at `=`.
fn declared_name(line: &str) -> Option<&str> {
    line.split_whitespace()
        .nth(1)
        .and_then(|token| token.split('=').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Trim Unicode whitespace other than newlines.
fn trim_blank(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() && c != '\n')
}
