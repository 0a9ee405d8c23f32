use query_parser::Gate;
use serde::Serialize;

/// A templated SQL snippet with `?` placeholders and the values bound to
/// them, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SqlFragment {
    pub raw: String,
    pub values: Vec<String>,
}

impl SqlFragment {
    pub fn new(raw: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            raw: raw.into(),
            values,
        }
    }

    /// Wraps the fragment in one pair of parentheses.
    pub fn group(inner: SqlFragment) -> Self {
        Self {
            raw: format!("({})", inner.raw),
            values: inner.values,
        }
    }

    /// `(left GATE right)`, values left then right.
    pub fn join(left: SqlFragment, gate: Gate, right: SqlFragment) -> Self {
        let mut values = left.values;
        values.extend(right.values);
        Self {
            raw: format!("({} {} {})", left.raw, gate, right.raw),
            values,
        }
    }

    pub fn placeholder_count(&self) -> usize {
        self.raw.matches('?').count()
    }

    /// Renders the template with PostgreSQL-style `$n` placeholders.
    /// Numbering starts right after `start_offset`, for fragments appended to
    /// a statement that already binds values.
    pub fn numbered(&self, start_offset: usize) -> String {
        let mut idx = start_offset;
        let mut out = String::with_capacity(self.raw.len() + self.values.len() * 2);
        for ch in self.raw.chars() {
            if ch == '?' {
                idx += 1;
                out.push('$');
                out.push_str(&idx.to_string());
            } else {
                out.push(ch);
            }
        }
        out
    }
}
