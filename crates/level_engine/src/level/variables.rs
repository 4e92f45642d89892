//! `Set` variables and `${name}` substitution

use indexmap::IndexMap;

/// Ordered variable table for a single load
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    values: IndexMap<String, String>,
}

impl VariableTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a variable
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Current value of a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Drop every variable
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of defined variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variables are defined
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate variables in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every `${key}` of a defined variable with its value
    ///
    /// Single left-to-right pass: inserted values are never scanned again, and
    /// references to undefined variables are left as written.
    pub fn substitute(&self, line: &str) -> String {
        if self.values.is_empty() || !line.contains("${") {
            return line.to_string();
        }

        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            match after.find('}') {
                Some(end) => match self.values.get(&after[..end]) {
                    Some(value) => {
                        out.push_str(value);
                        rest = &after[end + 1..];
                    }
                    None => {
                        out.push_str("${");
                        rest = after;
                    }
                },
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}
