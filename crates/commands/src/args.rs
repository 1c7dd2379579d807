use std::collections::BTreeMap;

/// Arguments of one detail-command invocation, detached from clap.
///
/// The common options have their own fields; handler-specific options are
/// kept by name so requirement rules and interactive prompts can address
/// them uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// ID or label tokens naming existing records.
    pub entry: Vec<String>,
    pub delete: bool,
    pub interactive: bool,
    pub label: Option<String>,
    values: BTreeMap<String, String>,
}

impl ParsedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, T>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.entry = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_delete(mut self) -> Self {
        self.delete = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if name == "label" {
            self.label = Some(value);
        } else {
            self.values.insert(name, value);
        }
    }

    /// Value of a named option; `label` is addressable by name too.
    pub fn value(&self, name: &str) -> Option<&str> {
        match name {
            "label" => self.label.as_deref(),
            _ => self.values.get(name).map(String::as_str),
        }
    }

    /// Whether a named option carries a non-empty value.
    pub fn has(&self, name: &str) -> bool {
        self.value(name).is_some_and(|v| !v.is_empty())
    }

    pub fn has_entries(&self) -> bool {
        !self.entry.is_empty()
    }
}
