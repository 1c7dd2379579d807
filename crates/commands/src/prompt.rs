use sshconfig_core::CoreResult;

/// Source of answers for interactive mode.
pub trait Prompter {
    /// Ask for the value of `field`; `None` or an empty answer leaves it unset.
    fn prompt(&mut self, field: &str) -> CoreResult<Option<String>>;
}

impl<F> Prompter for F
where
    F: FnMut(&str) -> CoreResult<Option<String>>,
{
    fn prompt(&mut self, field: &str) -> CoreResult<Option<String>> {
        self(field)
    }
}
