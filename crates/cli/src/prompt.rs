use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sshconfig_commands::Prompter;
use sshconfig_core::{CoreError, CoreResult};

/// Reads interactive answers from the terminal.
pub struct LinePrompter {
    editor: DefaultEditor,
}

impl LinePrompter {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Prompter for LinePrompter {
    fn prompt(&mut self, field: &str) -> CoreResult<Option<String>> {
        match self.editor.readline(&format!("{field}: ")) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => Err(CoreError::argument_required(format!(
                "{field} was not provided (interrupted)"
            ))),
            Err(err) => Err(CoreError::invalid_argument(format!("cannot read {field}: {err}"))),
        }
    }
}
