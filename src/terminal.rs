//! User-facing output channel.
//!
//! Commands write through the [`Ui`] trait so the same body can print to the
//! terminal on a direct invocation or into a capture buffer when driven by a
//! plugin's nested `CliCommand` call.

use console::style;
use dialoguer::Confirm;

/// Output surface a command body writes to.
pub trait Ui {
    /// Print one progress or result line.
    fn say(&mut self, line: &str);

    /// Print a warning line.
    fn warn(&mut self, line: &str);

    /// Print the success marker.
    fn ok(&mut self);

    /// Ask a yes/no question. Non-interactive surfaces answer no.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Interactive terminal output.
#[derive(Debug, Default)]
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        TerminalUi
    }
}

impl Ui for TerminalUi {
    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn warn(&mut self, line: &str) {
        println!("{} {}", style("!").yellow(), line);
    }

    fn ok(&mut self) {
        println!("{}", style("OK").green());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Capture buffer used for plugin-invoked commands and tests. Everything a
/// command says lands in one string, returned to the plugin as the nested
/// call's output.
#[derive(Debug, Default)]
pub struct BufferUi {
    output: String,
}

impl BufferUi {
    pub fn new() -> Self {
        BufferUi::default()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

impl Ui for BufferUi {
    fn say(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn warn(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn ok(&mut self) {
        self.output.push_str("OK\n");
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        // A nested invocation has no terminal to ask; refuse rather than
        // silently destroy something.
        false
    }
}
