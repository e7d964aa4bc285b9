use crate::interpreter::Interpreter;
use anyhow::Result;

/// Signals whether the surrounding read-eval loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// Stop the loop (the `quit` command).
    Quit,
}

/// What a successfully executed command produced.
///
/// `output` is the command's result text, written verbatim (followed by a
/// newline) to the session's output stream and compared against the
/// expected-output field by the file-based test runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub flow: Flow,
}

impl Outcome {
    /// A successful command with no output (mutating commands).
    pub fn silent() -> Self {
        Self {
            output: String::new(),
            flow: Flow::Continue,
        }
    }

    /// A successful command that printed something.
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            flow: Flow::Continue,
        }
    }
}

/// Where in the input the current command came from.
#[derive(Debug, Clone, Copy)]
pub struct LineCtx {
    /// 1-based line number in the current input stream, used to tag error
    /// diagnostics.
    pub line_no: usize,
    /// Whether the session is interactive (affects prompts and farewell
    /// messages, not semantics).
    pub interactive: bool,
}

/// Object-safe trait for any command the interpreter can execute.
///
/// Implemented for all builtins via a blanket impl over `ReplCommand`.
/// Errors returned here are caught by the dispatcher and turned into a
/// line-tagged diagnostic; they never cross the process boundary.
pub trait Executable {
    fn execute(self: Box<Self>, interpreter: &mut Interpreter, ctx: &LineCtx) -> Result<Outcome>;
}

/// Creates command instances from their textual parameters.
///
/// One factory is registered per command name; the interpreter resolves
/// names (with prefix matching) against `name()` and surfaces `help()` in
/// the `help` listing. `create` fails on arity or parameter-conversion
/// errors.
pub trait CommandFactory {
    /// Canonical name the command is registered under, e.g. "append".
    fn name(&self) -> &'static str;

    /// One-line usage text shown by `help`.
    fn help(&self) -> &'static str;

    /// Parses `params` into an executable command instance.
    fn create(&self, params: &[&str]) -> Result<Box<dyn Executable>>;
}
