use crate::command::{CommandFactory, Executable, Flow, LineCtx, Outcome};
use crate::interpreter::{Factory, Interpreter};
use crate::list::{LinkedList, ListError};
use anyhow::{Result, anyhow};
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Built-in REPL commands known to the interpreter at compile time.
///
/// Each command parses its own positional parameters (the REPL grammar is
/// bare integers, so nothing fancier than `FromStr` is needed) and runs
/// directly against the interpreter's shared list.
pub(crate) trait ReplCommand: Sized {
    /// Canonical name of the command, e.g. "append" or "get".
    fn name() -> &'static str;

    /// One-line usage text shown by `help`.
    fn help() -> &'static str;

    /// Parses the textual parameters into a command instance.
    ///
    /// Arity and integer-conversion failures are reported here; position
    /// range checks stay with the list itself.
    fn parse(params: &[&str]) -> Result<Self>;

    /// Executes the command against the interpreter state.
    fn execute(self, interpreter: &mut Interpreter, ctx: &LineCtx) -> Result<Outcome>;
}

impl<T: ReplCommand> Executable for T {
    fn execute(self: Box<Self>, interpreter: &mut Interpreter, ctx: &LineCtx) -> Result<Outcome> {
        T::execute(*self, interpreter, ctx)
    }
}

impl<T: ReplCommand + 'static> CommandFactory for Factory<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn help(&self) -> &'static str {
        T::help()
    }

    fn create(&self, params: &[&str]) -> Result<Box<dyn Executable>> {
        Ok(Box::new(T::parse(params)?))
    }
}

/// Checks arity and hands back the parameters as a fixed-size array.
fn params_exact<'a, const N: usize>(name: &str, params: &[&'a str]) -> Result<[&'a str; N]> {
    match params.try_into() {
        Ok(exact) => Ok(exact),
        Err(_) if N == 0 => Err(anyhow!("{name} does not take any parameters")),
        Err(_) if N == 1 => Err(anyhow!("{name} requires 1 parameter")),
        Err(_) => Err(anyhow!("{name} requires {N} parameters")),
    }
}

fn int_param(name: &str, raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| anyhow!("{name}: expected an integer, got '{raw}'"))
}

/// Maps a textual position onto a list index. Negative positions cannot
/// exist at the `usize`-typed list API, so they are rejected here with the
/// same error kind the list itself uses.
fn position(raw: i64) -> Result<usize, ListError> {
    usize::try_from(raw).map_err(|_| ListError::InvalidIndex)
}

/// `foreach`/`print` rendering: every element followed by a comma.
fn render_list(list: &LinkedList<i64>) -> String {
    let mut out = String::new();
    list.for_each(|value| {
        out.push_str(&value.to_string());
        out.push(',');
    });
    out
}

/// Adds a value at the end of the list.
#[derive(Debug)]
pub struct Append {
    value: i64,
}

impl ReplCommand for Append {
    fn name() -> &'static str {
        "append"
    }

    fn help() -> &'static str {
        "append <value> - add a value at the end of the list."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [value] = params_exact(Self::name(), params)?;
        Ok(Self {
            value: int_param(Self::name(), value)?,
        })
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        interpreter.list_mut().push_back(self.value);
        Ok(Outcome::silent())
    }
}

/// Adds a value at the front of the list.
#[derive(Debug)]
pub struct Prepend {
    value: i64,
}

impl ReplCommand for Prepend {
    fn name() -> &'static str {
        "prepend"
    }

    fn help() -> &'static str {
        "prepend <value> - add a value at the front of the list."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [value] = params_exact(Self::name(), params)?;
        Ok(Self {
            value: int_param(Self::name(), value)?,
        })
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        interpreter.list_mut().push_front(self.value);
        Ok(Outcome::silent())
    }
}

/// Inserts a value at a zero-based position.
#[derive(Debug)]
pub struct InsertAt {
    value: i64,
    position: i64,
}

impl ReplCommand for InsertAt {
    fn name() -> &'static str {
        "insertat"
    }

    fn help() -> &'static str {
        "insertat <value> <position> - insert a value at a zero-based position."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [value, pos] = params_exact(Self::name(), params)?;
        Ok(Self {
            value: int_param(Self::name(), value)?,
            position: int_param(Self::name(), pos)?,
        })
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        interpreter
            .list_mut()
            .insert_at(self.value, position(self.position)?)?;
        Ok(Outcome::silent())
    }
}

/// Removes the element at a zero-based position.
#[derive(Debug)]
pub struct RemoveAt {
    position: i64,
}

impl ReplCommand for RemoveAt {
    fn name() -> &'static str {
        "removeat"
    }

    fn help() -> &'static str {
        "removeat <position> - remove the element at a zero-based position."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [pos] = params_exact(Self::name(), params)?;
        Ok(Self {
            position: int_param(Self::name(), pos)?,
        })
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        interpreter.list_mut().remove_at(position(self.position)?)?;
        Ok(Outcome::silent())
    }
}

/// Prints the element at a zero-based position.
#[derive(Debug)]
pub struct Get {
    position: i64,
}

impl ReplCommand for Get {
    fn name() -> &'static str {
        "get"
    }

    fn help() -> &'static str {
        "get <position> - print the element at a zero-based position."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [pos] = params_exact(Self::name(), params)?;
        Ok(Self {
            position: int_param(Self::name(), pos)?,
        })
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        let value = interpreter.list().get(position(self.position)?)?;
        Ok(Outcome::text(value.to_string()))
    }
}

/// Index-operator spelling of `get`.
#[derive(Debug)]
pub struct Subscript(Get);

impl ReplCommand for Subscript {
    fn name() -> &'static str {
        "[]"
    }

    fn help() -> &'static str {
        "[] <position> - print the element at a zero-based position."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        Ok(Self(Get::parse(params)?))
    }

    fn execute(self, interpreter: &mut Interpreter, ctx: &LineCtx) -> Result<Outcome> {
        self.0.execute(interpreter, ctx)
    }
}

/// Prints the element count.
#[derive(Debug)]
pub struct Size;

impl ReplCommand for Size {
    fn name() -> &'static str {
        "size"
    }

    fn help() -> &'static str {
        "size - print the number of elements in the list."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [] = params_exact(Self::name(), params)?;
        Ok(Self)
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        Ok(Outcome::text(interpreter.list().len().to_string()))
    }
}

/// Prints whether the list is empty.
#[derive(Debug)]
pub struct Empty;

impl ReplCommand for Empty {
    fn name() -> &'static str {
        "empty"
    }

    fn help() -> &'static str {
        "empty - print 1 when the list has no elements, 0 otherwise."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [] = params_exact(Self::name(), params)?;
        Ok(Self)
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        // numeric rendering keeps existing `empty ; 1` test files working
        let flag = if interpreter.list().is_empty() { "1" } else { "0" };
        Ok(Outcome::text(flag))
    }
}

/// Removes every element. Fails when the list is already empty.
#[derive(Debug)]
pub struct Clear;

impl ReplCommand for Clear {
    fn name() -> &'static str {
        "clear"
    }

    fn help() -> &'static str {
        "clear - remove every element from the list."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [] = params_exact(Self::name(), params)?;
        Ok(Self)
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        interpreter.list_mut().clear()?;
        Ok(Outcome::silent())
    }
}

/// Prints the first element equal to the given value.
#[derive(Debug)]
pub struct Find {
    value: i64,
}

impl ReplCommand for Find {
    fn name() -> &'static str {
        "find"
    }

    fn help() -> &'static str {
        "find <value> - print the first element equal to the value."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [value] = params_exact(Self::name(), params)?;
        Ok(Self {
            value: int_param(Self::name(), value)?,
        })
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        let target = self.value;
        let found = interpreter.list().find(|&v| v == target)?;
        Ok(Outcome::text(found.to_string()))
    }
}

/// Prints the index of the first element equal to the given value.
#[derive(Debug)]
pub struct FindIndex {
    value: i64,
}

impl ReplCommand for FindIndex {
    fn name() -> &'static str {
        "findindex"
    }

    fn help() -> &'static str {
        "findindex <value> - print the index of the first element equal to the value."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [value] = params_exact(Self::name(), params)?;
        Ok(Self {
            value: int_param(Self::name(), value)?,
        })
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        let target = self.value;
        let index = interpreter.list().find_index(|&v| v == target)?;
        Ok(Outcome::text(index.to_string()))
    }
}

/// Prints every element, front to back, comma-terminated.
#[derive(Debug)]
pub struct ForEach;

impl ReplCommand for ForEach {
    fn name() -> &'static str {
        "foreach"
    }

    fn help() -> &'static str {
        "foreach - print every element, front to back."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [] = params_exact(Self::name(), params)?;
        Ok(Self)
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        Ok(Outcome::text(render_list(interpreter.list())))
    }
}

/// Same rendering as `foreach`.
#[derive(Debug)]
pub struct Print;

impl ReplCommand for Print {
    fn name() -> &'static str {
        "print"
    }

    fn help() -> &'static str {
        "print - print every element, front to back."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [] = params_exact(Self::name(), params)?;
        Ok(Self)
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        Ok(Outcome::text(render_list(interpreter.list())))
    }
}

/// Stops the session.
#[derive(Debug)]
pub struct Quit;

impl ReplCommand for Quit {
    fn name() -> &'static str {
        "quit"
    }

    fn help() -> &'static str {
        "quit - exit the session."
    }

    fn parse(_params: &[&str]) -> Result<Self> {
        // extra parameters are ignored
        Ok(Self)
    }

    fn execute(self, _interpreter: &mut Interpreter, ctx: &LineCtx) -> Result<Outcome> {
        let output = if ctx.interactive { "Goodbye!" } else { "" };
        Ok(Outcome {
            output: output.to_string(),
            flow: Flow::Quit,
        })
    }
}

/// Lists the registered commands, or one command's usage line.
#[derive(Debug)]
pub struct Help {
    topic: Option<String>,
}

impl ReplCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn help() -> &'static str {
        "help [command] - gives help for the optional command."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        match params {
            [] => Ok(Self { topic: None }),
            [topic] => Ok(Self {
                topic: Some((*topic).to_string()),
            }),
            _ => Err(anyhow!("help requires 0 or 1 parameters")),
        }
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        match self.topic {
            None => {
                let mut names: Vec<&str> =
                    interpreter.command_table().map(|(name, _)| name).collect();
                names.sort_unstable();
                Ok(Outcome::text(format!(
                    "Available commands: {}",
                    names.join(" ")
                )))
            }
            Some(topic) => match interpreter.command_table().find(|(name, _)| *name == topic) {
                Some((name, help)) => Ok(Outcome::text(format!("{name}: {help}"))),
                None => Ok(Outcome::text(format!("Unknown command '{topic}'"))),
            },
        }
    }
}

/// The `?` spelling of `help`.
#[derive(Debug)]
pub struct HelpAlias(Help);

impl ReplCommand for HelpAlias {
    fn name() -> &'static str {
        "?"
    }

    fn help() -> &'static str {
        "? [command] - gives help for the optional command."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        Ok(Self(Help::parse(params)?))
    }

    fn execute(self, interpreter: &mut Interpreter, ctx: &LineCtx) -> Result<Outcome> {
        self.0.execute(interpreter, ctx)
    }
}

/// Runs a file of commands, comparing each line's output against its
/// expected-output field.
#[derive(Debug)]
pub struct Test {
    path: String,
}

impl ReplCommand for Test {
    fn name() -> &'static str {
        "test"
    }

    fn help() -> &'static str {
        "test <input file> - tests a file."
    }

    fn parse(params: &[&str]) -> Result<Self> {
        let [path] = params_exact(Self::name(), params)?;
        Ok(Self {
            path: path.to_string(),
        })
    }

    fn execute(self, interpreter: &mut Interpreter, _ctx: &LineCtx) -> Result<Outcome> {
        let file = File::open(&self.path)
            .map_err(|e| anyhow!("could not open input file '{}': {e}", self.path))?;
        let reader = BufReader::new(file);

        let mut report = String::new();
        let mut failures = 0usize;
        let mut file_line = 0usize;

        for line in reader.lines() {
            let line = line?;
            file_line += 1;

            // Lines inside a test file are never interactive, whatever the
            // surrounding session is.
            let result = interpreter.process_line(line.trim(), file_line, false);
            if let Some(diagnostic) = &result.diagnostic {
                report.push_str(diagnostic);
                report.push('\n');
            }

            let output = result.output.trim();
            let expected = result.expected.trim();
            let verdict = if output == expected {
                "same"
            } else {
                failures += 1;
                "differs"
            };
            report.push_str(&format!(
                "Line {file_line} {verdict}: Command: '{}'; Result: '{output}'; Expected: '{expected}'\n",
                result.command
            ));

            // A quit line stops the file, not the surrounding session.
            if result.flow == Flow::Quit {
                break;
            }
        }

        if failures == 0 {
            report.push_str("\nAll tests passed\n");
        } else {
            report.push_str(&format!("\nFailed test count - {failures}\n"));
        }

        Ok(Outcome::text(report))
    }
}
