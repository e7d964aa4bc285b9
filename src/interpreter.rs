use crate::builtin::*;
use crate::command::{CommandFactory, Flow, LineCtx};
use crate::list::LinkedList;
use crate::parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fmt::Display;
use std::io::{BufRead, Write};

const BANNER: &str = "Simple list REPL - type 'help' for a list of commands or 'quit' to quit.";

/// Factory allows creating instances of [`crate::command::Executable`].
///
/// Only supports commands defined in this crate through the blanket
/// `CommandFactory` impl over `ReplCommand`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Everything the dispatcher produced for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResult {
    /// The command text (name and parameters) after comment stripping.
    pub command: String,
    /// The expected-output field, for the file-based test runner.
    pub expected: String,
    /// The command's result text; the literal `error` when the command
    /// failed.
    pub output: String,
    /// Line-tagged diagnostic for a failed command, if any.
    pub diagnostic: Option<String>,
    /// Whether the surrounding loop should keep reading.
    pub flow: Flow,
}

enum Resolution {
    Match(usize),
    Ambiguous(Vec<&'static str>),
    Unknown,
}

/// A line-oriented interpreter driving one shared [`LinkedList`] of
/// integers.
///
/// Each input line is split into a command name and string parameters; the
/// name is resolved against the registered commands with prefix matching,
/// and any failure raised by a command is converted into a line-tagged
/// diagnostic instead of propagating out.
///
/// Example
/// ```
/// use list_repl::Interpreter;
/// let mut interp = Interpreter::default();
/// interp.process_line("append 10", 1, false);
/// let result = interp.process_line("get 0", 2, false);
/// assert_eq!(result.output, "10");
/// ```
pub struct Interpreter {
    list: LinkedList<i64>,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Creates an interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            list: LinkedList::new(),
            commands,
        }
    }

    /// Read-only view of the shared list.
    pub fn list(&self) -> &LinkedList<i64> {
        &self.list
    }

    pub(crate) fn list_mut(&mut self) -> &mut LinkedList<i64> {
        &mut self.list
    }

    /// Registered command names with their usage lines.
    pub(crate) fn command_table(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.commands.iter().map(|f| (f.name(), f.help()))
    }

    /// Parses and runs one input line.
    ///
    /// Never fails: every error becomes a diagnostic in the returned
    /// [`LineResult`] with the output set to `error`, and the session
    /// continues.
    pub fn process_line(&mut self, line: &str, line_no: usize, interactive: bool) -> LineResult {
        let parsed = parser::parse_line(line);
        let mut result = LineResult {
            command: parsed.command.clone(),
            expected: parsed.expected,
            output: String::new(),
            diagnostic: None,
            flow: Flow::Continue,
        };

        let words = parser::split_words(&parsed.command);
        let Some((&name, params)) = words.split_first() else {
            return result;
        };

        match self.resolve(name) {
            Resolution::Match(idx) => {
                let created = self.commands[idx].create(params);
                let ctx = LineCtx {
                    line_no,
                    interactive,
                };
                match created {
                    Ok(command) => match command.execute(self, &ctx) {
                        Ok(outcome) => {
                            result.output = outcome.output;
                            result.flow = outcome.flow;
                        }
                        Err(e) => result.fail(line_no, e),
                    },
                    Err(e) => result.fail(line_no, format_args!("invalid argument: {e}")),
                }
            }
            Resolution::Unknown => result.fail(
                line_no,
                format_args!("Invalid command '{name}'. Type '?' or 'help' for a list of commands."),
            ),
            Resolution::Ambiguous(names) => result.fail(
                line_no,
                format_args!(
                    "Ambiguous command '{name}'. Did you mean one of these: {}",
                    names.join(" ")
                ),
            ),
        }

        result
    }

    /// Reads `input` line by line until `quit` or end of input, writing
    /// each line's output (and prompts, when interactive) to `output`.
    /// Diagnostics go to stderr, keeping the output stream comparable
    /// against expected results.
    pub fn process_stream(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        interactive: bool,
    ) -> anyhow::Result<()> {
        if interactive {
            writeln!(output, "{BANNER}")?;
        }

        let mut line_no = 0usize;
        loop {
            if interactive {
                write!(output, "> ")?;
                output.flush()?;
            }

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;

            let result = self.process_line(line.trim(), line_no, interactive);
            if let Some(diagnostic) = &result.diagnostic {
                eprintln!("{diagnostic}");
            }
            writeln!(output, "{}", result.output)?;

            if result.flow == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Interactive session with line editing and history.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;
        println!("{BANNER}");

        let mut line_no = 0usize;
        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    line_no += 1;

                    let result = self.process_line(line.trim(), line_no, true);
                    if let Some(diagnostic) = &result.diagnostic {
                        eprintln!("{diagnostic}");
                    }
                    println!("{}", result.output);

                    if result.flow == Flow::Quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {err:?}");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Prefix-matching command resolution: an exact name wins outright, a
    /// unique prefix match runs, anything else is unknown or ambiguous.
    fn resolve(&self, name: &str) -> Resolution {
        let matches: Vec<usize> = self
            .commands
            .iter()
            .enumerate()
            .filter(|(_, f)| f.name().starts_with(name))
            .map(|(i, _)| i)
            .collect();

        if let Some(&exact) = matches
            .iter()
            .find(|&&i| self.commands[i].name() == name)
        {
            return Resolution::Match(exact);
        }

        match matches.as_slice() {
            [] => Resolution::Unknown,
            [single] => Resolution::Match(*single),
            _ => Resolution::Ambiguous(
                matches
                    .iter()
                    .map(|&i| self.commands[i].name())
                    .collect(),
            ),
        }
    }
}

impl LineResult {
    fn fail(&mut self, line_no: usize, message: impl Display) {
        self.output = "error".to_string();
        self.diagnostic = Some(format!("Error (line {line_no}): {message}"));
    }
}

impl Default for Interpreter {
    /// Creates an interpreter with the full command set: the session
    /// commands (`quit`, `help`, `?`, `test`) and the list commands.
    fn default() -> Self {
        Self::new(vec![
            Box::new(Factory::<Quit>::default()),
            Box::new(Factory::<Help>::default()),
            Box::new(Factory::<HelpAlias>::default()),
            Box::new(Factory::<Test>::default()),
            Box::new(Factory::<Append>::default()),
            Box::new(Factory::<Prepend>::default()),
            Box::new(Factory::<InsertAt>::default()),
            Box::new(Factory::<RemoveAt>::default()),
            Box::new(Factory::<Get>::default()),
            Box::new(Factory::<Subscript>::default()),
            Box::new(Factory::<Size>::default()),
            Box::new(Factory::<Empty>::default()),
            Box::new(Factory::<Clear>::default()),
            Box::new(Factory::<Find>::default()),
            Box::new(Factory::<FindIndex>::default()),
            Box::new(Factory::<ForEach>::default()),
            Box::new(Factory::<Print>::default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn run(interp: &mut Interpreter, line: &str) -> LineResult {
        interp.process_line(line, 1, false)
    }

    #[test]
    fn test_scenario_through_dispatcher() {
        let mut interp = Interpreter::default();
        for line in ["append 10", "append 20", "prepend 5"] {
            let result = run(&mut interp, line);
            assert_eq!(result.output, "");
            assert!(result.diagnostic.is_none());
        }
        assert_eq!(run(&mut interp, "print").output, "5,10,20,");
        assert_eq!(run(&mut interp, "size").output, "3");
        assert_eq!(run(&mut interp, "insertat 15 2").output, "");
        assert_eq!(run(&mut interp, "print").output, "5,10,15,20,");
        assert_eq!(run(&mut interp, "removeat 0").output, "");
        assert_eq!(run(&mut interp, "get 1").output, "15");
        assert_eq!(run(&mut interp, "find 15").output, "15");
        assert_eq!(run(&mut interp, "findindex 15").output, "1");
    }

    #[test]
    fn test_blank_and_comment_lines_do_nothing() {
        let mut interp = Interpreter::default();
        let result = run(&mut interp, "");
        assert_eq!(result, LineResult {
            command: String::new(),
            expected: String::new(),
            output: String::new(),
            diagnostic: None,
            flow: Flow::Continue,
        });
        assert_eq!(run(&mut interp, "# note to self").output, "");
    }

    #[test]
    fn test_expected_field_is_carried_through() {
        let mut interp = Interpreter::default();
        interp.list_mut().push_back(10);
        let result = run(&mut interp, "get 0 ; 10 # first");
        assert_eq!(result.output, "10");
        assert_eq!(result.expected, "10");
        assert_eq!(result.command, "get 0");
    }

    #[test]
    fn test_unknown_command_reports_and_continues() {
        let mut interp = Interpreter::default();
        let result = run(&mut interp, "bogus 1 2");
        assert_eq!(result.output, "error");
        assert_eq!(result.flow, Flow::Continue);
        let diagnostic = result.diagnostic.unwrap();
        assert!(diagnostic.contains("Invalid command 'bogus'"));
        assert!(diagnostic.starts_with("Error (line 1):"));
    }

    #[test]
    fn test_prefix_match_runs_unique_command() {
        let mut interp = Interpreter::default();
        assert_eq!(run(&mut interp, "app 7").output, "");
        assert_eq!(run(&mut interp, "g 0").output, "7");
        assert_eq!(run(&mut interp, "si").output, "1");
    }

    #[test]
    fn test_exact_name_beats_longer_candidates() {
        // "find" is both a command and a prefix of "findindex"
        let mut interp = Interpreter::default();
        run(&mut interp, "append 4");
        assert_eq!(run(&mut interp, "find 4").output, "4");
    }

    #[test]
    fn test_ambiguous_prefix_reports_candidates() {
        let mut interp = Interpreter::default();
        let result = run(&mut interp, "f");
        assert_eq!(result.output, "error");
        let diagnostic = result.diagnostic.unwrap();
        assert!(diagnostic.contains("Ambiguous command 'f'"));
        assert!(diagnostic.contains("find"));
        assert!(diagnostic.contains("findindex"));
        assert!(diagnostic.contains("foreach"));
    }

    #[test]
    fn test_list_error_becomes_line_tagged_diagnostic() {
        let mut interp = Interpreter::default();
        let result = interp.process_line("get 0", 3, false);
        assert_eq!(result.output, "error");
        assert_eq!(
            result.diagnostic.as_deref(),
            Some("Error (line 3): invalid index")
        );
    }

    #[test]
    fn test_negative_position_is_rejected() {
        let mut interp = Interpreter::default();
        run(&mut interp, "append 1");
        for line in ["get -1", "removeat -1", "insertat 5 -1"] {
            let result = run(&mut interp, line);
            assert_eq!(result.output, "error", "line: {line}");
            assert!(result.diagnostic.unwrap().contains("invalid index"));
        }
        assert_eq!(run(&mut interp, "size").output, "1");
    }

    #[test]
    fn test_malformed_integer_is_invalid_argument() {
        let mut interp = Interpreter::default();
        let result = run(&mut interp, "append pear");
        assert_eq!(result.output, "error");
        let diagnostic = result.diagnostic.unwrap();
        assert!(diagnostic.contains("invalid argument"));
        assert!(diagnostic.contains("pear"));
    }

    #[test]
    fn test_clear_on_empty_list_reports() {
        let mut interp = Interpreter::default();
        let result = run(&mut interp, "clear");
        assert_eq!(result.output, "error");
        assert!(result.diagnostic.unwrap().contains("already empty"));
    }

    #[test]
    fn test_quit_stops_flow() {
        let mut interp = Interpreter::default();
        let result = run(&mut interp, "quit");
        assert_eq!(result.flow, Flow::Quit);
        assert_eq!(result.output, "");
    }

    #[test]
    fn test_process_stream_writes_one_line_per_command() {
        let mut interp = Interpreter::default();
        let mut input = Cursor::new("append 1\nappend 2\nsize\nprint\n");
        let mut output = Vec::new();
        interp
            .process_stream(&mut input, &mut output, false)
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "\n\n2\n1,2,\n");
    }

    #[test]
    fn test_process_stream_stops_at_quit() {
        let mut interp = Interpreter::default();
        let mut input = Cursor::new("append 1\nquit\nappend 2\n");
        let mut output = Vec::new();
        interp
            .process_stream(&mut input, &mut output, false)
            .unwrap();
        assert_eq!(interp.list().len(), 1);
    }

    fn make_test_file(content: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("list_repl_test_{}_{}", std::process::id(), nanos));
        fs::write(&path, content).expect("write test file");
        path
    }

    #[test]
    fn test_runner_reports_matches_and_summary() {
        let path = make_test_file("append 1 ;\nappend 2 ;\nsize ; 2\nget 0 ; 1 # head\n");
        let mut interp = Interpreter::default();
        let result = run(&mut interp, &format!("test {}", path.display()));

        assert!(result.diagnostic.is_none());
        assert!(result.output.contains("Line 1 same: Command: 'append 1'; Result: ''; Expected: ''"));
        assert!(result.output.contains("Line 3 same: Command: 'size'; Result: '2'; Expected: '2'"));
        assert!(result.output.contains("Line 4 same: Command: 'get 0'; Result: '1'; Expected: '1'"));
        assert!(result.output.contains("All tests passed"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_runner_counts_mismatches() {
        let path = make_test_file("append 1 ;\nsize ; 5\nget 9 ; error\n");
        let mut interp = Interpreter::default();
        let result = run(&mut interp, &format!("test {}", path.display()));

        assert!(result.output.contains("Line 2 differs: Command: 'size'; Result: '1'; Expected: '5'"));
        // the failed get produced the literal output "error", which matches
        assert!(result.output.contains("Line 3 same: Command: 'get 9'; Result: 'error'; Expected: 'error'"));
        assert!(result.output.contains("Error (line 3): invalid index"));
        assert!(result.output.contains("Failed test count - 1"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_runner_missing_file_reports() {
        let mut interp = Interpreter::default();
        let result = run(&mut interp, "test /no/such/file.txt");
        assert_eq!(result.output, "error");
        assert!(result.diagnostic.unwrap().contains("could not open input file"));
    }

    #[test]
    fn test_runner_quit_does_not_stop_session() {
        let path = make_test_file("append 1 ;\nquit ;\nappend 2 ;\n");
        let mut interp = Interpreter::default();
        let result = run(&mut interp, &format!("test {}", path.display()));

        assert_eq!(result.flow, Flow::Continue);
        // the quit line stopped the file before the second append
        assert_eq!(interp.list().len(), 1);

        let _ = fs::remove_file(path);
    }
}
