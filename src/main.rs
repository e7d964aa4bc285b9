use anyhow::Context;
use argh::FromArgs;
use list_repl::Interpreter;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Write};

#[derive(FromArgs)]
/// A line-oriented REPL exercising a singly linked list of integers.
struct Args {
    /// evaluate the provided command expression and exit
    #[argh(option, short = 'e')]
    expression: Option<String>,

    /// source file of commands to evaluate line by line
    #[argh(option, short = 's')]
    source: Option<String>,

    /// output file to write results to
    #[argh(option, short = 'o')]
    output: Option<String>,

    /// force an interactive session
    #[argh(switch, short = 'i')]
    interactive: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    let mut interpreter = Interpreter::default();

    // -i overrides the other source options; with neither -e nor -s the
    // session is interactive as well.
    let interactive = args.interactive || (args.expression.is_none() && args.source.is_none());

    if interactive && args.output.is_none() {
        interpreter.repl()?;
        return Ok(());
    }

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("error creating output file '{path}'"))?,
        ),
        None => Box::new(io::stdout()),
    };

    if interactive {
        let mut stdin = io::stdin().lock();
        interpreter.process_stream(&mut stdin, &mut output, true)?;
    } else if let Some(expression) = args.expression {
        let mut input = Cursor::new(expression);
        interpreter.process_stream(&mut input, &mut output, false)?;
    } else if let Some(path) = args.source {
        let file =
            File::open(&path).with_context(|| format!("error opening source file '{path}'"))?;
        let mut input = BufReader::new(file);
        interpreter.process_stream(&mut input, &mut output, false)?;
    }

    Ok(())
}
