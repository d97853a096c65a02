mod evaluator;
mod printer;
mod reader;

use std::io::Write;
use std::ops::ControlFlow;

use rustyline::DefaultEditor;

use evaluator::{Evaluator, InterpreterEvaluator};
use printer::{InterpreterPrinter, Printer};
use reader::{ReadOutput, Reader};

/// Evaluation and printing for one session, independent of where lines come from.
struct Session<E: Evaluator, P: Printer> {
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Session<E, P> {
    fn handle(&mut self, input: ReadOutput) -> std::io::Result<ControlFlow<()>> {
        match input {
            ReadOutput::ControlFlow(flow) => return Ok(flow),
            ReadOutput::ParseErrors(errors) => self.printer.print_parse_errors(&errors)?,
            ReadOutput::Value(program) => {
                let result = self.evaluator.evaluate(program, self.printer.output());
                self.printer.print(result)?
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    session: Session<E, P>,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) -> anyhow::Result<()> {
        loop {
            let input = self.reader.read()?;
            if self.session.handle(input)?.is_break() {
                return Ok(());
            }
        }
    }
}

fn session<W: Write>(out: W) -> Session<InterpreterEvaluator, InterpreterPrinter<W>> {
    Session {
        evaluator: InterpreterEvaluator::new(),
        printer: InterpreterPrinter::new(out),
    }
}

pub fn start() -> anyhow::Result<()> {
    let rl = DefaultEditor::new()?;

    Repl {
        reader: Reader::new(rl),
        session: session(std::io::stdout()),
    }
    .run()
}
