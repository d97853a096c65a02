use std::ops::ControlFlow;

use monkey_syntax::ast::Program;
use monkey_syntax::parser::ParseError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = ">> ";

pub enum ReadOutput {
    ControlFlow(ControlFlow<()>),
    Value(Program),
    ParseErrors(Vec<ParseError>),
}

pub struct Reader {
    rl: DefaultEditor,
}

impl Reader {
    pub fn new(rl: DefaultEditor) -> Self {
        Self { rl }
    }

    pub fn read(&mut self) -> Result<ReadOutput, ReadlineError> {
        let line = match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                return Ok(ReadOutput::ControlFlow(ControlFlow::Continue(())));
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                return Ok(ReadOutput::ControlFlow(ControlFlow::Break(())));
            }
            Err(err) => return Err(err),
            Ok(line) => line,
        };
        if line.trim().is_empty() {
            return Ok(ReadOutput::ControlFlow(ControlFlow::Continue(())));
        }
        self.rl.add_history_entry(line.as_str())?;

        Ok(parse_line(&line))
    }
}

pub fn parse_line(line: &str) -> ReadOutput {
    match monkey_syntax::parse(line) {
        Ok(program) => ReadOutput::Value(program),
        Err(errors) => {
            tracing::debug!(count = errors.len(), "line failed to parse");
            ReadOutput::ParseErrors(errors)
        }
    }
}
