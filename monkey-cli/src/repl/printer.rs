use std::io::Write;

use monkey_eval::{EvaluationError, Gc, Object};
use monkey_syntax::parser::ParseError;

use crate::runner::write_parse_errors;

pub trait Printer {
    type Object;

    fn print(&mut self, object: Self::Object) -> std::io::Result<()>;

    fn print_parse_errors(&mut self, errors: &[ParseError]) -> std::io::Result<()>;

    /// Where program output goes, so it interleaves with printed results.
    fn output(&mut self) -> &mut dyn Write;
}

pub struct InterpreterPrinter<W: Write> {
    out: W,
}

impl<W: Write> InterpreterPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Printer for InterpreterPrinter<W> {
    type Object = Result<Gc<Object>, EvaluationError>;

    fn print(&mut self, object: Self::Object) -> std::io::Result<()> {
        match object {
            Ok(object) => writeln!(self.out, "{}", object)?,
            Err(error) => writeln!(self.out, "ERROR: {}", error)?,
        }
        self.out.flush()
    }

    fn print_parse_errors(&mut self, errors: &[ParseError]) -> std::io::Result<()> {
        write_parse_errors(&mut self.out, errors)?;
        self.out.flush()
    }

    fn output(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}
