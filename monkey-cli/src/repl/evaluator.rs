use std::io::Write;

use monkey_eval::{eval_program_with_output, Environment, EvaluationError, Gc, Object};
use monkey_syntax::ast::Program;

pub trait Evaluator {
    type Object;

    /// Evaluates one input. Output the program produces goes to `output`.
    fn evaluate(&mut self, program: Program, output: &mut dyn Write) -> Self::Object;
}

/// Evaluates each input against one environment that lives for the whole
/// session, so bindings made by earlier inputs stay visible. A failing input
/// keeps whatever it bound before the error.
#[derive(Default)]
pub struct InterpreterEvaluator {
    environment: Environment,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Result<Gc<Object>, EvaluationError>;

    fn evaluate(&mut self, program: Program, output: &mut dyn Write) -> Self::Object {
        eval_program_with_output(&program, &self.environment, output)
    }
}
