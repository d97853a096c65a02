pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod object;

pub use environment::Environment;
pub use evaluator::{eval_program, eval_program_with_output};
pub use gc::Gc;
pub use object::{EvaluationError, Object};
