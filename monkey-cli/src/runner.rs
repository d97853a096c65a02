use std::io::Write;

use monkey_eval::{eval_program_with_output, Environment};
use monkey_syntax::parser::ParseError;

/// Writes every syntax error under a `parser errors:` heading.
pub fn write_parse_errors(out: &mut impl Write, errors: &[ParseError]) -> std::io::Result<()> {
    writeln!(out, "parser errors:")?;
    for error in errors {
        writeln!(out, "\t{}", error)?;
    }
    Ok(())
}

/// Runs a whole script in a fresh environment. Besides what the program
/// writes through `puts`, only syntax and runtime errors produce output.
pub fn execute(source: &str, out: &mut impl Write) -> std::io::Result<()> {
    let program = match monkey_syntax::parse(source) {
        Ok(program) => program,
        Err(errors) => {
            tracing::debug!(count = errors.len(), "script failed to parse");
            return write_parse_errors(out, &errors);
        }
    };

    let environment = Environment::new();
    if let Err(error) = eval_program_with_output(&program, &environment, out) {
        writeln!(out, "ERROR: {}", error)?;
    }
    Ok(())
}
