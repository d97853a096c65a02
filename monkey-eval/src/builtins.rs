use std::io::Write;

use gc::Gc;

use crate::object::{Builtin, EvaluationError, Object};

fn expect_arguments(
    name: &'static str,
    args: &[Gc<Object>],
    expected: usize,
) -> Result<(), EvaluationError> {
    if args.len() != expected {
        return Err(EvaluationError::BuiltinArgumentCount {
            name,
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

fn unsupported(name: &'static str, arg: &Object) -> EvaluationError {
    EvaluationError::UnsupportedArgument {
        name,
        kind: arg.type_name(),
    }
}

fn builtin_len(
    args: Vec<Gc<Object>>,
    _output: &mut dyn Write,
) -> Result<Gc<Object>, EvaluationError> {
    expect_arguments("len", &args, 1)?;
    match args[0].as_ref() {
        Object::String(s) => Ok(Object::integer(s.chars().count() as i64)),
        Object::Array(arr) => Ok(Object::integer(arr.len() as i64)),
        other => Err(unsupported("len", other)),
    }
}

fn builtin_first(
    args: Vec<Gc<Object>>,
    _output: &mut dyn Write,
) -> Result<Gc<Object>, EvaluationError> {
    expect_arguments("first", &args, 1)?;
    match args[0].as_ref() {
        Object::Array(arr) => Ok(arr.first().cloned().unwrap_or_else(Object::null)),
        other => Err(unsupported("first", other)),
    }
}

fn builtin_last(
    args: Vec<Gc<Object>>,
    _output: &mut dyn Write,
) -> Result<Gc<Object>, EvaluationError> {
    expect_arguments("last", &args, 1)?;
    match args[0].as_ref() {
        Object::Array(arr) => Ok(arr.last().cloned().unwrap_or_else(Object::null)),
        other => Err(unsupported("last", other)),
    }
}

fn builtin_rest(
    args: Vec<Gc<Object>>,
    _output: &mut dyn Write,
) -> Result<Gc<Object>, EvaluationError> {
    expect_arguments("rest", &args, 1)?;
    match args[0].as_ref() {
        Object::Array(arr) if arr.is_empty() => Ok(Object::null()),
        Object::Array(arr) => Ok(Object::array(arr[1..].to_owned())),
        other => Err(unsupported("rest", other)),
    }
}

fn builtin_push(
    args: Vec<Gc<Object>>,
    _output: &mut dyn Write,
) -> Result<Gc<Object>, EvaluationError> {
    expect_arguments("push", &args, 2)?;
    match args[0].as_ref() {
        Object::Array(arr) => {
            let mut new_arr = arr.clone();
            new_arr.push(args[1].clone());
            Ok(Object::array(new_arr))
        }
        other => Err(unsupported("push", other)),
    }
}

fn builtin_puts(
    args: Vec<Gc<Object>>,
    output: &mut dyn Write,
) -> Result<Gc<Object>, EvaluationError> {
    for arg in args {
        writeln!(output, "{}", arg)
            .map_err(|error| EvaluationError::Output(error.to_string().into()))?;
    }
    Ok(Object::null())
}

const BUILTINS: [Builtin; 6] = [
    Builtin {
        name: "len",
        func: builtin_len,
    },
    Builtin {
        name: "first",
        func: builtin_first,
    },
    Builtin {
        name: "last",
        func: builtin_last,
    },
    Builtin {
        name: "rest",
        func: builtin_rest,
    },
    Builtin {
        name: "push",
        func: builtin_push,
    },
    Builtin {
        name: "puts",
        func: builtin_puts,
    },
];

/// Resolves a built-in by name. Consulted only after the environment chain,
/// so user bindings shadow built-ins.
pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name).cloned()
}
