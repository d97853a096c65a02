use std::collections::BTreeMap;
use std::io::Write;

use gc::Gc;

use crate::builtins;
use crate::environment::Environment;
use crate::object::{EvaluationError, HashKey, HashPair, Object, QuickReturn};
use monkey_syntax::ast;
use monkey_syntax::ast::{Expression, InfixOperationKind, PrefixOperationKind};

/// Evaluates `program` against `environment`, which keeps every top-level
/// binding the program makes. A top-level `return` ends the program early.
/// Output of `puts` goes to stdout.
pub fn eval_program(
    program: &ast::Program,
    environment: &Environment,
) -> Result<Gc<Object>, EvaluationError> {
    eval_program_with_output(program, environment, &mut std::io::stdout())
}

/// Like [`eval_program`], with program output written to `output`.
#[tracing::instrument(level = "trace", skip_all, fields(statements = program.statements.len()))]
pub fn eval_program_with_output(
    program: &ast::Program,
    environment: &Environment,
    output: &mut dyn Write,
) -> Result<Gc<Object>, EvaluationError> {
    let mut result = Object::null();
    for statement in &program.statements {
        match eval_statement(statement, environment, output) {
            Err(QuickReturn::Return(value)) => return Ok(value),
            Err(QuickReturn::Error(error)) => {
                tracing::debug!(%error, "evaluation failed");
                return Err(error);
            }
            Ok(object) => result = object,
        };
    }
    Ok(result)
}

fn eval_statement(
    statement: &ast::Statement,
    environment: &Environment,
    output: &mut dyn Write,
) -> Result<Gc<Object>, QuickReturn> {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment, output),
        ast::Statement::Return(statement) => {
            eval_return_statement(statement, environment, output)
        }
        ast::Statement::Let(statement) => eval_let_statement(statement, environment, output),
    }
}

fn eval_let_statement(
    statement: &ast::LetStatement,
    environment: &Environment,
    output: &mut dyn Write,
) -> Result<Gc<Object>, QuickReturn> {
    let value = eval_expression(&statement.value, environment, output)?;
    environment.set(statement.identifier.name.clone(), value);
    Ok(Object::null())
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &Environment,
    output: &mut dyn Write,
) -> Result<Gc<Object>, QuickReturn> {
    let value = match &statement.value {
        Some(value) => eval_expression(value, environment, output)?,
        None => Object::null(),
    };
    Err(QuickReturn::Return(value))
}

fn eval_expression(
    expression: &Expression,
    environment: &Environment,
    output: &mut dyn Write,
) -> Result<Gc<Object>, QuickReturn> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::StringLiteral(value) => Ok(Object::string(value.as_str())),
        Expression::ArrayLiteral(array) => Ok(Object::array(eval_expressions(
            array,
            environment,
            output,
        )?)),
        Expression::HashLiteral(literal) => eval_hash_literal(literal, environment, output),
        Expression::Identifier(identifier) => eval_identifier(identifier, environment),
        Expression::PrefixOperation(kind, right) => {
            let right = eval_expression(right, environment, output)?;
            Ok(eval_prefix_operation(*kind, right)?)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment, output)?;
            let right = eval_expression(right, environment, output)?;
            Ok(eval_infix_operation(*kind, left, right)?)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment, output)?;
            if condition.is_truthy() {
                eval_block_statement(consequence, environment, output)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment, output)
            } else {
                Ok(Object::null())
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = eval_expression(function, environment, output)?;
            let arguments = eval_expressions(arguments, environment, output)?;
            Ok(apply_function(&function, arguments, output)?)
        }
        Expression::IndexExpression { left, index } => {
            let left = eval_expression(left, environment, output)?;
            let index = eval_expression(index, environment, output)?;
            Ok(eval_index_expression(left, index)?)
        }
    }
}

fn eval_identifier(
    identifier: &ast::Identifier,
    environment: &Environment,
) -> Result<Gc<Object>, QuickReturn> {
    if let Some(value) = environment.get(&identifier.name) {
        return Ok(value);
    }
    builtins::lookup(&identifier.name)
        .map(Object::builtin)
        .ok_or_else(|| EvaluationError::IdentifierNotFound(identifier.name.clone()).into())
}

fn eval_hash_literal(
    literal: &[(Expression, Expression)],
    environment: &Environment,
    output: &mut dyn Write,
) -> Result<Gc<Object>, QuickReturn> {
    let mut hash = BTreeMap::new();
    for (key, value) in literal {
        let key = eval_expression(key, environment, output)?;
        let hashed_key = HashKey::try_from(key.as_ref())?;
        let value = eval_expression(value, environment, output)?;
        hash.insert(hashed_key, HashPair { key, value });
    }
    Ok(Object::hash(hash))
}

/// Evaluates left to right, stopping at the first signal.
fn eval_expressions(
    expressions: &[Expression],
    environment: &Environment,
    output: &mut dyn Write,
) -> Result<Vec<Gc<Object>>, QuickReturn> {
    let mut result = Vec::with_capacity(expressions.len());
    for expression in expressions {
        result.push(eval_expression(expression, environment, output)?);
    }
    Ok(result)
}

fn apply_function(
    function: &Gc<Object>,
    arguments: Vec<Gc<Object>>,
    output: &mut dyn Write,
) -> Result<Gc<Object>, EvaluationError> {
    match function.as_ref() {
        Object::Function(function) => {
            if function.parameters.len() != arguments.len() {
                return Err(EvaluationError::WrongArgumentCount {
                    expected: function.parameters.len(),
                    actual: arguments.len(),
                });
            }
            tracing::trace!(arity = arguments.len(), "calling function");

            let environment = Environment::new_enclosed(&function.env);
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                environment.set(parameter.name.clone(), argument);
            }
            match eval_block_statement(&function.body, &environment, output) {
                Ok(object) => Ok(object),
                Err(QuickReturn::Return(value)) => Ok(value),
                Err(QuickReturn::Error(error)) => Err(error),
            }
        }
        Object::Builtin(builtin) => {
            tracing::trace!(name = builtin.name, "calling builtin");
            (builtin.func)(arguments, output)
        }
        other => Err(EvaluationError::NotAFunction(other.type_name())),
    }
}

fn eval_block_statement(
    block: &ast::BlockStatement,
    environment: &Environment,
    output: &mut dyn Write,
) -> Result<Gc<Object>, QuickReturn> {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment, output)?;
    }
    Ok(result)
}

fn eval_prefix_operation(
    kind: PrefixOperationKind,
    right: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (kind, right.as_ref()) {
        (PrefixOperationKind::Bang, object) => Ok(Object::boolean(!object.is_truthy())),
        (PrefixOperationKind::Minus, Object::Integer(value)) => {
            Ok(Object::integer(value.wrapping_neg()))
        }
        (operation, object) => Err(EvaluationError::UnknownPrefixOperator {
            operation,
            right: object.type_name(),
        }),
    }
}

fn eval_infix_operation(
    kind: InfixOperationKind,
    left: Gc<Object>,
    right: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (left.as_ref(), right.as_ref()) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        (Object::String(left_value), Object::String(right_value)) => match kind {
            InfixOperationKind::Plus => Ok(Object::string(format!("{}{}", left_value, right_value))),
            InfixOperationKind::Equal => Ok(Object::boolean(left_value == right_value)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(left_value != right_value)),
            _ => Err(unknown_infix_operator(kind, &left, &right)),
        },
        _ => match kind {
            InfixOperationKind::Equal => Ok(Object::boolean(objects_equal(&left, &right))),
            InfixOperationKind::NotEqual => Ok(Object::boolean(!objects_equal(&left, &right))),
            _ if left.type_name() != right.type_name() => Err(EvaluationError::TypeMismatch {
                left: left.type_name(),
                operation: kind,
                right: right.type_name(),
            }),
            _ => Err(unknown_infix_operator(kind, &left, &right)),
        },
    }
}

fn unknown_infix_operator(
    operation: InfixOperationKind,
    left: &Object,
    right: &Object,
) -> EvaluationError {
    EvaluationError::UnknownInfixOperator {
        left: left.type_name(),
        operation,
        right: right.type_name(),
    }
}

fn eval_integer_infix_operation(
    kind: InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Gc<Object>, EvaluationError> {
    use InfixOperationKind::*;
    match kind {
        Plus => Ok(Object::integer(left.wrapping_add(right))),
        Minus => Ok(Object::integer(left.wrapping_sub(right))),
        Multiply => Ok(Object::integer(left.wrapping_mul(right))),
        Divide if right == 0 => Err(EvaluationError::DivisionByZero),
        Divide => Ok(Object::integer(left.wrapping_div(right))),
        LessThan => Ok(Object::boolean(left < right)),
        GreaterThan => Ok(Object::boolean(left > right)),
        Equal => Ok(Object::boolean(left == right)),
        NotEqual => Ok(Object::boolean(left != right)),
    }
}

/// Equality for operands that are not both integers or both strings: booleans
/// and null by value, built-ins by name, everything else by identity.
/// Operands of different kinds are never equal.
fn objects_equal(left: &Gc<Object>, right: &Gc<Object>) -> bool {
    match (left.as_ref(), right.as_ref()) {
        (Object::Boolean(left), Object::Boolean(right)) => left == right,
        (Object::Null, Object::Null) => true,
        (Object::Builtin(left), Object::Builtin(right)) => left == right,
        _ => Gc::ptr_eq(left, right),
    }
}

fn eval_index_expression(
    left: Gc<Object>,
    index: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (left.as_ref(), index.as_ref()) {
        // Out of range is not an error.
        (Object::Array(array), Object::Integer(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|index| array.get(index))
            .cloned()
            .unwrap_or_else(Object::null)),
        (Object::Hash(hash), index) => {
            let hashed_index = HashKey::try_from(index)?;
            Ok(hash
                .get(&hashed_index)
                .map(|pair| pair.value.clone())
                .unwrap_or_else(Object::null))
        }
        (collection, index) => Err(EvaluationError::IndexNotSupported {
            collection: collection.type_name(),
            index: index.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use gc::Gc;
    use pretty_assertions::assert_eq;

    use super::Environment;
    use crate::object::{EvaluationError, Object};

    fn eval(input: &str) -> Result<Gc<Object>, EvaluationError> {
        let program = monkey_syntax::parse(input).unwrap();
        super::eval_program(&program, &Environment::new())
    }

    fn test_evaluation(inputs: Vec<(&str, Result<Gc<Object>, EvaluationError>)>) {
        for (input, output) in inputs {
            assert_eq!(eval(input), output, "input: {}", input);
        }
    }

    fn test_errors(inputs: Vec<(&str, &str)>) {
        for (input, message) in inputs {
            let error = eval(input).expect_err(input);
            assert_eq!(error.to_string(), message, "input: {}", input);
        }
    }

    fn test_display(inputs: Vec<(&str, &str)>) {
        for (input, expected) in inputs {
            let object = eval(input).unwrap();
            assert_eq!(object.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_literal() {
        let inputs = vec![
            ("5;", Ok(Object::integer(5))),
            ("true;", Ok(Object::boolean(true))),
            ("false;", Ok(Object::boolean(false))),
            ("\"hello\";", Ok(Object::string("hello"))),
            ("", Ok(Object::null())),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_integer_arithmetic() {
        let inputs = vec![
            ("--5;", Ok(Object::integer(5))),
            ("-10;", Ok(Object::integer(-10))),
            ("1 + 2 * 3", Ok(Object::integer(7))),
            ("(1 + 2) * 3", Ok(Object::integer(9))),
            ("5 + 5 + 5 + 5 - 10", Ok(Object::integer(10))),
            ("-50 + 100 + -50", Ok(Object::integer(0))),
            ("20 + 2 * -10", Ok(Object::integer(0))),
            ("50 / 2 * 2 + 10", Ok(Object::integer(60))),
            ("3 * (3 * 3) + 10", Ok(Object::integer(37))),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", Ok(Object::integer(50))),
            ("7 / 2", Ok(Object::integer(3))),
            ("-7 / 2", Ok(Object::integer(-3))),
            ("9223372036854775807 + 1", Ok(Object::integer(i64::MIN))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_boolean_expressions() {
        let inputs = vec![
            ("1 < 2", Ok(Object::boolean(true))),
            ("1 > 2", Ok(Object::boolean(false))),
            ("1 == 1", Ok(Object::boolean(true))),
            ("1 != 1", Ok(Object::boolean(false))),
            ("true == true", Ok(Object::boolean(true))),
            ("true != false", Ok(Object::boolean(true))),
            ("(1 < 2) == true", Ok(Object::boolean(true))),
            ("(1 > 2) == true", Ok(Object::boolean(false))),
            ("\"a\" == \"a\"", Ok(Object::boolean(true))),
            ("\"a\" != \"b\"", Ok(Object::boolean(true))),
            ("1 == true", Ok(Object::boolean(false))),
            ("1 != true", Ok(Object::boolean(true))),
            ("if (false) { 1 } == if (false) { 2 }", Ok(Object::boolean(true))),
            ("[1] == [1]", Ok(Object::boolean(false))),
            ("let a = [1]; a == a", Ok(Object::boolean(true))),
            ("len == len", Ok(Object::boolean(true))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_bang_operator() {
        let inputs = vec![
            ("!true", Ok(Object::boolean(false))),
            ("!false", Ok(Object::boolean(true))),
            ("!5", Ok(Object::boolean(false))),
            ("!!5", Ok(Object::boolean(true))),
            ("!0", Ok(Object::boolean(false))),
            ("!!true", Ok(Object::boolean(true))),
            ("!\"\"", Ok(Object::boolean(false))),
            ("!if (false) { 1 }", Ok(Object::boolean(true))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_if_else_expressions() {
        let inputs = vec![
            ("if (true) { 10 }", Ok(Object::integer(10))),
            ("if (false) { 10 }", Ok(Object::null())),
            ("if (1) { 10 }", Ok(Object::integer(10))),
            ("if (0) { 10 } else { 20 }", Ok(Object::integer(10))),
            ("if (1 < 2) { 10 }", Ok(Object::integer(10))),
            ("if (1 > 2) { 10 } else { 20 }", Ok(Object::integer(20))),
            ("if (1 > 2) { 10 }", Ok(Object::null())),
            ("if (true) { }", Ok(Object::null())),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_return_statements() {
        let inputs = vec![
            ("return 10;", Ok(Object::integer(10))),
            ("return 10; 9;", Ok(Object::integer(10))),
            ("return 2 * 5; 9;", Ok(Object::integer(10))),
            ("9; return 2 * 5; 9;", Ok(Object::integer(10))),
            ("return;", Ok(Object::null())),
            (
                "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                Ok(Object::integer(10)),
            ),
            (
                "let f = fn(x) { if (x) { return 1 } 2 }; [f(true), f(false)]",
                Ok(Object::array(vec![Object::integer(1), Object::integer(2)])),
            ),
            (
                "let f = fn() { return; 1 }; f()",
                Ok(Object::null()),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_let_statements() {
        let inputs = vec![
            ("let a = 5; a;", Ok(Object::integer(5))),
            ("let a = 5 * 5; a;", Ok(Object::integer(25))),
            ("let a = 5; let b = a; b;", Ok(Object::integer(5))),
            (
                "let a = 5; let b = a; let c = a + b + 5; c;",
                Ok(Object::integer(15)),
            ),
            ("let a = 5;", Ok(Object::null())),
            ("let a = 1; let a = a + 1; a", Ok(Object::integer(2))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_strings() {
        let inputs = vec![
            ("\"Hello\" + \" \" + \"World!\"", Ok(Object::string("Hello World!"))),
            ("len(\"four\")", Ok(Object::integer(4))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_function_application() {
        let inputs = vec![
            (
                "let identity = fn(x) { x }; identity(5)",
                Ok(Object::integer(5)),
            ),
            (
                "let identity = fn(x) { return x }; identity(5)",
                Ok(Object::integer(5)),
            ),
            (
                "let double = fn(x) { x * 2 }; double(5)",
                Ok(Object::integer(10)),
            ),
            (
                "let add = fn(x, y) { x + y }; add(5, 5)",
                Ok(Object::integer(10)),
            ),
            (
                "let add = fn(x, y) { x + y }; add(5 + 5, add(5, 5))",
                Ok(Object::integer(20)),
            ),
            ("fn(x) { x }(5)", Ok(Object::integer(5))),
            ("fn() { }()", Ok(Object::null())),
            (
                "let factorial = fn(n) { if (n == 0) { return 1 } return n * factorial(n - 1) }; factorial(5)",
                Ok(Object::integer(120)),
            ),
            (
                "
                let func = fn(a) {
                    fn(b) {
                        a + b
                    }
                };
                func(5)(10)",
                Ok(Object::integer(15)),
            ),
            (
                "let twice = fn(f, x) { f(f(x)) }; twice(fn(x) { x * 3 }, 2)",
                Ok(Object::integer(18)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_closure() {
        let inputs = vec![
            (
                r#"
            let fa = fn() {
                let x = 5;
                let fb = fn() {
                    x
                };
                fb
            };
            let temp = fa();
            temp()"#,
                Ok(Object::integer(5)),
            ),
            (
                r#"
            let fa = fn() {
                let x = 5;
                let fb = fn() {
                    fn() { x }
                };
                fb
            };
            let temp = fa();
            let temp_ = temp();
            temp_()"#,
                Ok(Object::integer(5)),
            ),
            (
                r#"
            let fa = fn() {
                let is_even = fn(x) {
                    if (x == 0) {
                        true
                    } else {
                        is_odd(x - 1)
                    }
                };
                let is_odd = fn(x) {
                    if (x == 0) {
                        false
                    } else {
                        is_even(x - 1)
                    }
                };
                is_even
            };
            let temp = fa();
            temp(3);"#,
                Ok(Object::boolean(false)),
            ),
        ];

        test_evaluation(inputs)
    }

    #[test]
    fn test_closures_capture_by_reference() {
        let inputs = vec![
            // Rebinding the counter after the closure is created is observed.
            (
                r#"
            let counter = 1;
            let read = fn() { counter };
            let first = read();
            let counter = counter + 1;
            [first, read()]"#,
                Ok(Object::array(vec![Object::integer(1), Object::integer(2)])),
            ),
            (
                r#"
            let make = fn() {
                let count = 0;
                let get = fn() { count };
                let count = 10;
                get
            };
            make()()"#,
                Ok(Object::integer(10)),
            ),
        ];

        test_evaluation(inputs)
    }

    #[test]
    fn test_scoping() {
        let inputs = vec![
            (
                "let x = 5; let f = fn() { let x = 10; x }; [f(), x]",
                Ok(Object::array(vec![Object::integer(10), Object::integer(5)])),
            ),
            (
                "let x = 5; let f = fn(x) { x * 2 }; f(3) + x",
                Ok(Object::integer(11)),
            ),
            (
                "let f = fn() { let inner = 1; inner }; f(); inner",
                Err(EvaluationError::IdentifierNotFound("inner".into())),
            ),
            (
                "let len = fn(x) { 42 }; len([1, 2])",
                Ok(Object::integer(42)),
            ),
        ];

        test_evaluation(inputs)
    }

    #[test]
    fn test_arrays_and_indexing() {
        let inputs = vec![
            (
                "[1, 2 * 2, 3 + 3]",
                Ok(Object::array(vec![
                    Object::integer(1),
                    Object::integer(4),
                    Object::integer(6),
                ])),
            ),
            ("[1, 2, 3][0]", Ok(Object::integer(1))),
            ("[1, 2, 3][1 + 1]", Ok(Object::integer(3))),
            ("let i = 0; [1][i]", Ok(Object::integer(1))),
            ("let a = [1, 2, 3]; a[0] + a[1] + a[2]", Ok(Object::integer(6))),
            ("[1, 2, 3][3]", Ok(Object::null())),
            ("[1, 2, 3][10]", Ok(Object::null())),
            ("[1, 2, 3][-1]", Ok(Object::null())),
            ("[[1, 2]][0][1]", Ok(Object::integer(2))),
            ("[[1, 2]][5][1]", Err(EvaluationError::IndexNotSupported {
                collection: "NULL",
                index: "INTEGER",
            })),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_hashes() {
        let inputs = vec![
            ("{\"foo\": 5}[\"foo\"]", Ok(Object::integer(5))),
            ("{\"foo\": 5}[\"bar\"]", Ok(Object::null())),
            ("let key = \"foo\"; {\"foo\": 5}[key]", Ok(Object::integer(5))),
            ("{}[\"foo\"]", Ok(Object::null())),
            ("{5: 5}[5]", Ok(Object::integer(5))),
            ("{true: 5}[true]", Ok(Object::integer(5))),
            ("{false: 5}[false]", Ok(Object::integer(5))),
            ("{1: 1, 1: 2}[1]", Ok(Object::integer(2))),
            ("{\"a\" + \"b\": 1}[\"ab\"]", Ok(Object::integer(1))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_builtins() {
        let inputs = vec![
            ("len(\"\")", Ok(Object::integer(0))),
            ("len(\"hello world\")", Ok(Object::integer(11))),
            ("len([1, 2, 3])", Ok(Object::integer(3))),
            ("first([1, 2, 3])", Ok(Object::integer(1))),
            ("last([1, 2, 3])", Ok(Object::integer(3))),
            ("last([])", Ok(Object::null())),
            (
                "rest([1, 2, 3])",
                Ok(Object::array(vec![Object::integer(2), Object::integer(3)])),
            ),
            (
                "let a = [1]; let b = push(a, 2); [len(a), len(b)]",
                Ok(Object::array(vec![Object::integer(1), Object::integer(2)])),
            ),
            ("puts()", Ok(Object::null())),
            (
                r#"
            let map = fn(arr, f) {
                let iter = fn(arr, accumulated) {
                    if (len(arr) == 0) {
                        accumulated
                    } else {
                        iter(rest(arr), push(accumulated, f(first(arr))))
                    }
                };
                iter(arr, [])
            };
            map([1, 2, 3], fn(x) { x * 2 })"#,
                Ok(Object::array(vec![
                    Object::integer(2),
                    Object::integer(4),
                    Object::integer(6),
                ])),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_error_messages() {
        let inputs = vec![
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
            ("\"a\" < 1", "type mismatch: STRING < INTEGER"),
            ("foobar", "identifier not found: foobar"),
            ("1 / 0", "division by zero"),
            ("5(1)", "not a function: INTEGER"),
            ("\"f\"()", "not a function: STRING"),
            ("fn(x) { x }()", "wrong number of arguments: expected 1, got 0"),
            ("fn() { 1 }(1, 2)", "wrong number of arguments: expected 0, got 2"),
            ("len(1)", "argument to `len` not supported, got INTEGER"),
            ("len(\"one\", \"two\")", "wrong number of arguments to `len`: expected 1, got 2"),
            ("first(1)", "argument to `first` not supported, got INTEGER"),
            ("push(1, 1)", "argument to `push` not supported, got INTEGER"),
            ("{\"name\": \"Monkey\"}[fn(x) { x }];", "unusable as hash key: FUNCTION"),
            ("{[1]: 2}", "unusable as hash key: ARRAY"),
            ("[1, 2][\"a\"]", "index operator not supported: ARRAY[STRING]"),
            ("1[0]", "index operator not supported: INTEGER[INTEGER]"),
        ];

        test_errors(inputs);
    }

    #[test]
    fn test_errors_stop_evaluation() {
        // The failing argument stops the call before the later argument runs.
        let env = Environment::new();
        let program = monkey_syntax::parse(
            "let f = fn(a, b) { 1 }; f(missing, fn() { let ran = true; ran }())",
        )
        .unwrap();
        assert_eq!(
            super::eval_program(&program, &env),
            Err(EvaluationError::IdentifierNotFound("missing".into()))
        );

        // A failing `let` does not bind.
        let program = monkey_syntax::parse("let y = 1 / 0;").unwrap();
        assert!(super::eval_program(&program, &env).is_err());
        assert_eq!(env.get("y"), None);

        let program = monkey_syntax::parse("[1, missing, 2 + true]").unwrap();
        assert_eq!(
            super::eval_program(&program, &env),
            Err(EvaluationError::IdentifierNotFound("missing".into()))
        );
    }

    #[test]
    fn test_inspect() {
        let inputs = vec![
            ("[1, \"two\", true, if (false) { 1 }]", "[1, two, true, null]"),
            ("{2: \"b\", 1: \"a\"}", "{1: a, 2: b}"),
            ("fn(x, y) { x + y }", "fn(x, y) {(x + y);}"),
            ("len", "builtin function len"),
        ];

        test_display(inputs);
    }

    #[test]
    fn test_same_ast_evaluated_twice() {
        let program =
            monkey_syntax::parse("let add = fn(a, b) { a + b }; add(1, 2)").unwrap();

        let first = super::eval_program(&program, &Environment::new());
        let second = super::eval_program(&program, &Environment::new());

        assert_eq!(first, Ok(Object::integer(3)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_bindings_persist_across_programs() {
        let env = Environment::new();
        for (input, expected) in [
            ("let x = 1", Object::null()),
            ("x + 1", Object::integer(2)),
            ("let inc = fn(n) { n + x }", Object::null()),
            ("inc(41)", Object::integer(42)),
        ] {
            let program = monkey_syntax::parse(input).unwrap();
            assert_eq!(super::eval_program(&program, &env), Ok(expected));
        }
    }

    #[test]
    fn test_call_environments_are_released() {
        let env = Environment::new();
        let program = monkey_syntax::parse(
            "let fa = fn() { let x = 5; fn() { x } }; let f = fa(); f()",
        )
        .unwrap();
        assert_eq!(super::eval_program(&program, &env), Ok(Object::integer(5)));

        let Some(closure) = env.get("f") else {
            panic!("`f` should be bound");
        };
        let crate::object::Object::Function(function) = closure.as_ref() else {
            panic!("`f` should be a function");
        };
        // The call frame of `fa` survives only through the closure.
        let frame = function.env.clone();
        assert_eq!(frame.get("x"), Some(Object::integer(5)));
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_recursive_closures_are_reclaimed() {
        let program =
            monkey_syntax::parse("let fa = fn() { let g = fn() { g }; g }; let f = fa();").unwrap();
        let env = Environment::new();
        assert_eq!(super::eval_program(&program, &env), Ok(Object::null()));

        // Every closure built from `fn() { g }` shares the literal's body.
        let body = match env.get("f").as_deref() {
            Some(Object::Function(function)) => function.body.clone(),
            other => panic!("`f` should be a function, got {:?}", other),
        };
        assert_eq!(Rc::strong_count(&body), 3);

        // `g` lives in the frame it captured, and `fa` in the global scope.
        drop(env);
        gc::force_collect();
        assert_eq!(Rc::strong_count(&body), 2);
    }

    #[test]
    fn test_program_output() {
        let program = monkey_syntax::parse(
            "puts(\"start\"); let f = fn(x) { puts(x); x * 2 }; puts(f(1), [f(2)]); 1 / 0; puts(\"unreached\")",
        )
        .unwrap();
        let mut output = Vec::new();

        let result = super::eval_program_with_output(&program, &Environment::new(), &mut output);

        assert_eq!(result, Err(EvaluationError::DivisionByZero));
        assert_eq!(String::from_utf8(output).unwrap(), "start\n1\n2\n2\n[4]\n");
    }
}
