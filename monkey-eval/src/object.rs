use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::Write;
use std::rc::Rc;

use gc::{Finalize, Gc, Trace};
use monkey_syntax::ast;
use thiserror::Error;

use crate::environment::Environment;

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Gc<Object>>),
    Hash(BTreeMap<HashKey, HashPair>),
    Function(Function),
    Builtin(Builtin),
    Null,
}

thread_local! {
    static NULL: Gc<Object> = Gc::new(Object::Null);
    static TRUE: Gc<Object> = Gc::new(Object::Boolean(true));
    static FALSE: Gc<Object> = Gc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Gc<Object> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Gc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: i64) -> Gc<Object> {
        Gc::new(Object::Integer(value))
    }
    pub fn string(value: impl Into<String>) -> Gc<Object> {
        Gc::new(Object::String(value.into()))
    }
    pub fn array(array: Vec<Gc<Object>>) -> Gc<Object> {
        Gc::new(Object::Array(array))
    }
    pub fn hash(hash: BTreeMap<HashKey, HashPair>) -> Gc<Object> {
        Gc::new(Object::Hash(hash))
    }
    pub fn function(
        parameters: Rc<[ast::Identifier]>,
        body: Rc<ast::BlockStatement>,
        env: Environment,
    ) -> Gc<Object> {
        Gc::new(Object::Function(Function {
            parameters,
            body,
            env,
        }))
    }
    pub fn builtin(builtin: Builtin) -> Gc<Object> {
        Gc::new(Object::Builtin(builtin))
    }

    /// Name of the value's kind as it appears in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Null => "NULL",
        }
    }

    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Trace, Finalize)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub struct HashPair {
    pub key: Gc<Object>,
    pub value: Gc<Object>,
}

impl TryFrom<&Object> for HashKey {
    type Error = EvaluationError;

    fn try_from(value: &Object) -> Result<Self, Self::Error> {
        match value {
            Object::Integer(int) => Ok(HashKey::Integer(*int)),
            Object::String(str) => Ok(HashKey::String(str.clone())),
            Object::Boolean(bool) => Ok(HashKey::Boolean(*bool)),
            _ => Err(EvaluationError::UnusableHashKey(value.type_name())),
        }
    }
}

/// A function value: the literal's parameters and body plus the environment
/// that was active where the literal was evaluated.
#[derive(Clone, Trace, Finalize)]
pub struct Function {
    #[unsafe_ignore_trace]
    pub parameters: Rc<[ast::Identifier]>,
    #[unsafe_ignore_trace]
    pub body: Rc<ast::BlockStatement>,
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body) && self.env == other.env
    }
}

// The captured environment may hold this very function, so it is never
// printed.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("ptr", &Rc::as_ptr(&self.body))
            .finish()
    }
}

/// Built-ins write program output to the sink they are handed.
pub type BuiltinFn = fn(Vec<Gc<Object>>, &mut dyn Write) -> Result<Gc<Object>, EvaluationError>;

#[derive(Clone, Trace, Finalize)]
pub struct Builtin {
    #[unsafe_ignore_trace]
    pub name: &'static str,
    #[unsafe_ignore_trace]
    pub func: BuiltinFn,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// Signals that cut evaluation short: a `return` on its way to the enclosing
/// call, or a runtime error on its way to the top.
#[derive(Debug, PartialEq)]
pub enum QuickReturn {
    Return(Gc<Object>),
    Error(EvaluationError),
}

impl From<EvaluationError> for QuickReturn {
    fn from(error: EvaluationError) -> Self {
        QuickReturn::Error(error)
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvaluationError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(Rc<str>),
    #[error("type mismatch: {left} {operation} {right}")]
    TypeMismatch {
        left: &'static str,
        operation: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operation} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operation: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("unknown operator: {operation}{right}")]
    UnknownPrefixOperator {
        operation: ast::PrefixOperationKind,
        right: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments: expected {expected}, got {actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("wrong number of arguments to `{name}`: expected {expected}, got {actual}")]
    BuiltinArgumentCount {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("argument to `{name}` not supported, got {kind}")]
    UnsupportedArgument {
        name: &'static str,
        kind: &'static str,
    },
    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),
    #[error("index operator not supported: {collection}[{index}]")]
    IndexNotSupported {
        collection: &'static str,
        index: &'static str,
    },
    #[error("failed to write output: {0}")]
    Output(Rc<str>),
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Array(array) => {
                write!(f, "[")?;
                for (i, element) in array.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Object::Hash(hash) => {
                write!(f, "{{")?;
                for (i, pair) in hash.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Object::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|id| id.name.as_ref())
                    .collect::<Vec<&str>>()
                    .join(", ");
                write!(f, "fn({}) {}", parameters, function.body)
            }
            Object::Builtin(builtin) => write!(f, "builtin function {}", builtin.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{HashKey, HashPair, Object};
    use crate::object::EvaluationError;

    #[test]
    fn test_singletons() {
        assert!(gc::Gc::ptr_eq(&Object::null(), &Object::null()));
        assert!(gc::Gc::ptr_eq(
            &Object::boolean(true),
            &Object::boolean(true)
        ));
    }

    #[test]
    fn test_truthiness() {
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::String(String::new()).is_truthy());
        assert!(Object::Boolean(true).is_truthy());
        assert!(!Object::Boolean(false).is_truthy());
        assert!(!Object::Null.is_truthy());
    }

    #[test]
    fn test_hash_keys() {
        assert_eq!(HashKey::try_from(&Object::Integer(1)), Ok(HashKey::Integer(1)));
        assert_eq!(
            HashKey::try_from(&Object::String("a".to_owned())),
            Ok(HashKey::String("a".to_owned()))
        );
        assert_eq!(
            HashKey::try_from(&Object::Array(vec![])),
            Err(EvaluationError::UnusableHashKey("ARRAY"))
        );
    }

    #[test]
    fn test_display() {
        let array = Object::Array(vec![
            Object::integer(1),
            Object::string("two"),
            Object::null(),
        ]);
        assert_eq!(array.to_string(), "[1, two, null]");

        let mut hash = BTreeMap::new();
        for (key, value) in [(Object::integer(2), true), (Object::integer(1), false)] {
            hash.insert(
                HashKey::try_from(key.as_ref()).unwrap(),
                HashPair {
                    key,
                    value: Object::boolean(value),
                },
            );
        }
        assert_eq!(Object::Hash(hash).to_string(), "{1: false, 2: true}");
    }
}
