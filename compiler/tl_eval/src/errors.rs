//! Execution errors and their constructors.
//!
//! Every execution error becomes exactly one `[Error: ...]` output line; the
//! `Display` text here is the message inside the marker. Constructors are
//! the single import point for handlers:
//!
//! ```ignore
//! use crate::errors::{undefined_variable, division_by_zero};
//! ```

use thiserror::Error;

/// A recoverable error raised by a command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("Unknown command '{name}'")]
    UnknownCommand { name: String },
    #[error("Invalid '{command}' command. Use: {usage}")]
    Usage {
        command: &'static str,
        usage: &'static str,
    },
    #[error("Variable '{name}' is not defined")]
    UndefinedVariable { name: String },
    #[error("Function '{name}' is not defined. Use 'def {name} ... end' to define it first")]
    UndefinedFunction { name: String },
    #[error("Function '{name}' expects {expected} argument(s) but got {got}")]
    WrongArgCount {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("Cannot divide by zero")]
    DivisionByZero,
    #[error("Cannot take modulo by zero")]
    ModuloByZero,
    #[error("Integer overflow in '{operation}'")]
    IntegerOverflow { operation: &'static str },
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: &'static str, got: String },
    #[error("{0}")]
    Domain(String),
    #[error("Index {index} out of range for '{name}' (length {len})")]
    IndexOutOfBounds { name: String, index: i64, len: usize },
    #[error("Key '{key}' not found in '{name}'")]
    KeyNotFound { name: String, key: String },
    #[error("Class '{name}' is not defined")]
    UndefinedClass { name: String },
    #[error("Class '{class}' has no method '{method}'")]
    NoSuchMethod { class: String, method: String },
    #[error("'{owner}' has no field '{field}'")]
    NoSuchField { owner: String, field: String },
    #[error("Struct type '{name}' is not defined")]
    UndefinedStructType { name: String },
    #[error("Unknown field type '{ty}'")]
    UnknownFieldType { ty: String },
    #[error("Module '{name}' not found at '{path}'")]
    ModuleNotFound { name: String, path: String },
    #[error("Module '{module}' has no function '{name}'")]
    ModuleNoFunction { module: String, name: String },
    #[error("Cannot read '{path}': {message}")]
    Io { path: String, message: String },
    #[error("While loop exceeded maximum iterations ({max})")]
    LoopCeiling { max: usize },
    #[error("Maximum call depth ({max}) exceeded")]
    CallDepth { max: usize },
    #[error("'{keyword}' used outside of a loop")]
    OutsideLoop { keyword: &'static str },
    #[error("No input available for '{name}'")]
    NoInput { name: String },
    #[error("Thread {id} does not exist")]
    UnknownThread { id: i64 },
    #[error("Thread {id} panicked")]
    ThreadPanicked { id: i64 },
    #[error("Mutex '{name}' does not exist")]
    UnknownMutex { name: String },
    #[error("'{dependency}' library not available")]
    LibraryUnavailable { dependency: String },
    #[error("{0}")]
    Custom(String),
}

/// Result type for fallible command bodies.
pub type ExecResult<T> = Result<T, ExecError>;

#[cold]
pub fn unknown_command(name: &str) -> ExecError {
    ExecError::UnknownCommand {
        name: name.to_string(),
    }
}

#[cold]
pub fn usage(command: &'static str, usage: &'static str) -> ExecError {
    ExecError::Usage { command, usage }
}

#[cold]
pub fn undefined_variable(name: &str) -> ExecError {
    ExecError::UndefinedVariable {
        name: name.to_string(),
    }
}

#[cold]
pub fn undefined_function(name: &str) -> ExecError {
    ExecError::UndefinedFunction {
        name: name.to_string(),
    }
}

#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> ExecError {
    ExecError::WrongArgCount {
        name: name.to_string(),
        expected,
        got,
    }
}

#[cold]
pub fn division_by_zero() -> ExecError {
    ExecError::DivisionByZero
}

#[cold]
pub fn modulo_by_zero() -> ExecError {
    ExecError::ModuloByZero
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> ExecError {
    ExecError::IntegerOverflow { operation }
}

#[cold]
pub fn type_mismatch(expected: &'static str, got: &str) -> ExecError {
    ExecError::TypeMismatch {
        expected,
        got: got.to_string(),
    }
}

#[cold]
pub fn domain_error(message: impl Into<String>) -> ExecError {
    ExecError::Domain(message.into())
}

#[cold]
pub fn index_out_of_bounds(name: &str, index: i64, len: usize) -> ExecError {
    ExecError::IndexOutOfBounds {
        name: name.to_string(),
        index,
        len,
    }
}

#[cold]
pub fn key_not_found(name: &str, key: &str) -> ExecError {
    ExecError::KeyNotFound {
        name: name.to_string(),
        key: key.to_string(),
    }
}

#[cold]
pub fn undefined_class(name: &str) -> ExecError {
    ExecError::UndefinedClass {
        name: name.to_string(),
    }
}

#[cold]
pub fn no_such_method(class: &str, method: &str) -> ExecError {
    ExecError::NoSuchMethod {
        class: class.to_string(),
        method: method.to_string(),
    }
}

#[cold]
pub fn no_such_field(owner: &str, field: &str) -> ExecError {
    ExecError::NoSuchField {
        owner: owner.to_string(),
        field: field.to_string(),
    }
}

#[cold]
pub fn undefined_struct_type(name: &str) -> ExecError {
    ExecError::UndefinedStructType {
        name: name.to_string(),
    }
}

#[cold]
pub fn unknown_field_type(ty: &str) -> ExecError {
    ExecError::UnknownFieldType { ty: ty.to_string() }
}

#[cold]
pub fn library_unavailable(dependency: &str) -> ExecError {
    ExecError::LibraryUnavailable {
        dependency: dependency.to_string(),
    }
}

#[cold]
pub fn custom(message: impl Into<String>) -> ExecError {
    ExecError::Custom(message.into())
}
