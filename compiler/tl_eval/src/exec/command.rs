//! The closed set of built-in commands.
//!
//! One table maps each command name to its variant and handler. Names not in
//! the table are either external handlers or unknown commands; the executor
//! reports the latter explicitly instead of falling into a default arm.

use super::{basic, classes, collections, control, debugger, functions, modules, structs, text};
use super::{threads, vars, Handler};

macro_rules! commands {
    ($($variant:ident => $name:literal => $handler:path,)*) => {
        /// A built-in command.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum Command {
            $($variant,)*
        }

        impl Command {
            /// Every built-in command, in table order.
            pub const ALL: &'static [Command] = &[$(Command::$variant,)*];

            pub fn from_name(name: &str) -> Option<Command> {
                match name {
                    $($name => Some(Command::$variant),)*
                    _ => None,
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $(Command::$variant => $name,)*
                }
            }

            pub(crate) fn handler(self) -> Handler {
                match self {
                    $(Command::$variant => $handler,)*
                }
            }
        }
    };
}

commands! {
    // Value register and stack
    Boot => "boot" => basic::boot,
    Ping => "ping" => basic::ping,
    Crash => "crash" => basic::crash,
    Reboot => "reboot" => basic::reboot,
    Hack => "hack" => basic::hack,
    Upload => "upload" => basic::upload,
    Download => "download" => basic::download,
    Fork => "fork" => basic::fork,
    Debug => "debug" => basic::debug,
    Print => "print" => basic::print,
    Input => "input" => basic::input,

    // Variables and arithmetic
    Set => "set" => vars::set,
    Add => "add" => vars::add,
    Sub => "sub" => vars::sub,
    Mul => "mul" => vars::mul,
    Div => "div" => vars::div,
    Mod => "mod" => vars::modulo,
    Push => "push" => vars::push,
    Pop => "pop" => vars::pop,
    Swap => "swap" => vars::swap,
    MathSqrt => "math_sqrt" => vars::math_sqrt,
    MathPow => "math_pow" => vars::math_pow,
    MathAbs => "math_abs" => vars::math_abs,
    MathMin => "math_min" => vars::math_min,
    MathMax => "math_max" => vars::math_max,
    MathPi => "math_pi" => vars::math_pi,

    // Strings
    StrCreate => "str_create" => text::str_create,
    StrConcat => "str_concat" => text::str_concat,
    StrLength => "str_length" => text::str_length,
    StrSubstring => "str_substring" => text::str_substring,
    StrUpper => "str_upper" => text::str_upper,
    StrLower => "str_lower" => text::str_lower,
    StrContains => "str_contains" => text::str_contains,
    StrSplit => "str_split" => text::str_split,

    // Arrays and dictionaries
    ArrayCreate => "array_create" => collections::array_create,
    ArraySet => "array_set" => collections::array_set,
    ArrayGet => "array_get" => collections::array_get,
    ArrayPush => "array_push" => collections::array_push,
    ArrayPop => "array_pop" => collections::array_pop,
    ArrayLength => "array_length" => collections::array_length,
    DictCreate => "dict_create" => collections::dict_create,
    DictSet => "dict_set" => collections::dict_set,
    DictGet => "dict_get" => collections::dict_get,
    DictKeys => "dict_keys" => collections::dict_keys,
    DictHas => "dict_has" => collections::dict_has,

    // Structs
    Struct => "struct" => structs::struct_command,

    // Control flow
    If => "if" => control::if_block,
    Loop => "loop" => control::loop_block,
    While => "while" => control::while_block,
    Switch => "switch" => control::switch_block,
    Match => "match" => control::match_block,
    Try => "try" => control::try_block,
    Break => "break" => control::break_command,
    Continue => "continue" => control::continue_command,

    // Functions
    Def => "def" => functions::def,
    Fn => "fn" => functions::closure,
    Call => "call" => functions::call,
    Return => "return" => functions::return_command,

    // Classes
    Class => "class" => classes::class,
    New => "new" => classes::new_instance,
    GetField => "get_field" => classes::get_field,
    SetField => "set_field" => classes::set_field,
    InstanceOf => "instanceof" => classes::instance_of,

    // Modules
    Package => "package" => modules::package,
    Import => "import" => modules::import,
    Export => "export" => modules::export,

    // Concurrency
    ThreadCreate => "thread_create" => threads::thread_create,
    ThreadJoin => "thread_join" => threads::thread_join,
    ThreadStatus => "thread_status" => threads::thread_status,
    ThreadSleep => "thread_sleep" => threads::sleep,
    Sleep => "sleep" => threads::sleep,
    MutexCreate => "mutex_create" => threads::mutex_create,
    MutexLock => "mutex_lock" => threads::mutex_lock,
    MutexUnlock => "mutex_unlock" => threads::mutex_unlock,

    // Debugger
    Breakpoint => "breakpoint" => debugger::breakpoint,
    Step => "step" => debugger::step,
    Resume => "resume" => debugger::resume,
    Inspect => "inspect" => debugger::inspect,
    Watch => "watch" => debugger::watch,
    Unwatch => "unwatch" => debugger::unwatch,
    ClearBreakpoints => "clear_breakpoints" => debugger::clear_breakpoints,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rustc_hash::FxHashSet;

    #[test]
    fn every_command_round_trips_through_its_name() {
        for &cmd in Command::ALL {
            assert_eq!(Command::from_name(cmd.name()), Some(cmd));
        }
    }

    #[test]
    fn command_names_are_unique() {
        let names: FxHashSet<&str> = Command::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), Command::ALL.len());
    }

    #[test]
    fn block_openers_are_commands() {
        for word in ["def", "fn", "if", "loop", "while", "switch", "match", "try", "struct", "class"] {
            assert!(Command::from_name(word).is_some(), "{word}");
        }
    }

    #[test]
    fn unknown_names_are_not_commands() {
        assert_eq!(Command::from_name("frobnicate"), None);
        assert_eq!(Command::from_name("end"), None);
        assert_eq!(Command::from_name("macro"), None);
    }
}
