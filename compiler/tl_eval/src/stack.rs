//! Native stack growth for recursive script calls.
//!
//! Every user function call re-enters the executor, so a recursive script
//! recurses natively too. Calls run through [`ensure_sufficient_stack`],
//! which grows the stack on native targets before it runs out. The call
//! depth limit still applies; this only keeps legal depths from crashing.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_native_recursion_grows_the_stack() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }

        assert_eq!(depth(100_000), 100_000);
    }

    #[test]
    fn returns_closure_result() {
        assert_eq!(ensure_sufficient_stack(|| 42), 42);
    }
}
