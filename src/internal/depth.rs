//! Nested resolution depth tracking.

use std::cell::RefCell;

use crate::error::{IocError, IocResult};

// Thread-local resolution state for runaway recursion detection
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<&'static str>,
}

/// Guard for the thread-local resolution stack.
///
/// Entering pushes the contract being resolved; dropping pops it. A
/// dependency cycle keeps pushing until the configured limit is hit, at which
/// point entering fails instead of overflowing the native stack.
pub(crate) struct DepthGuard {
    name: &'static str,
}

impl DepthGuard {
    pub(crate) fn enter(name: &'static str, max_depth: usize) -> IocResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if tls.stack.len() >= max_depth {
                let tail: Vec<&'static str> = tls.stack.iter().rev().take(4).copied().collect();
                tracing::warn!(depth = tls.stack.len(), contract = name, recent = ?tail, "resolution depth exceeded");
                return Err(IocError::DepthExceeded(max_depth));
            }
            tls.stack.push(name);
            Ok(Self { name })
        })
    }

    /// Current nesting on this thread.
    #[cfg(test)]
    pub(crate) fn current() -> usize {
        RESOLUTION_TLS.with(|tls| tls.borrow().stack.len())
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some(last) = tls.stack.pop() {
                debug_assert_eq!(last, self.name);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_nest_and_unwind() {
        assert_eq!(DepthGuard::current(), 0);
        {
            let _a = DepthGuard::enter("a", 2).unwrap();
            let _b = DepthGuard::enter("b", 2).unwrap();
            assert_eq!(DepthGuard::current(), 2);
            assert_eq!(DepthGuard::enter("c", 2).err(), Some(IocError::DepthExceeded(2)));
            assert_eq!(DepthGuard::current(), 2);
        }
        assert_eq!(DepthGuard::current(), 0);
    }
}
