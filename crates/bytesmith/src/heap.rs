use alloc::vec::Vec;

use crate::error::{Error, Result};

/// What an operation does when the allocator declines a reservation.
///
/// The policy is attached to each [`Buffer`](crate::Buffer) at construction
/// and inherited by everything derived from it: clones, format scratch
/// space, and the tokens produced by splitting. It is a property of the
/// value, never a per-call parameter.
///
/// # Examples
///
/// ```rust
/// use bytesmith::{AllocPolicy, Buffer};
///
/// let mut buf = Buffer::new().with_alloc_policy(AllocPolicy::Propagate);
/// assert!(buf.reserve(usize::MAX).is_err());
/// ```
///
/// # Default
///
/// [`AllocPolicy::Propagate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllocPolicy {
    /// Surface the failure as [`Error::Alloc`](crate::Error::Alloc) and
    /// leave the value untouched.
    #[default]
    Propagate,
    /// Panic with a diagnostic naming the failed reservation size. Programs
    /// built with `panic = "abort"` terminate on the spot, which makes every
    /// fallible operation infallible from the caller's point of view.
    Abort,
}

/// Amortized reservation: asks `Vec` for `additional` spare slots, letting
/// it grow by doubling. Used on the append/prepend path.
pub(crate) fn reserve<T>(vec: &mut Vec<T>, additional: usize, policy: AllocPolicy) -> Result<()> {
    vec.try_reserve(additional)
        .map_err(|_| fail(request_bytes::<T>(additional), policy))
}

/// Exact reservation for explicitly sized operations (`with_capacity`,
/// `set_free_space`, `grow`), where doubling would over-allocate.
pub(crate) fn reserve_exact<T>(
    vec: &mut Vec<T>,
    additional: usize,
    policy: AllocPolicy,
) -> Result<()> {
    vec.try_reserve_exact(additional)
        .map_err(|_| fail(request_bytes::<T>(additional), policy))
}

/// Overflow-checked size arithmetic; an overflowing sum is treated as a
/// failed reservation of `additional` bytes (the caller-requested part,
/// `base` being bookkeeping such as the sentinel slot).
pub(crate) fn total(base: usize, additional: usize, policy: AllocPolicy) -> Result<usize> {
    base.checked_add(additional)
        .ok_or_else(|| fail(additional, policy))
}

/// Applies the policy to a failed reservation: returns the error under
/// `Propagate`, never returns under `Abort`.
pub(crate) fn fail(requested: usize, policy: AllocPolicy) -> Error {
    if policy == AllocPolicy::Abort {
        oom_abort(requested);
    }
    Error::Alloc { requested }
}

pub(crate) fn oom_abort(requested: usize) -> ! {
    panic!("bytesmith: failed to reserve {requested} additional bytes")
}

fn request_bytes<T>(additional: usize) -> usize {
    additional.saturating_mul(core::mem::size_of::<T>())
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{AllocPolicy, reserve, reserve_exact, total};
    use crate::error::Error;

    #[test]
    fn impossible_reservation_propagates() {
        let mut v: Vec<u8> = Vec::new();
        assert_eq!(
            reserve(&mut v, usize::MAX, AllocPolicy::Propagate),
            Err(Error::Alloc {
                requested: usize::MAX
            })
        );
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn exact_reservation_failure_reports_size() {
        let mut v: Vec<u8> = Vec::new();
        assert_eq!(
            reserve_exact(&mut v, usize::MAX - 1, AllocPolicy::Propagate),
            Err(Error::Alloc {
                requested: usize::MAX - 1
            })
        );
    }

    #[test]
    #[should_panic(expected = "failed to reserve")]
    fn impossible_reservation_aborts() {
        let mut v: Vec<u8> = Vec::new();
        let _ = reserve(&mut v, usize::MAX, AllocPolicy::Abort);
    }

    #[test]
    fn total_checks_overflow() {
        assert_eq!(total(10, 20, AllocPolicy::Propagate), Ok(30));
        assert_eq!(
            total(usize::MAX, 1, AllocPolicy::Propagate),
            Err(Error::Alloc { requested: 1 })
        );
    }
}
