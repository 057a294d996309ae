use alloc::vec::Vec;
use core::{
    borrow::Borrow,
    cmp::Ordering,
    ffi::CStr,
    hash::{Hash, Hasher},
    ops::{Deref, DerefMut, Index, IndexMut},
    slice::SliceIndex,
    str::Utf8Error,
};

use bstr::ByteSlice;

use crate::{
    error::Result,
    heap::{self, AllocPolicy},
};

/// A growable, exclusively owned byte string.
///
/// A `Buffer` tracks a length and a capacity over one contiguous heap
/// region and guarantees that a readable NUL byte sits immediately after the
/// content at all times, so the content can be handed to NUL-terminated
/// consumers without copying (see [`as_c_str`](Buffer::as_c_str)). The
/// sentinel is bookkeeping, not content: it is invisible to [`len`],
/// [`as_bytes`], comparisons, and iteration.
///
/// Mutations happen in place. Appending through [`concat`] grows the
/// allocation by amortized doubling, so building a string out of N pieces
/// costs O(log N) reallocations; explicitly sized operations such as
/// [`set_free_space`] and [`grow`] reserve exactly what was asked.
/// Operations that can allocate return a [`Result`] and leave the buffer
/// untouched on failure; what "failure" does is decided by the buffer's
/// [`AllocPolicy`].
///
/// [`len`]: Buffer::len
/// [`as_bytes`]: Buffer::as_bytes
/// [`concat`]: Buffer::concat
/// [`set_free_space`]: Buffer::set_free_space
/// [`grow`]: Buffer::grow
///
/// # Examples
///
/// ```rust
/// use bytesmith::Buffer;
///
/// # fn demo() -> bytesmith::Result<()> {
/// let mut buf = Buffer::from_slice(b"Hello")?;
/// buf.concat_str(" World")?;
/// assert_eq!(buf, "Hello World");
/// assert_eq!(buf.find(b"World"), Some(6));
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
#[derive(Default)]
pub struct Buffer {
    // Either empty (nothing allocated yet, or released) or `content + NUL`,
    // so `bytes.len() == self.len() + 1` and the last byte is 0.
    bytes: Vec<u8>,
    policy: AllocPolicy,
}

impl Buffer {
    /// Creates an empty buffer without allocating.
    #[must_use]
    pub const fn new() -> Buffer {
        Buffer {
            bytes: Vec::new(),
            policy: AllocPolicy::Propagate,
        }
    }

    /// Creates an empty buffer with at least `cap` bytes of free space.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn with_capacity(cap: usize) -> Result<Buffer> {
        Buffer::from_slice_with_capacity(b"", cap)
    }

    /// Creates a buffer holding a copy of `src`, sized to fit.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn from_slice(src: &[u8]) -> Result<Buffer> {
        Buffer::from_slice_with_capacity(src, 0)
    }

    /// Creates a buffer holding a copy of `src` with capacity for at least
    /// `max(cap, src.len())` content bytes.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn from_slice_with_capacity(src: &[u8], cap: usize) -> Result<Buffer> {
        let policy = AllocPolicy::Propagate;
        let cap = cap.max(src.len());
        let mut bytes = Vec::new();
        heap::reserve_exact(&mut bytes, heap::total(1, cap, policy)?, policy)?;
        bytes.extend_from_slice(src);
        bytes.push(0);
        Ok(Buffer { bytes, policy })
    }

    /// Adopts `bytes` as content, reusing its allocation.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if appending the NUL sentinel
    /// forces a reservation that fails.
    pub fn from_vec(mut bytes: Vec<u8>) -> Result<Buffer> {
        let policy = AllocPolicy::Propagate;
        heap::reserve_exact(&mut bytes, 1, policy)?;
        bytes.push(0);
        Ok(Buffer { bytes, policy })
    }

    /// Sets the allocation-failure policy, which every value derived from
    /// this buffer (clones, format scratch space, split tokens) inherits.
    #[must_use]
    pub fn with_alloc_policy(mut self, policy: AllocPolicy) -> Buffer {
        self.policy = policy;
        self
    }

    /// The allocation-failure policy this buffer was configured with.
    #[must_use]
    #[inline]
    pub fn alloc_policy(&self) -> AllocPolicy {
        self.policy
    }

    /// Number of content bytes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len().saturating_sub(1)
    }

    /// Whether the buffer holds no content.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Content bytes the current allocation can hold without growing.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity().saturating_sub(1)
    }

    /// Bytes that can be appended without growing: `capacity() - len()`.
    #[must_use]
    #[inline]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len()
    }

    /// The content as a slice.
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The content as a mutable slice. Writes through it cannot disturb the
    /// length or the sentinel.
    #[must_use]
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len();
        &mut self.bytes[..len]
    }

    /// The content plus the trailing NUL sentinel.
    #[must_use]
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.bytes.is_empty() {
            b"\0"
        } else {
            &self.bytes
        }
    }

    /// The content as a C string, or `None` if it contains an interior NUL.
    #[must_use]
    #[inline]
    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_with_nul(self.as_bytes_with_nul()).ok()
    }

    /// The content as UTF-8.
    ///
    /// # Errors
    ///
    /// The underlying [`Utf8Error`] if the content is not valid UTF-8.
    pub fn to_str(&self) -> core::result::Result<&str, Utf8Error> {
        core::str::from_utf8(self.as_bytes())
    }

    /// Copies this buffer into a new, independently owned one with the same
    /// content and policy. The copy is sized to fit; its capacity may be
    /// smaller than this buffer's.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn try_clone(&self) -> Result<Buffer> {
        let mut bytes = Vec::new();
        if !self.bytes.is_empty() {
            heap::reserve_exact(&mut bytes, self.bytes.len(), self.policy)?;
            bytes.extend_from_slice(&self.bytes);
        }
        Ok(Buffer {
            bytes,
            policy: self.policy,
        })
    }

    /// Resizes the allocation so that exactly `n` bytes of free space
    /// remain, releasing capacity when more than that is free. Content and
    /// length are unchanged. The allocator may round the result up, so treat
    /// `free_space() >= n` as the guarantee.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if growing the allocation
    /// fails; the buffer is unchanged.
    pub fn set_free_space(&mut self, n: usize) -> Result<()> {
        if self.bytes.is_empty() {
            if n == 0 {
                return Ok(());
            }
            heap::reserve_exact(&mut self.bytes, heap::total(1, n, self.policy)?, self.policy)?;
            self.bytes.push(0);
            return Ok(());
        }
        let target = heap::total(self.bytes.len(), n, self.policy)?;
        if target < self.bytes.capacity() {
            self.bytes.shrink_to(target);
        } else {
            heap::reserve_exact(&mut self.bytes, n, self.policy)?;
        }
        Ok(())
    }

    /// Ensures at least `n` bytes of free space, growing the allocation if
    /// needed and never shrinking it.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn reserve(&mut self, n: usize) -> Result<()> {
        if self.free_space() >= n {
            return Ok(());
        }
        self.set_free_space(n)
    }

    /// Extends the content to `new_len` bytes, zero-filling the newly
    /// exposed tail. Does nothing if `new_len <= len()`.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails; the
    /// buffer is unchanged.
    pub fn grow(&mut self, new_len: usize) -> Result<()> {
        if new_len <= self.len() {
            return Ok(());
        }
        let target = heap::total(1, new_len, self.policy)?;
        let additional = target - self.bytes.len();
        heap::reserve_exact(&mut self.bytes, additional, self.policy)?;
        self.bytes.resize(target, 0);
        Ok(())
    }

    /// Cuts the content down to `new_len` bytes. Capacity is retained; the
    /// freed tail is not rewritten. Does nothing if `new_len >= len()`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len() {
            return;
        }
        self.bytes.truncate(new_len + 1);
        self.bytes[new_len] = 0;
    }

    /// Empties the content, keeping the allocation for reuse.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Keeps only the bytes in `[start, end)`, shifted to the front.
    /// Capacity is retained.
    ///
    /// Out-of-range requests degrade instead of panicking: `start >= len()`
    /// and `end < start` leave the buffer untouched, and `end` is clamped to
    /// `len()`.
    pub fn slice_in_place(&mut self, start: usize, end: usize) {
        let len = self.len();
        if start >= len || end < start {
            return;
        }
        let end = end.min(len);
        let keep = end - start;
        self.bytes.copy_within(start..end, 0);
        self.bytes.truncate(keep + 1);
        self.bytes[keep] = 0;
    }

    /// Removes the longest prefix made of bytes present in `cutset`.
    pub fn trim_start(&mut self, cutset: &[u8]) {
        let n = self
            .as_bytes()
            .iter()
            .take_while(|b| cutset.contains(b))
            .count();
        if n == 0 {
            return;
        }
        let keep = self.len() - n;
        self.bytes.copy_within(n..n + keep, 0);
        self.bytes.truncate(keep + 1);
        self.bytes[keep] = 0;
    }

    /// Removes the longest suffix made of bytes present in `cutset`.
    pub fn trim_end(&mut self, cutset: &[u8]) {
        let keep = self
            .as_bytes()
            .iter()
            .rposition(|b| !cutset.contains(b))
            .map_or(0, |i| i + 1);
        self.truncate(keep);
    }

    /// Removes bytes present in `cutset` from both ends. Trimming a cutset
    /// that covers the entire content leaves a valid empty buffer.
    pub fn trim(&mut self, cutset: &[u8]) {
        self.trim_end(cutset);
        self.trim_start(cutset);
    }

    /// Byte offset of the first occurrence of `needle`, or `None` if absent.
    /// An empty needle never matches.
    #[must_use]
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.as_bytes().find(needle)
    }

    /// Byte offset of the last occurrence of `needle`, or `None` if absent.
    /// An empty needle never matches.
    #[must_use]
    pub fn rfind(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.as_bytes().rfind(needle)
    }

    /// Whether `needle` occurs in the content.
    #[must_use]
    pub fn contains(&self, needle: &[u8]) -> bool {
        self.find(needle).is_some()
    }

    /// Converts ASCII letters to lowercase in place; other bytes are left
    /// alone.
    pub fn make_ascii_lowercase(&mut self) {
        self.as_bytes_mut().make_ascii_lowercase();
    }

    /// Converts ASCII letters to uppercase in place; other bytes are left
    /// alone.
    pub fn make_ascii_uppercase(&mut self) {
        self.as_bytes_mut().make_ascii_uppercase();
    }

    /// Frees the allocation, leaving a valid empty buffer. Idempotent, and
    /// equivalent to what [`Drop`] does; useful to reclaim memory while the
    /// value stays alive.
    pub fn release(&mut self) {
        self.bytes = Vec::new();
    }

    /// Appends a copy of `src` after the current content.
    ///
    /// When free space runs out the allocation grows geometrically (at
    /// least a doubling step), so a run of appends costs O(log n)
    /// reallocations rather than one per call.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails; the
    /// buffer is unchanged.
    pub fn concat(&mut self, src: &[u8]) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        let additional = src.len() + usize::from(self.bytes.is_empty());
        heap::reserve(&mut self.bytes, additional, self.policy)?;
        self.bytes.pop();
        self.bytes.extend_from_slice(src);
        self.bytes.push(0);
        Ok(())
    }

    /// Appends a string slice. See [`concat`](Buffer::concat).
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn concat_str(&mut self, src: &str) -> Result<()> {
        self.concat(src.as_bytes())
    }

    /// Appends another buffer's content. Both buffers remain independently
    /// owned.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn concat_buffer(&mut self, other: &Buffer) -> Result<()> {
        self.concat(other.as_bytes())
    }

    /// Inserts a copy of `src` before the current content, shifting it
    /// right. Same growth policy as [`concat`](Buffer::concat).
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails; the
    /// buffer is unchanged.
    pub fn prepend(&mut self, src: &[u8]) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        if self.bytes.is_empty() {
            return self.concat(src);
        }
        heap::reserve(&mut self.bytes, src.len(), self.policy)?;
        let old = self.bytes.len();
        self.bytes.resize(old + src.len(), 0);
        self.bytes.copy_within(..old, src.len());
        self.bytes[..src.len()].copy_from_slice(src);
        Ok(())
    }

    /// Prepends a string slice. See [`prepend`](Buffer::prepend).
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn prepend_str(&mut self, src: &str) -> Result<()> {
        self.prepend(src.as_bytes())
    }

    /// Prepends another buffer's content.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn prepend_buffer(&mut self, other: &Buffer) -> Result<()> {
        self.prepend(other.as_bytes())
    }
}

impl Clone for Buffer {
    /// Like [`try_clone`](Buffer::try_clone), except that an allocation
    /// failure panics with the reservation diagnostic (`Clone` has no error
    /// channel), regardless of policy.
    fn clone(&self) -> Buffer {
        match self.try_clone() {
            Ok(buf) => buf,
            Err(_) => heap::oom_abort(self.bytes.len()),
        }
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Borrow<[u8]> for Buffer {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<I: SliceIndex<[u8]>> Index<I> for Buffer {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        &self.as_bytes()[index]
    }
}

impl<I: SliceIndex<[u8]>> IndexMut<I> for Buffer {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        &mut self.as_bytes_mut()[index]
    }
}

impl From<&[u8]> for Buffer {
    /// Copying constructor; panics with the reservation diagnostic if the
    /// allocation fails. Use [`Buffer::from_slice`] to handle that case.
    fn from(src: &[u8]) -> Buffer {
        match Buffer::from_slice(src) {
            Ok(buf) => buf,
            Err(_) => heap::oom_abort(src.len()),
        }
    }
}

impl From<&str> for Buffer {
    fn from(src: &str) -> Buffer {
        Buffer::from(src.as_bytes())
    }
}

impl<const N: usize> From<&[u8; N]> for Buffer {
    fn from(src: &[u8; N]) -> Buffer {
        Buffer::from(src.as_slice())
    }
}

impl From<Vec<u8>> for Buffer {
    /// Adopting constructor; panics with the reservation diagnostic if the
    /// allocation fails. Use [`Buffer::from_vec`] to handle that case.
    fn from(src: Vec<u8>) -> Buffer {
        let len = src.len();
        match Buffer::from_vec(src) {
            Ok(buf) => buf,
            Err(_) => heap::oom_abort(len),
        }
    }
}

impl PartialEq for Buffer {
    /// Content equality; capacity and policy are not compared.
    fn eq(&self, other: &Buffer) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Buffer {}

impl PartialEq<[u8]> for Buffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for Buffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Buffer {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.as_bytes() == other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for Buffer {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_bytes() == *other
    }
}

impl PartialEq<str> for Buffer {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Buffer {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<Buffer> for [u8] {
    fn eq(&self, other: &Buffer) -> bool {
        self == other.as_bytes()
    }
}

impl PartialEq<Buffer> for &[u8] {
    fn eq(&self, other: &Buffer) -> bool {
        *self == other.as_bytes()
    }
}

impl PartialEq<Buffer> for str {
    fn eq(&self, other: &Buffer) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<Buffer> for &str {
    fn eq(&self, other: &Buffer) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialOrd for Buffer {
    fn partial_cmp(&self, other: &Buffer) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Buffer {
    fn cmp(&self, other: &Buffer) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for Buffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl core::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self.as_bytes().as_bstr(), f)
    }
}

impl core::fmt::Display for Buffer {
    /// Lossy display; non-UTF-8 bytes render as replacement characters.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self.as_bytes().as_bstr(), f)
    }
}
