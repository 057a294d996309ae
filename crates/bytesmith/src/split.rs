use alloc::vec::Vec;
use core::ops::Index;

use bstr::ByteSlice;

use crate::{
    Buffer,
    error::Result,
    heap::{self, AllocPolicy},
};

/// A delimiter-based tokenizer yielding owned [`Buffer`] tokens.
///
/// Construction copies both the source bytes and the delimiter, so the
/// iterator is self-contained: it can outlive the buffer it came from, and
/// mutating that buffer mid-iteration has no effect on the tokens.
///
/// Runs of consecutive delimiters are collapsed and never produce empty
/// tokens, including at either end of the source. An empty delimiter yields
/// the whole remaining source as a single token, after which the iterator
/// is exhausted. Once exhausted the iterator frees its copies; [`release`]
/// does the same early, and dropping the iterator always cleans up.
///
/// [`release`]: SplitIter::release
///
/// # Examples
///
/// ```rust
/// use bytesmith::SplitIter;
///
/// # fn demo() -> bytesmith::Result<()> {
/// let mut words = SplitIter::new(b"Ehy how are you?", b" ")?;
/// assert_eq!(words.next().unwrap()?, "Ehy");
/// assert_eq!(words.next().unwrap()?, "how");
/// assert_eq!(words.next().unwrap()?, "are");
/// assert_eq!(words.next().unwrap()?, "you?");
/// assert!(words.next().is_none());
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
#[derive(Debug)]
pub struct SplitIter {
    src: Vec<u8>,
    del: Vec<u8>,
    cursor: usize,
    done: bool,
    policy: AllocPolicy,
}

impl SplitIter {
    /// Creates a tokenizer over copies of `source` and `delimiter`.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if copying either input fails.
    pub fn new(source: &[u8], delimiter: &[u8]) -> Result<SplitIter> {
        SplitIter::with_alloc_policy(source, delimiter, AllocPolicy::default())
    }

    /// Like [`new`](SplitIter::new), with an explicit allocation policy that
    /// also flows into every yielded token.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if copying either input fails.
    pub fn with_alloc_policy(
        source: &[u8],
        delimiter: &[u8],
        policy: AllocPolicy,
    ) -> Result<SplitIter> {
        Ok(SplitIter {
            src: copied(source, policy)?,
            del: copied(delimiter, policy)?,
            cursor: 0,
            done: false,
            policy,
        })
    }

    /// Drains the remaining tokens into a [`TokenList`].
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if building a token or growing
    /// the list fails. Tokens collected up to that point are released
    /// before the error is returned; nothing leaks.
    pub fn collect_tokens(mut self) -> Result<TokenList> {
        let mut tokens: Vec<Buffer> = Vec::new();
        while let Some(tok) = self.next() {
            let tok = tok?;
            heap::reserve(&mut tokens, 1, self.policy)?;
            tokens.push(tok);
        }
        Ok(TokenList { tokens })
    }

    /// Frees the iterator's copies of the source and delimiter and marks it
    /// exhausted. Idempotent; later `next` calls yield `None`.
    pub fn release(&mut self) {
        self.done = true;
        self.dispose();
    }

    fn dispose(&mut self) {
        self.src = Vec::new();
        self.del = Vec::new();
    }

    fn token(&self, start: usize, end: usize) -> Result<Buffer> {
        let mut tok = Buffer::new().with_alloc_policy(self.policy);
        tok.concat(&self.src[start..end])?;
        Ok(tok)
    }
}

impl Iterator for SplitIter {
    type Item = Result<Buffer>;

    fn next(&mut self) -> Option<Result<Buffer>> {
        if self.done {
            self.dispose();
            return None;
        }
        if self.del.is_empty() {
            // Whole remainder as one token, then exhausted.
            self.done = true;
            return Some(self.token(self.cursor, self.src.len()));
        }
        loop {
            if self.cursor >= self.src.len() {
                // Ran off the end collapsing trailing delimiters.
                self.done = true;
                self.dispose();
                return None;
            }
            match self.src[self.cursor..].find(&self.del) {
                None => {
                    self.done = true;
                    return Some(self.token(self.cursor, self.src.len()));
                }
                Some(0) => self.cursor += self.del.len(),
                Some(at) => {
                    let start = self.cursor;
                    self.cursor = start + at + self.del.len();
                    return Some(self.token(start, start + at));
                }
            }
        }
    }
}

fn copied(src: &[u8], policy: AllocPolicy) -> Result<Vec<u8>> {
    let mut vec = Vec::new();
    heap::reserve_exact(&mut vec, src.len(), policy)?;
    vec.extend_from_slice(src);
    Ok(vec)
}

/// An owned, ordered collection of split tokens.
///
/// Dropping the list (or calling [`release`](TokenList::release)) releases
/// every contained [`Buffer`] along with the list's own storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Buffer>,
}

impl TokenList {
    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the list holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Buffer> {
        self.tokens.get(index)
    }

    /// The tokens as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Buffer] {
        &self.tokens
    }

    /// Borrowing iterator over the tokens.
    pub fn iter(&self) -> core::slice::Iter<'_, Buffer> {
        self.tokens.iter()
    }

    /// Unwraps the list into its backing vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Buffer> {
        self.tokens
    }

    /// Joins the tokens with `separator` between consecutive elements.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if building the output fails.
    pub fn join(&self, separator: &[u8]) -> Result<Buffer> {
        join(self.iter(), separator)
    }

    /// Releases every token and the list's own storage, leaving a valid
    /// empty list. Idempotent; [`Drop`] performs the same teardown.
    pub fn release(&mut self) {
        self.tokens = Vec::new();
    }
}

impl Index<usize> for TokenList {
    type Output = Buffer;

    fn index(&self, index: usize) -> &Buffer {
        &self.tokens[index]
    }
}

impl IntoIterator for TokenList {
    type Item = Buffer;
    type IntoIter = alloc::vec::IntoIter<Buffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Buffer;
    type IntoIter = core::slice::Iter<'a, Buffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl FromIterator<Buffer> for TokenList {
    fn from_iter<I: IntoIterator<Item = Buffer>>(iter: I) -> TokenList {
        TokenList {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// Splits `source` on `delimiter` and collects the tokens.
///
/// Consecutive delimiters collapse, so no empty tokens are produced; an
/// empty delimiter yields the whole source as one token.
///
/// # Examples
///
/// ```rust
/// use bytesmith::split;
///
/// # fn demo() -> bytesmith::Result<()> {
/// let words = split(b"Ehy how are you?", b" ")?;
/// assert_eq!(words.len(), 4);
/// assert_eq!(words[0], "Ehy");
/// assert_eq!(words[3], "you?");
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
///
/// # Errors
///
/// [`Error::Alloc`](crate::Error::Alloc) if any allocation fails.
pub fn split(source: &[u8], delimiter: &[u8]) -> Result<TokenList> {
    SplitIter::new(source, delimiter)?.collect_tokens()
}

/// Concatenates `items` with `separator` between consecutive elements (and
/// not after the last). No items produce an empty buffer.
///
/// # Examples
///
/// ```rust
/// use bytesmith::join;
///
/// # fn demo() -> bytesmith::Result<()> {
/// let line = join(["Ehy", "how", "are", "you?"], b" ")?;
/// assert_eq!(line, "Ehy how are you?");
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
///
/// # Errors
///
/// [`Error::Alloc`](crate::Error::Alloc) if building the output fails.
pub fn join<I>(items: I, separator: &[u8]) -> Result<Buffer>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut out = Buffer::new();
    let mut first = true;
    for item in items {
        if !first {
            out.concat(separator)?;
        }
        out.concat(item.as_ref())?;
        first = false;
    }
    Ok(out)
}

impl Buffer {
    /// Creates a [`SplitIter`] over a copy of this buffer's content. The
    /// iterator and its tokens inherit this buffer's allocation policy.
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if copying fails.
    pub fn split_iter(&self, delimiter: &[u8]) -> Result<SplitIter> {
        SplitIter::with_alloc_policy(self.as_bytes(), delimiter, self.alloc_policy())
    }

    /// Splits this buffer's content on `delimiter`. See [`split`].
    ///
    /// # Errors
    ///
    /// [`Error::Alloc`](crate::Error::Alloc) if any allocation fails.
    pub fn split(&self, delimiter: &[u8]) -> Result<TokenList> {
        self.split_iter(delimiter)?.collect_tokens()
    }
}
