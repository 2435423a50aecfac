//! Grouped cursor over pre-sorted rows.
//!
//! Both input streams arrive sorted by their grouping key (an invariant of
//! the corpus exports, not enforced here). [Grouped] pulls one maximal run
//! of adjacent equal-keyed rows at a time, which keeps the downstream state
//! machines explicit and testable without any I/O.
use std::iter::Peekable;

pub struct Grouped<I, K, F>
where
    I: Iterator,
{
    iter: Peekable<I>,
    key: F,
    _marker: std::marker::PhantomData<K>,
}

impl<I, K, F> Grouped<I, K, F>
where
    I: Iterator,
    K: PartialEq,
    F: FnMut(&I::Item) -> K,
{
    pub fn new(iter: I, key: F) -> Self {
        Self {
            iter: iter.peekable(),
            key,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<I, K, F> Iterator for Grouped<I, K, F>
where
    I: Iterator,
    K: PartialEq,
    F: FnMut(&I::Item) -> K,
{
    type Item = (K, Vec<I::Item>);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.iter.next()?;
        let key = (self.key)(&first);
        let mut group = vec![first];
        while let Some(item) = self.iter.peek() {
            if (self.key)(item) == key {
                group.push(self.iter.next().unwrap());
            } else {
                break;
            }
        }
        Some((key, group))
    }
}
