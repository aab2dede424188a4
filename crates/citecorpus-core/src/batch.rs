//! Fixed-size batching over a fallible record stream

/// Default number of documents written per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Iterator adapter that groups `Ok` items into `Vec`s of at most `size`.
///
/// The first `Err` is yielded on its own and ends the iteration; rows
/// buffered before it are discarded so no partial batch reaches the writer.
pub struct Batches<I> {
    inner: I,
    size: usize,
    done: bool,
}

impl<I> Batches<I> {
    pub fn new(inner: I, size: usize) -> Self {
        Self {
            inner,
            size: size.max(1),
            done: false,
        }
    }
}

impl<T, E, I> Iterator for Batches<I>
where
    I: Iterator<Item = Result<T, E>>,
{
    type Item = Result<Vec<T>, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut batch = Vec::with_capacity(self.size);
        while batch.len() < self.size {
            match self.inner.next() {
                Some(Ok(row)) => batch.push(row),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if batch.is_empty() { None } else { Some(Ok(batch)) }
    }
}

/// Extension for grouping a fallible iterator into batches.
pub trait BatchExt: Iterator + Sized {
    fn batches(self, size: usize) -> Batches<Self> {
        Batches::new(self, size)
    }
}

impl<I: Iterator> BatchExt for I {}

#[cfg(test)]
mod tests {
    use super::*;

    fn oks(n: usize) -> impl Iterator<Item = Result<usize, String>> {
        (0..n).map(Ok)
    }

    #[test]
    fn splits_into_full_and_tail_batches() {
        let sizes: Vec<usize> = oks(2500)
            .batches(1024)
            .map(|b| b.unwrap().len())
            .collect();
        assert_eq!(sizes, vec![1024, 1024, 452]);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        assert_eq!(oks(2048).batches(1024).count(), 2);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(oks(0).batches(1024).count(), 0);
    }

    #[test]
    fn preserves_order() {
        let flat: Vec<usize> = oks(10)
            .batches(3)
            .flat_map(|b| b.unwrap())
            .collect();
        assert_eq!(flat, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn error_drops_partial_batch_and_stops() {
        let items = vec![Ok(1), Ok(2), Err("bad".to_string()), Ok(3)];
        let mut it = items.into_iter().batches(10);
        assert_eq!(it.next(), Some(Err("bad".to_string())));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn zero_size_treated_as_one() {
        assert_eq!(oks(3).batches(0).count(), 3);
    }
}
