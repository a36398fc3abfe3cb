//! Position-ordered iterators over `OrderedMap`.

use crate::ordered_map::Entry;
use core::iter::FusedIterator;
use core::slice;

macro_rules! ordered_iter {
    ($(#[$doc:meta])* $name:ident<$lt:lifetime>, $slice_iter:ident, $item:ty, |$e:ident| $project:expr) => {
        $(#[$doc])*
        pub struct $name<$lt, K, V> {
            it: slice::$slice_iter<$lt, Entry<K, V>>,
        }

        impl<$lt, K, V> $name<$lt, K, V> {
            pub(crate) fn new(it: slice::$slice_iter<$lt, Entry<K, V>>) -> Self {
                Self { it }
            }
        }

        impl<$lt, K, V> Iterator for $name<$lt, K, V> {
            type Item = $item;
            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.it.next().map(|$e| $project)
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.it.size_hint()
            }
        }

        impl<$lt, K, V> DoubleEndedIterator for $name<$lt, K, V> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.it.next_back().map(|$e| $project)
            }
        }

        impl<K, V> ExactSizeIterator for $name<'_, K, V> {}
        impl<K, V> FusedIterator for $name<'_, K, V> {}
    };
}

ordered_iter!(
    /// Entries in position order.
    Iter<'a>, Iter, (&'a K, &'a V), |e| (&e.key, &e.value)
);
ordered_iter!(
    /// Entries in position order, values mutable.
    IterMut<'a>, IterMut, (&'a K, &'a mut V), |e| (&e.key, &mut e.value)
);
ordered_iter!(
    /// Keys in position order.
    Keys<'a>, Iter, &'a K, |e| &e.key
);
ordered_iter!(
    /// Values in position order.
    Values<'a>, Iter, &'a V, |e| &e.value
);
ordered_iter!(
    /// Mutable values in position order.
    ValuesMut<'a>, IterMut, &'a mut V, |e| &mut e.value
);

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
        }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
        }
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
        }
    }
}
