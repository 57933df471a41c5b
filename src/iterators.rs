use crate::deque::Deque;
use crate::slot::Slot;
use std::marker::PhantomData;

/// An iterator over the deque starting from the front. It is
/// constructed from the [`iter_front`] method on `Deque`.
///
/// [`iter_front`]: struct.Deque.html#method.iter_front
pub struct IterFront<'l, T> {
    target: &'l Deque<T>,
    next_index: usize,
}

impl<'l, T> IterFront<'l, T> {
    pub(crate) fn new(target: &'l Deque<T>, next_index: usize) -> Self {
        Self { target, next_index }
    }
}

impl<'l, T> Iterator for IterFront<'l, T> {
    type Item = &'l T;

    fn next(&mut self) -> Option<Self::Item> {
        if usize::MAX != self.next_index {
            let target: &'l Deque<T> = self.target;
            let node = target.node(self.next_index);
            self.next_index = node.back;
            Some(&node.data)
        } else {
            None
        }
    }
}

/// An iterator over the deque starting from the back. It is
/// constructed from the [`iter_back`] method on `Deque`.
///
/// [`iter_back`]: struct.Deque.html#method.iter_back
pub struct IterBack<'l, T> {
    target: &'l Deque<T>,
    next_index: usize,
}

impl<'l, T> IterBack<'l, T> {
    pub(crate) fn new(target: &'l Deque<T>, next_index: usize) -> Self {
        Self { target, next_index }
    }
}

impl<'l, T> Iterator for IterBack<'l, T> {
    type Item = &'l T;

    fn next(&mut self) -> Option<Self::Item> {
        if usize::MAX != self.next_index {
            let target: &'l Deque<T> = self.target;
            let node = target.node(self.next_index);
            self.next_index = node.front;
            Some(&node.data)
        } else {
            None
        }
    }
}

/// An iterator over mutable references starting from the front. It
/// is constructed from the [`iter_front_mut`] method on `Deque`.
///
/// [`iter_front_mut`]: struct.Deque.html#method.iter_front_mut
pub struct IterFrontMut<'l, T> {
    // The table is only read; the deque stays mutably borrowed through
    // `marker`.
    slots: &'l [Slot<T>],
    next_index: usize,
    marker: PhantomData<&'l mut T>,
}

impl<'l, T> IterFrontMut<'l, T> {
    pub(crate) fn new(target: &'l mut Deque<T>, next_index: usize) -> Self {
        Self {
            slots: &target.slots,
            next_index,
            marker: PhantomData,
        }
    }
}

impl<'l, T> Iterator for IterFrontMut<'l, T> {
    type Item = &'l mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if usize::MAX != self.next_index {
            let node = self.slots[self.next_index]
                .node()
                .expect("self.slots[self.next_index] is expected to be used");
            // Safety: the list is acyclic, so each node is yielded at
            // most once, and the deque is exclusively borrowed for 'l.
            let node = unsafe { &mut *node.as_ptr() };
            self.next_index = node.back;
            Some(&mut node.data)
        } else {
            None
        }
    }
}

/// A draining iterator over the deque starting from the front. It is
/// constructed from the [`drain_front`] method on `Deque`.
///
/// [`drain_front`]: struct.Deque.html#method.drain_front
pub struct DrainFront<'l, T> {
    target: &'l mut Deque<T>,
}

impl<'l, T> DrainFront<'l, T> {
    pub(crate) fn new(target: &'l mut Deque<T>) -> Self {
        Self { target }
    }
}

impl<'l, T> Iterator for DrainFront<'l, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.target.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.target.len(), Some(self.target.len()))
    }
}

/// A draining iterator over the deque starting from the back. It is
/// constructed from the [`drain_back`] method on `Deque`.
///
/// [`drain_back`]: struct.Deque.html#method.drain_back
pub struct DrainBack<'l, T> {
    target: &'l mut Deque<T>,
}

impl<'l, T> DrainBack<'l, T> {
    pub(crate) fn new(target: &'l mut Deque<T>) -> Self {
        Self { target }
    }
}

impl<'l, T> Iterator for DrainBack<'l, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.target.pop_back().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.target.len(), Some(self.target.len()))
    }
}
