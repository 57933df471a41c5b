use crate::allocator::SingleAllocator;
use crate::cursor::{Cursor, CursorMut};
use crate::error::{Error, Result};
use crate::iterators::{DrainBack, DrainFront, IterBack, IterFront, IterFrontMut};
use crate::slot::{Node, Slot};
use crate::strategy::SharedStrategy;
use log::{debug, trace};
use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr;

/// A deque built on a doubly linked list whose nodes are allocated
/// through a shared allocation strategy.
pub struct Deque<T> {
    // Index of the first element on the free list. MAX when the
    // free-list is empty.
    free_list: usize,
    // The index of the front of the deque. MAX when the deque is empty.
    pub(crate) front: usize,
    // The index of the back of the deque. MAX when the deque is empty.
    pub(crate) back: usize,
    // The number of slots currently used by entries.
    len_used: usize,
    // The number of slots currently on the free list.
    len_free: usize,
    // Maps slot indices to the nodes they hold.
    pub(crate) slots: Vec<Slot<T>>,
    // Creates and destroys every node in `slots`.
    alloc: SingleAllocator<Node<T>>,
    marker: PhantomData<Box<Node<T>>>,
}

impl<T> fmt::Debug for Deque<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_list().entries(self.iter_front()).finish()
    }
}

impl<T> fmt::Display for Deque<T>
where
    T: fmt::Display,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with(", "), fmt)
    }
}

/// Renders a deque front to back with a custom delimiter. It is
/// constructed from the [`display_with`] method on `Deque`.
///
/// [`display_with`]: struct.Deque.html#method.display_with
pub struct DisplayWith<'l, T> {
    target: &'l Deque<T>,
    delimiter: &'l str,
}

impl<'l, T> fmt::Display for DisplayWith<'l, T>
where
    T: fmt::Display,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.target.iter_front().enumerate() {
            if 0 != i {
                fmt.write_str(self.delimiter)?;
            }
            fmt::Display::fmt(value, fmt)?;
        }
        Ok(())
    }
}

impl<T> Deque<T> {
    /// Creates an empty `Deque` whose nodes will come from
    /// `strategy`. No allocations are performed until values are
    /// added.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let deque: Deque<u32> = Deque::new(Rc::new(StupidStrategy::new()));
    /// ```
    pub fn new(strategy: SharedStrategy) -> Deque<T> {
        Deque {
            free_list: usize::MAX,
            front: usize::MAX,
            back: usize::MAX,
            len_used: 0,
            len_free: 0,
            slots: Vec::new(),
            alloc: SingleAllocator::new(strategy),
            marker: PhantomData,
        }
    }

    /// Create a new `Deque` instance with a slot table free list at
    /// least `capacity` entries deep. Nodes themselves are still only
    /// allocated as values are added.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let strategy = Rc::new(StupidStrategy::new());
    /// let deque: Deque<u32> = Deque::with_capacity(strategy.clone(), 16);
    ///
    /// assert_eq!(16, deque.len_freelist());
    /// assert_eq!(0, strategy.outstanding());
    /// ```
    pub fn with_capacity(strategy: SharedStrategy, capacity: usize) -> Deque<T> {
        let mut vec = Vec::with_capacity(capacity);

        let mut next = usize::MAX;
        for i in 0..capacity {
            vec.push(Slot::Free(next));
            next = i;
        }

        Deque {
            free_list: next,
            front: usize::MAX,
            back: usize::MAX,
            len_used: 0,
            len_free: capacity,
            slots: vec,
            alloc: SingleAllocator::new(strategy),
            marker: PhantomData,
        }
    }

    /// Build a deque holding the items of `iter`, front to back, with
    /// nodes allocated from `strategy`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let d = Deque::from_iter_in(1..=3, Rc::new(StupidStrategy::new())).unwrap();
    /// assert_eq!("1, 2, 3", d.to_string());
    /// ```
    pub fn from_iter_in<I>(iter: I, strategy: SharedStrategy) -> Result<Deque<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut d = Deque::new(strategy);
        d.try_extend(iter)?;
        Ok(d)
    }

    /// The strategy currently supplying this deque's nodes.
    pub fn strategy(&self) -> &SharedStrategy {
        self.alloc.strategy()
    }

    /// Reserves capacity for at least `additional` more entries in the
    /// slot table. This does not allocate any nodes, nor does it add
    /// the reserved entries to the free list.
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional)
    }

    /// Returns how many entries the slot table could hold without
    /// resizing. Note: this is not necesarily `len() + len_freelist()`.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// The number of items in the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let mut d: Deque<u8> = Deque::new(Rc::new(StupidStrategy::new()));
    ///
    /// d.push_front(1).unwrap();
    /// d.push_back(2).unwrap();
    /// assert_eq!(2, d.len());
    ///
    /// d.pop_front().unwrap();
    /// assert_eq!(1, d.len());
    /// ```
    pub fn len(&self) -> usize {
        self.len_used
    }

    /// True when the deque is empty.
    pub fn is_empty(&self) -> bool {
        usize::MAX == self.front
    }

    /// The number of entries on the slot table's free list.
    pub fn len_freelist(&self) -> usize {
        self.len_free
    }

    /// Insert `data` into the front of the deque. If the strategy
    /// cannot supply a node, the deque is left unchanged and `data` is
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let mut l = Deque::new(Rc::new(StupidStrategy::new()));
    /// l.push_front(10).unwrap();
    /// l.push_front(20).unwrap();
    ///
    /// assert_eq!(Some(&20), l.get_front());
    /// ```
    pub fn push_front(&mut self, data: T) -> Result<()> {
        let new_ix = self.allocate(usize::MAX, self.front, data)?;

        // Update the old front of the deque so that it points to the
        // new front we just inserted.
        if usize::MAX != self.front {
            self.node_mut(self.front).front = new_ix;
        }
        // Repoint the front of the deque at the new front we just
        // inserted.
        self.front = new_ix;

        // If the back was not yet set, set it to the front.
        if usize::MAX == self.back {
            self.back = new_ix;
        }

        Ok(())
    }

    /// Insert `data` into the back of the deque. If the strategy
    /// cannot supply a node, the deque is left unchanged and `data` is
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let mut l = Deque::new(Rc::new(StupidStrategy::new()));
    /// l.push_back(10).unwrap();
    /// l.push_back(20).unwrap();
    ///
    /// assert_eq!(Some(&20), l.get_back());
    /// ```
    pub fn push_back(&mut self, data: T) -> Result<()> {
        let new_ix = self.allocate(self.back, usize::MAX, data)?;

        // Update the old back of the deque so that it points to the
        // new back we just inserted.
        if usize::MAX != self.back {
            self.node_mut(self.back).back = new_ix;
        }
        // Repoint the back of the deque at the new back we just
        // inserted.
        self.back = new_ix;

        // If the front was not yet set, set it to the back.
        if usize::MAX == self.front {
            self.front = new_ix;
        }

        Ok(())
    }

    /// Remove the front of the deque and return it. If the deque is
    /// empty, `Error::Empty` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, Error, StupidStrategy};
    ///
    /// let mut l = Deque::new(Rc::new(StupidStrategy::new()));
    /// l.push_back(10).unwrap();
    /// l.push_back(20).unwrap();
    ///
    /// assert_eq!(Ok(10), l.pop_front());
    /// assert_eq!(Ok(20), l.pop_front());
    /// assert_eq!(Err(Error::Empty), l.pop_front());
    /// ```
    pub fn pop_front(&mut self) -> Result<T> {
        if usize::MAX != self.front {
            Ok(self.remove_unchecked(self.front))
        } else {
            Err(Error::Empty)
        }
    }

    /// Remove the back of the deque and return it. If the deque is
    /// empty, `Error::Empty` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, Error, StupidStrategy};
    ///
    /// let mut l = Deque::new(Rc::new(StupidStrategy::new()));
    /// l.push_front(10).unwrap();
    /// l.push_front(20).unwrap();
    ///
    /// assert_eq!(Ok(10), l.pop_back());
    /// assert_eq!(Ok(20), l.pop_back());
    /// assert_eq!(Err(Error::Empty), l.pop_back());
    /// ```
    pub fn pop_back(&mut self) -> Result<T> {
        if usize::MAX != self.back {
            Ok(self.remove_unchecked(self.back))
        } else {
            Err(Error::Empty)
        }
    }

    /// Get the front value of the deque. If the deque is empty, `None`
    /// is returned.
    pub fn get_front(&self) -> Option<&T> {
        if usize::MAX != self.front {
            Some(&self.node(self.front).data)
        } else {
            None
        }
    }

    /// Get the front value of the deque as a mutable reference. If the
    /// deque is empty, `None` is returned.
    pub fn get_front_mut(&mut self) -> Option<&mut T> {
        if usize::MAX != self.front {
            Some(&mut self.node_mut(self.front).data)
        } else {
            None
        }
    }

    /// Get the back of the deque. If the deque is empty, `None` is
    /// returned.
    pub fn get_back(&self) -> Option<&T> {
        if usize::MAX != self.back {
            Some(&self.node(self.back).data)
        } else {
            None
        }
    }

    /// Get the back of the deque as a mutable reference. If the deque
    /// is empty, `None` is returned.
    pub fn get_back_mut(&mut self) -> Option<&mut T> {
        if usize::MAX != self.back {
            Some(&mut self.node_mut(self.back).data)
        } else {
            None
        }
    }

    /// Destroy every node and return to the empty state. The strategy
    /// is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let strategy = Rc::new(StupidStrategy::new());
    /// let mut d = Deque::from_iter_in(0..4, strategy.clone()).unwrap();
    /// assert_eq!(4, strategy.outstanding());
    ///
    /// d.clear();
    /// assert!(d.is_empty());
    /// assert_eq!(0, strategy.outstanding());
    /// ```
    pub fn clear(&mut self) {
        // Detach the table first so a panicking destructor leaves the
        // deque empty rather than half-freed.
        let mut slots = mem::take(&mut self.slots);
        let mut ix = self.front;
        self.reset();

        while usize::MAX != ix {
            let node = slots[ix]
                .node()
                .expect("slots[ix] is expected to be used");
            // Safety: every linked slot points at a live node, visited
            // exactly once, that nothing else can reach any more.
            unsafe {
                ix = node.as_ref().back;
                self.alloc.dealloc(node);
            }
        }

        slots.clear();
        self.slots = slots;
    }

    /// Push every item of `iter` onto the back of the deque. Stops at
    /// the first allocation failure, keeping the items pushed before it.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        // The hint is advisory. Pushing grows the table if this fails.
        let _ = self
            .slots
            .try_reserve(iter.size_hint().0.saturating_sub(self.len_free));
        for value in iter {
            self.push_back(value)?;
        }
        Ok(())
    }

    /// Move every item out into a new deque, leaving this one empty.
    /// Both deques use this deque's strategy afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let mut a = Deque::from_iter_in(1..=3, Rc::new(StupidStrategy::new())).unwrap();
    /// let b = a.take();
    ///
    /// assert!(a.is_empty());
    /// assert_eq!("1, 2, 3", b.to_string());
    /// ```
    pub fn take(&mut self) -> Deque<T> {
        let empty = Deque::new(self.strategy().clone());
        mem::replace(self, empty)
    }

    /// Migrate every node to memory from `strategy`, preserving values
    /// and order. The old nodes go back to the old strategy.
    ///
    /// All new memory is obtained before any value moves. If the new
    /// strategy runs out part way, the blocks already obtained are
    /// returned and the deque is left exactly as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let s1 = Rc::new(StupidStrategy::new());
    /// let s2 = Rc::new(StupidStrategy::new());
    ///
    /// let mut d = Deque::from_iter_in(1..=3, s1.clone()).unwrap();
    /// d.change_allocator(s2.clone()).unwrap();
    ///
    /// assert_eq!("1, 2, 3", d.to_string());
    /// assert_eq!(0, s1.outstanding());
    /// assert_eq!(3, s2.outstanding());
    /// ```
    pub fn change_allocator(&mut self, strategy: SharedStrategy) -> Result<()> {
        let alloc = SingleAllocator::new(strategy);

        let mut blocks = Vec::with_capacity(self.len_used);
        while blocks.len() < self.len_used {
            match alloc.alloc_uninit() {
                Ok(block) => blocks.push(block),
                Err(e) => {
                    debug!(
                        "reallocation failed after {} of {} nodes: {}",
                        blocks.len(),
                        self.len_used,
                        e
                    );
                    for block in blocks {
                        // Safety: the block is fresh and holds no value.
                        unsafe { alloc.release(block) };
                    }
                    return Err(e);
                }
            }
        }

        trace!("moving {} nodes to a new strategy", blocks.len());

        // The new table is compact: list position equals slot index.
        let mut slots = Vec::with_capacity(blocks.len());
        let mut ix = self.front;
        for (new_ix, block) in blocks.into_iter().enumerate() {
            let old = self.slots[ix]
                .node()
                .expect("slots[ix] is expected to be used");
            // Safety: the old node is live and its value is read out
            // exactly once. Its memory is released below without
            // dropping.
            let Node { back, data, .. } = unsafe { ptr::read(old.as_ptr()) };

            let new_front = if 0 == new_ix { usize::MAX } else { new_ix - 1 };
            let new_back = if usize::MAX == back {
                usize::MAX
            } else {
                new_ix + 1
            };
            // Safety: each pre-allocated block is filled exactly once.
            let node = unsafe { alloc.write(block, Node::new(new_front, new_back, data)) };
            slots.push(Slot::Used(node));

            ix = back;
        }

        for slot in self.slots.drain(..) {
            if let Some(old) = slot.node() {
                // Safety: the value was moved out above; only the
                // memory remains, and it came from the old strategy.
                unsafe { self.alloc.release(old.cast()) };
            }
        }

        let len = slots.len();
        self.alloc = alloc;
        self.slots = slots;
        self.free_list = usize::MAX;
        self.len_free = 0;
        if 0 == len {
            self.front = usize::MAX;
            self.back = usize::MAX;
        } else {
            self.front = 0;
            self.back = len - 1;
        }

        Ok(())
    }

    /// Create an iterator over the deque starting from the front.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let mut d: Deque<u8> = Deque::new(Rc::new(StupidStrategy::new()));
    ///
    /// d.push_back(1).unwrap();
    /// d.push_back(2).unwrap();
    /// d.push_back(3).unwrap();
    ///
    /// let v: Vec<&u8> = d.iter_front().collect();
    /// assert_eq!(vec![&1, &2, &3], v);
    /// ```
    pub fn iter_front(&self) -> IterFront<'_, T> {
        IterFront::new(self, self.front)
    }

    /// Create an iterator over mutable references to the items,
    /// starting from the front.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let mut d = Deque::from_iter_in(1..=3, Rc::new(StupidStrategy::new())).unwrap();
    /// for v in d.iter_front_mut() {
    ///     *v *= 10;
    /// }
    ///
    /// assert_eq!("10, 20, 30", d.to_string());
    /// ```
    pub fn iter_front_mut(&mut self) -> IterFrontMut<'_, T> {
        let front = self.front;
        IterFrontMut::new(self, front)
    }

    /// Create an iterator over the deque starting from the back.
    pub fn iter_back(&self) -> IterBack<'_, T> {
        IterBack::new(self, self.back)
    }

    /// A draining iterator starting from the front position. Each item
    /// yielded has been popped; items not reached stay in the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let mut d = Deque::from_iter_in(1..=3, Rc::new(StupidStrategy::new())).unwrap();
    ///
    /// let v: Vec<u8> = d.drain_front().collect();
    /// assert_eq!(vec![1, 2, 3], v);
    /// assert!(d.is_empty());
    /// ```
    pub fn drain_front(&mut self) -> DrainFront<'_, T> {
        DrainFront::new(self)
    }

    /// A draining iterator starting from the back position.
    pub fn drain_back(&mut self) -> DrainBack<'_, T> {
        DrainBack::new(self)
    }

    /// A cursor at the front of the deque. On an empty deque the
    /// cursor starts at the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, Error, StupidStrategy};
    ///
    /// let d = Deque::from_iter_in(vec![7], Rc::new(StupidStrategy::new())).unwrap();
    /// let mut c = d.cursor_front();
    ///
    /// assert_eq!(Ok(&7), c.current());
    /// assert_eq!(Ok(()), c.move_next());
    /// assert!(c.is_end());
    /// assert_eq!(Err(Error::InvalidCursor), c.current());
    /// assert_eq!(Err(Error::InvalidCursor), c.move_next());
    /// ```
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.front)
    }

    /// A cursor with mutable access, at the front of the deque.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        let front = self.front;
        CursorMut::new(self, front)
    }

    /// Render the items front to back, separated by `delimiter`.
    /// `Display` uses `", "`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let d = Deque::from_iter_in(1..=3, Rc::new(StupidStrategy::new())).unwrap();
    ///
    /// assert_eq!("1 | 2 | 3", d.display_with(" | ").to_string());
    /// ```
    pub fn display_with<'l>(&'l self, delimiter: &'l str) -> DisplayWith<'l, T> {
        DisplayWith {
            target: self,
            delimiter,
        }
    }

    pub(crate) fn node(&self, ix: usize) -> &Node<T> {
        let node = self.slots[ix]
            .node()
            .expect("slots[ix] is expected to be used");
        // Safety: a used slot always points at a live node owned by
        // this deque.
        unsafe { &*node.as_ptr() }
    }

    pub(crate) fn node_mut(&mut self, ix: usize) -> &mut Node<T> {
        let node = self.slots[ix]
            .node()
            .expect("slots[ix] is expected to be used");
        // Safety: as in `node`, and `&mut self` makes the access
        // exclusive.
        unsafe { &mut *node.as_ptr() }
    }

    fn reset(&mut self) {
        self.free_list = usize::MAX;
        self.front = usize::MAX;
        self.back = usize::MAX;
        self.len_used = 0;
        self.len_free = 0;
    }

    fn remove_unchecked(&mut self, ix: usize) -> T {
        let Node { front, back, data } = self.free(ix);

        if self.front == ix {
            debug_assert_eq!(usize::MAX, front);
            self.front = back;
        } else {
            debug_assert_ne!(usize::MAX, front);
            self.node_mut(front).back = back;
        }

        if self.back == ix {
            debug_assert_eq!(usize::MAX, back);
            self.back = front;
        } else {
            debug_assert_ne!(usize::MAX, back);
            self.node_mut(back).front = front;
        }

        data
    }

    fn allocate(&mut self, front: usize, back: usize, data: T) -> Result<usize> {
        // Nothing changes until the node exists.
        let node = self.alloc.alloc(Node::new(front, back, data))?;

        self.len_used += 1;

        let ix = if usize::MAX == self.free_list {
            self.slots.push(Slot::Used(node));
            self.slots.len() - 1
        } else {
            let ix = self.free_list;
            self.free_list = self.slots[ix]
                .next_free()
                .expect("free_list is expected to point at a free slot");
            self.slots[ix] = Slot::Used(node);
            self.len_free -= 1;
            ix
        };

        Ok(ix)
    }

    // Put slot `ix` on the free list and take back its node's
    // contents, returning the node memory to the strategy.
    fn free(&mut self, ix: usize) -> Node<T> {
        let slot = mem::replace(&mut self.slots[ix], Slot::Free(self.free_list));
        let node = slot.node().expect("slots[ix] is expected to be used");

        self.free_list = ix;
        self.len_used -= 1;
        self.len_free += 1;

        // Safety: the node was live and is no longer reachable from
        // the table.
        unsafe { self.alloc.take(node) }
    }
}

impl<T: Clone> Deque<T> {
    /// Copy the deque into new nodes from the same strategy.
    pub fn try_clone(&self) -> Result<Deque<T>> {
        self.try_clone_in(self.strategy().clone())
    }

    /// Copy the deque into new nodes from `strategy`. The copy is
    /// independent of `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let s1 = Rc::new(StupidStrategy::new());
    /// let s2 = Rc::new(StupidStrategy::new());
    ///
    /// let a = Deque::from_iter_in(1..=3, s1.clone()).unwrap();
    /// let mut b = a.try_clone_in(s2.clone()).unwrap();
    /// b.pop_front().unwrap();
    ///
    /// assert_eq!("1, 2, 3", a.to_string());
    /// assert_eq!("2, 3", b.to_string());
    /// assert_eq!(3, s1.outstanding());
    /// assert_eq!(2, s2.outstanding());
    /// ```
    pub fn try_clone_in(&self, strategy: SharedStrategy) -> Result<Deque<T>> {
        // A partial copy is dropped, and freed, on failure.
        Deque::from_iter_in(self.iter_front().cloned(), strategy)
    }

    /// Replace the contents with a copy of `source`, adopting the
    /// strategy of `source`.
    pub fn assign_from(&mut self, source: &Deque<T>) -> Result<()> {
        self.copy_from(source, source.strategy().clone())
    }

    /// Replace the contents with a copy of `source`, using `strategy`
    /// from now on.
    ///
    /// The current nodes are destroyed through the current strategy
    /// before the switch. If `strategy` runs out during the copy, the
    /// deque is left empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use strategy_deque::{Deque, StupidStrategy};
    ///
    /// let old = Rc::new(StupidStrategy::new());
    /// let new = Rc::new(StupidStrategy::new());
    ///
    /// let source = Deque::from_iter_in(vec!['a', 'b'], Rc::new(StupidStrategy::new())).unwrap();
    /// let mut d = Deque::from_iter_in(vec!['x', 'y', 'z'], old.clone()).unwrap();
    ///
    /// d.copy_from(&source, new.clone()).unwrap();
    ///
    /// assert_eq!("a, b", d.to_string());
    /// assert_eq!(0, old.outstanding());
    /// assert_eq!(2, new.outstanding());
    /// ```
    pub fn copy_from(&mut self, source: &Deque<T>, strategy: SharedStrategy) -> Result<()> {
        self.clear();
        self.alloc = SingleAllocator::new(strategy);

        if let Err(e) = self.try_extend(source.iter_front().cloned()) {
            debug!(
                "copy failed after {} of {} items: {}",
                self.len(),
                source.len(),
                e
            );
            self.clear();
            return Err(e);
        }

        Ok(())
    }
}

// `Clone` cannot report failure, so running out of memory is treated
// the way std collections treat it.
fn handle_clone_error(e: Error) -> ! {
    if let Error::OutOfMemory { size, align } = e {
        if let Ok(layout) = Layout::from_size_align(size, align) {
            alloc::handle_alloc_error(layout);
        }
    }
    panic!("deque clone failed: {}", e)
}

impl<T: Clone> Clone for Deque<T> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(d) => d,
            Err(e) => handle_clone_error(e),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(e) = self.assign_from(source) {
            handle_clone_error(e)
        }
    }
}

impl<T: PartialEq> PartialEq for Deque<T> {
    fn eq(&self, other: &Deque<T>) -> bool {
        self.len() == other.len() && self.iter_front().eq(other.iter_front())
    }
}

impl<T: Eq> Eq for Deque<T> {}

impl<T> Drop for Deque<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'l, T> IntoIterator for &'l Deque<T> {
    type Item = &'l T;
    type IntoIter = IterFront<'l, T>;

    fn into_iter(self) -> IterFront<'l, T> {
        self.iter_front()
    }
}

impl<'l, T> IntoIterator for &'l mut Deque<T> {
    type Item = &'l mut T;
    type IntoIter = IterFrontMut<'l, T>;

    fn into_iter(self) -> IterFrontMut<'l, T> {
        self.iter_front_mut()
    }
}
