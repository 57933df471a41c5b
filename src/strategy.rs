//! Allocation strategies: providers of raw memory blocks.
//!
//! A strategy only hands out and takes back memory. It knows nothing
//! about the objects that get constructed in that memory; that is the
//! job of [`SingleAllocator`](crate::SingleAllocator).
use crate::error::{Error, Result};
use log::{trace, warn};
use std::alloc::{self, Layout};
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;

/// A source of raw memory blocks.
///
/// `alloc` returns a block satisfying `layout` without initializing
/// its contents, or `Error::OutOfMemory` if the request cannot be
/// met.
///
/// `dealloc` returns a block previously handed out by `alloc`. A block
/// the strategy does not currently own (never allocated here, or
/// already returned) must be ignored. Implementations must never fault
/// on such a call.
pub trait AllocStrategy {
    fn alloc(&self, layout: Layout) -> Result<NonNull<u8>>;

    fn dealloc(&self, block: NonNull<u8>);
}

/// The shared handle through which allocators and deques refer to a
/// strategy. The strategy is destroyed when the last handle goes away.
pub type SharedStrategy = Rc<dyn AllocStrategy>;

// Zero-sized requests never touch the system allocator. The returned
// block is aligned but untracked, so returning it is a no-op.
fn dangling(layout: Layout) -> NonNull<u8> {
    // `Layout` guarantees a non-zero power-of-two alignment.
    NonNull::new(layout.align() as *mut u8).unwrap_or(NonNull::dangling())
}

/// A strategy that delegates to the system allocator and remembers
/// every block it has handed out.
///
/// Returning a block is a linear scan over the tracking list. Any
/// blocks still outstanding when the strategy is dropped are freed at
/// that point.
///
/// # Examples
///
/// ```
/// use std::alloc::Layout;
/// use strategy_deque::{AllocStrategy, StupidStrategy};
///
/// let s = StupidStrategy::new();
/// let block = s.alloc(Layout::new::<u64>()).unwrap();
/// assert_eq!(1, s.outstanding());
///
/// s.dealloc(block);
/// assert_eq!(0, s.outstanding());
///
/// // Returning the same block again is ignored.
/// s.dealloc(block);
/// assert_eq!(0, s.outstanding());
/// ```
#[derive(Default)]
pub struct StupidStrategy {
    // Blocks handed out and not yet returned, oldest first.
    blocks: RefCell<Vec<(NonNull<u8>, Layout)>>,
}

impl StupidStrategy {
    pub fn new() -> StupidStrategy {
        StupidStrategy {
            blocks: RefCell::new(Vec::new()),
        }
    }

    /// The number of blocks handed out and not yet returned.
    pub fn outstanding(&self) -> usize {
        self.blocks.borrow().len()
    }

    /// The total size of all outstanding blocks.
    pub fn outstanding_bytes(&self) -> usize {
        self.blocks.borrow().iter().map(|(_, l)| l.size()).sum()
    }

    /// True if `block` is currently outstanding from this strategy.
    pub fn owns(&self, block: NonNull<u8>) -> bool {
        self.blocks.borrow().iter().any(|(b, _)| *b == block)
    }
}

impl AllocStrategy for StupidStrategy {
    fn alloc(&self, layout: Layout) -> Result<NonNull<u8>> {
        if 0 == layout.size() {
            return Ok(dangling(layout));
        }

        // Safety: the layout has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        let block = NonNull::new(raw).ok_or_else(|| Error::out_of_memory(layout))?;

        trace!("alloc {:p} ({} bytes)", block, layout.size());
        self.blocks.borrow_mut().push((block, layout));
        Ok(block)
    }

    fn dealloc(&self, block: NonNull<u8>) {
        let mut blocks = self.blocks.borrow_mut();

        match blocks.iter().position(|(b, _)| *b == block) {
            Some(ix) => {
                let (block, layout) = blocks.remove(ix);
                trace!("dealloc {:p} ({} bytes)", block, layout.size());
                // Safety: the block came from `alloc::alloc` with this
                // layout and has just left the tracking list.
                unsafe { alloc::dealloc(block.as_ptr(), layout) };
            }
            None => warn!("dealloc of untracked block {:p} ignored", block),
        }
    }
}

impl Drop for StupidStrategy {
    fn drop(&mut self) {
        let blocks = self.blocks.get_mut();

        if !blocks.is_empty() {
            warn!(
                "strategy dropped with {} outstanding blocks; freeing them",
                blocks.len()
            );
        }

        for (block, layout) in blocks.drain(..) {
            // Safety: every tracked block is live and was allocated
            // with its recorded layout.
            unsafe { alloc::dealloc(block.as_ptr(), layout) };
        }
    }
}

/// A tracking strategy that refuses to hand out more than `limit`
/// blocks at a time, reporting `Error::OutOfMemory` instead.
///
/// # Examples
///
/// ```
/// use std::alloc::Layout;
/// use strategy_deque::{AllocStrategy, BoundedStrategy, Error};
///
/// let s = BoundedStrategy::new(1);
/// let layout = Layout::new::<u32>();
///
/// let block = s.alloc(layout).unwrap();
/// assert_eq!(Err(Error::out_of_memory(layout)), s.alloc(layout));
///
/// s.dealloc(block);
/// assert!(s.alloc(layout).is_ok());
/// ```
pub struct BoundedStrategy {
    inner: StupidStrategy,
    limit: Cell<usize>,
}

impl BoundedStrategy {
    pub fn new(limit: usize) -> BoundedStrategy {
        BoundedStrategy {
            inner: StupidStrategy::new(),
            limit: Cell::new(limit),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    /// Change the limit. Blocks already handed out are unaffected,
    /// even if there are now more of them than the new limit.
    pub fn set_limit(&self, limit: usize) {
        self.limit.set(limit)
    }

    /// The number of blocks handed out and not yet returned.
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding()
    }
}

impl AllocStrategy for BoundedStrategy {
    fn alloc(&self, layout: Layout) -> Result<NonNull<u8>> {
        if self.inner.outstanding() >= self.limit.get() {
            trace!(
                "refusing {} bytes: limit {} reached",
                layout.size(),
                self.limit.get()
            );
            return Err(Error::out_of_memory(layout));
        }
        self.inner.alloc(layout)
    }

    fn dealloc(&self, block: NonNull<u8>) {
        self.inner.dealloc(block)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_env_log::test;

    #[test]
    fn stupid_strategy_tracks_blocks() {
        let s = StupidStrategy::new();
        let a = s.alloc(Layout::new::<u64>()).unwrap();
        let b = s.alloc(Layout::new::<[u8; 24]>()).unwrap();

        assert_eq!(2, s.outstanding());
        assert_eq!(32, s.outstanding_bytes());
        assert!(s.owns(a));
        assert!(s.owns(b));

        s.dealloc(a);
        assert_eq!(1, s.outstanding());
        assert!(!s.owns(a));
        assert!(s.owns(b));

        s.dealloc(b);
        assert_eq!(0, s.outstanding());
        assert_eq!(0, s.outstanding_bytes());
    }

    #[test]
    fn stupid_strategy_ignores_double_dealloc() {
        let s = StupidStrategy::new();
        let a = s.alloc(Layout::new::<u32>()).unwrap();
        let b = s.alloc(Layout::new::<u32>()).unwrap();

        s.dealloc(a);
        s.dealloc(a);

        assert_eq!(1, s.outstanding());
        assert!(s.owns(b));
    }

    #[test]
    fn stupid_strategy_ignores_foreign_blocks() {
        let s = StupidStrategy::new();
        let other = StupidStrategy::new();
        let foreign = other.alloc(Layout::new::<u16>()).unwrap();

        s.dealloc(foreign);

        assert_eq!(0, s.outstanding());
        assert!(other.owns(foreign));
    }

    #[test]
    fn stupid_strategy_zero_sized_blocks_are_untracked() {
        let s = StupidStrategy::new();
        let layout = Layout::from_size_align(0, 8).unwrap();
        let block = s.alloc(layout).unwrap();

        assert_eq!(0, block.as_ptr() as usize % 8);
        assert_eq!(0, s.outstanding());

        s.dealloc(block);
        assert_eq!(0, s.outstanding());
    }

    #[test]
    fn stupid_strategy_honours_alignment() {
        let s = StupidStrategy::new();
        let layout = Layout::from_size_align(8, 64).unwrap();
        let block = s.alloc(layout).unwrap();

        assert_eq!(0, block.as_ptr() as usize % 64);
        s.dealloc(block);
    }

    #[test]
    fn stupid_strategy_frees_survivors_on_drop() {
        let s = StupidStrategy::new();
        for _ in 0..8 {
            s.alloc(Layout::new::<u64>()).unwrap();
        }
        assert_eq!(8, s.outstanding());

        // Leaked blocks are reclaimed here.
        drop(s);
    }

    #[test]
    fn bounded_strategy_refuses_past_limit() {
        let s = BoundedStrategy::new(2);
        let layout = Layout::new::<u64>();

        let a = s.alloc(layout).unwrap();
        let _b = s.alloc(layout).unwrap();
        assert_eq!(Err(Error::out_of_memory(layout)), s.alloc(layout));
        assert_eq!(2, s.outstanding());

        s.dealloc(a);
        assert!(s.alloc(layout).is_ok());
    }

    #[test]
    fn bounded_strategy_limit_can_change() {
        let s = BoundedStrategy::new(0);
        let layout = Layout::new::<u8>();

        assert!(s.alloc(layout).is_err());

        s.set_limit(1);
        assert_eq!(1, s.limit());
        assert!(s.alloc(layout).is_ok());
        assert!(s.alloc(layout).is_err());
    }

    #[test]
    fn strategies_share_through_handle() {
        let s = Rc::new(StupidStrategy::new());
        let handle: SharedStrategy = s.clone();

        let block = handle.alloc(Layout::new::<u32>()).unwrap();
        assert_eq!(1, s.outstanding());

        handle.dealloc(block);
        assert_eq!(0, s.outstanding());
        assert_eq!(2, Rc::strong_count(&s));
    }
}
