use crate::error::Result;
use crate::strategy::SharedStrategy;
use std::alloc::Layout;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};

/// Turns the raw blocks of a strategy into constructed values of a
/// single type `T`.
///
/// The allocator keeps no record of what it has handed out. Callers
/// must return every pointer exactly once, and must not touch it
/// afterwards.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use strategy_deque::{SingleAllocator, StupidStrategy};
///
/// let strategy = Rc::new(StupidStrategy::new());
/// let alloc: SingleAllocator<String> = SingleAllocator::new(strategy.clone());
///
/// let p = alloc.alloc(String::from("hello")).unwrap();
/// assert_eq!(1, strategy.outstanding());
///
/// let s = unsafe { alloc.take(p) };
/// assert_eq!("hello", s);
/// assert_eq!(0, strategy.outstanding());
/// ```
pub struct SingleAllocator<T> {
    strategy: SharedStrategy,
    marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SingleAllocator<T> {
    fn clone(&self) -> Self {
        SingleAllocator::new(self.strategy.clone())
    }
}

impl<T> SingleAllocator<T> {
    pub fn new(strategy: SharedStrategy) -> SingleAllocator<T> {
        SingleAllocator {
            strategy,
            marker: PhantomData,
        }
    }

    /// The strategy this allocator draws memory from.
    pub fn strategy(&self) -> &SharedStrategy {
        &self.strategy
    }

    /// Obtain uninitialized memory for one `T`.
    pub fn alloc_uninit(&self) -> Result<NonNull<MaybeUninit<T>>> {
        if 0 == mem::size_of::<T>() {
            return Ok(NonNull::dangling());
        }

        let block = self.strategy.alloc(Layout::new::<T>())?;
        Ok(block.cast())
    }

    /// Move `value` into `block`, making it a live `T`.
    ///
    /// # Safety
    ///
    /// `block` must come from `alloc_uninit` on this allocator and not
    /// yet hold a value.
    pub unsafe fn write(&self, mut block: NonNull<MaybeUninit<T>>, value: T) -> NonNull<T> {
        block.as_mut().write(value);
        block.cast()
    }

    /// Allocate memory for one `T` and move `value` into it. If the
    /// strategy cannot supply the memory, `value` is dropped and the
    /// error returned.
    pub fn alloc(&self, value: T) -> Result<NonNull<T>> {
        let block = self.alloc_uninit()?;
        // Safety: the block is fresh from `alloc_uninit`.
        Ok(unsafe { self.write(block, value) })
    }

    /// Drop the value at `ptr` in place and return its memory.
    ///
    /// # Safety
    ///
    /// `ptr` must have come from this allocator's strategy, hold a live
    /// `T`, and not be used again.
    pub unsafe fn dealloc(&self, ptr: NonNull<T>) {
        ptr::drop_in_place(ptr.as_ptr());
        self.release(ptr.cast());
    }

    /// Move the value at `ptr` out and return its memory.
    ///
    /// # Safety
    ///
    /// Same as [`dealloc`](#method.dealloc).
    pub unsafe fn take(&self, ptr: NonNull<T>) -> T {
        let value = ptr::read(ptr.as_ptr());
        self.release(ptr.cast());
        value
    }

    /// Return memory without running any destructor.
    ///
    /// # Safety
    ///
    /// `block` must have come from this allocator's strategy, must not
    /// hold a value that still needs dropping, and must not be used
    /// again.
    pub unsafe fn release(&self, block: NonNull<MaybeUninit<T>>) {
        if 0 != mem::size_of::<T>() {
            self.strategy.dealloc(block.cast());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::strategy::{BoundedStrategy, StupidStrategy};
    use crate::Error;
    use std::cell::Cell;
    use std::rc::Rc;

    struct DropCounter<'a>(&'a Cell<usize>);

    impl Drop for DropCounter<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn dealloc_runs_destructor_and_returns_memory() {
        let strategy = Rc::new(StupidStrategy::new());
        let drops = Cell::new(0);
        let alloc = SingleAllocator::new(strategy.clone());

        let p = alloc.alloc(DropCounter(&drops)).unwrap();
        assert_eq!(1, strategy.outstanding());
        assert_eq!(0, drops.get());

        unsafe { alloc.dealloc(p) };
        assert_eq!(0, strategy.outstanding());
        assert_eq!(1, drops.get());
    }

    #[test]
    fn take_moves_value_out_without_dropping() {
        let strategy = Rc::new(StupidStrategy::new());
        let drops = Cell::new(0);
        let alloc = SingleAllocator::new(strategy.clone());

        let p = alloc.alloc(DropCounter(&drops)).unwrap();
        let v = unsafe { alloc.take(p) };
        assert_eq!(0, strategy.outstanding());
        assert_eq!(0, drops.get());

        drop(v);
        assert_eq!(1, drops.get());
    }

    #[test]
    fn failed_alloc_drops_value() {
        let strategy = Rc::new(BoundedStrategy::new(0));
        let drops = Cell::new(0);
        let alloc = SingleAllocator::new(strategy.clone());

        let r = alloc.alloc(DropCounter(&drops));
        assert!(matches!(r, Err(Error::OutOfMemory { .. })));
        assert_eq!(1, drops.get());
        assert_eq!(0, strategy.outstanding());
    }

    #[test]
    fn uninit_blocks_can_be_released_unused() {
        let strategy = Rc::new(StupidStrategy::new());
        let alloc: SingleAllocator<[u64; 4]> = SingleAllocator::new(strategy.clone());

        let block = alloc.alloc_uninit().unwrap();
        assert_eq!(32, strategy.outstanding_bytes());

        unsafe { alloc.release(block) };
        assert_eq!(0, strategy.outstanding());
    }

    #[test]
    fn write_fills_uninit_block() {
        let strategy = Rc::new(StupidStrategy::new());
        let alloc: SingleAllocator<[u64; 64]> = SingleAllocator::new(strategy.clone());

        let block = alloc.alloc_uninit().unwrap();
        let p = unsafe { alloc.write(block, [7u64; 64]) };
        assert_eq!(1, strategy.outstanding());
        assert!(strategy.owns(p.cast()));

        let v = unsafe { alloc.take(p) };
        assert_eq!([7u64; 64], v);
        assert_eq!(0, strategy.outstanding());
    }

    #[test]
    fn zero_sized_values_bypass_strategy() {
        let strategy = Rc::new(BoundedStrategy::new(0));
        let alloc = SingleAllocator::new(strategy.clone());

        let p = alloc.alloc(()).unwrap();
        assert_eq!(0, strategy.outstanding());
        unsafe { alloc.dealloc(p) };
    }

    #[test]
    fn clones_share_strategy() {
        let strategy = Rc::new(StupidStrategy::new());
        let a: SingleAllocator<u32> = SingleAllocator::new(strategy.clone());
        let b = a.clone();

        let p = a.alloc(7).unwrap();
        assert_eq!(7, unsafe { b.take(p) });
        assert_eq!(0, strategy.outstanding());
    }
}
