use crate::deque::Deque;
use crate::error::{Error, Result};

/// A forward cursor over a `Deque`. It is constructed from the
/// [`cursor_front`] method on `Deque`.
///
/// The cursor is either focused on an item or at the end, one past the
/// back. Reading or advancing at the end is an `Error::InvalidCursor`.
///
/// [`cursor_front`]: struct.Deque.html#method.cursor_front
pub struct Cursor<'l, T> {
    target: &'l Deque<T>,
    focus: usize,
}

impl<'l, T> Cursor<'l, T> {
    pub(crate) fn new(target: &'l Deque<T>, focus: usize) -> Self {
        Self { target, focus }
    }

    /// True when the cursor is past the back of the deque.
    pub fn is_end(&self) -> bool {
        usize::MAX == self.focus
    }

    /// Return a reference to the value focused by the cursor.
    pub fn current(&self) -> Result<&'l T> {
        if self.is_end() {
            return Err(Error::InvalidCursor);
        }
        let target: &'l Deque<T> = self.target;
        Ok(&target.node(self.focus).data)
    }

    /// Move the cursor one item towards the back. Moving from the back
    /// item reaches the end.
    pub fn move_next(&mut self) -> Result<()> {
        if self.is_end() {
            return Err(Error::InvalidCursor);
        }
        self.focus = self.target.node(self.focus).back;
        Ok(())
    }
}

impl<'l, T> Clone for Cursor<'l, T> {
    fn clone(&self) -> Self {
        Cursor::new(self.target, self.focus)
    }
}

impl<'l, T> PartialEq for Cursor<'l, T> {
    fn eq(&self, other: &Cursor<'l, T>) -> bool {
        std::ptr::eq(self.target, other.target) && self.focus == other.focus
    }
}

/// A forward cursor over a `Deque` that provides mutable access to the
/// items in the deque. It is constructed from the
/// [`cursor_front_mut`] method on `Deque`.
///
/// While the cursor exists the deque cannot be pushed, popped,
/// cleared or reallocated.
///
/// [`cursor_front_mut`]: struct.Deque.html#method.cursor_front_mut
pub struct CursorMut<'l, T> {
    target: &'l mut Deque<T>,
    focus: usize,
}

impl<'l, T> CursorMut<'l, T> {
    pub(crate) fn new(target: &'l mut Deque<T>, focus: usize) -> Self {
        Self { target, focus }
    }

    /// True when the cursor is past the back of the deque.
    pub fn is_end(&self) -> bool {
        usize::MAX == self.focus
    }

    /// Return a reference to the value focused by the cursor.
    pub fn current(&self) -> Result<&T> {
        if self.is_end() {
            return Err(Error::InvalidCursor);
        }
        Ok(&self.target.node(self.focus).data)
    }

    /// Return a mutable reference to the value focused by the cursor.
    pub fn current_mut(&mut self) -> Result<&mut T> {
        if self.is_end() {
            return Err(Error::InvalidCursor);
        }
        Ok(&mut self.target.node_mut(self.focus).data)
    }

    /// Move the cursor one item towards the back. Moving from the back
    /// item reaches the end.
    pub fn move_next(&mut self) -> Result<()> {
        if self.is_end() {
            return Err(Error::InvalidCursor);
        }
        self.focus = self.target.node(self.focus).back;
        Ok(())
    }
}
