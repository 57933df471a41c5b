use std::ptr::NonNull;

/// One list cell. Its memory comes from the deque's strategy; the
/// slot table only stores a pointer to it.
pub(crate) struct Node<T> {
    // The index of the slot before this node.
    pub(crate) front: usize,
    // The index of the slot after this node.
    pub(crate) back: usize,
    // The contained data.
    pub(crate) data: T,
}

impl<T> Node<T> {
    pub(crate) fn new(front: usize, back: usize, data: T) -> Node<T> {
        Node { front, back, data }
    }
}

pub(crate) enum Slot<T> {
    // Holds the index of the next free slot.
    Free(usize),
    Used(NonNull<Node<T>>),
}

impl<T> Slot<T> {
    pub(crate) fn node(&self) -> Option<NonNull<Node<T>>> {
        if let Slot::Used(node) = self {
            Some(*node)
        } else {
            None
        }
    }

    pub(crate) fn next_free(&self) -> Option<usize> {
        if let Slot::Free(next) = self {
            Some(*next)
        } else {
            None
        }
    }
}
