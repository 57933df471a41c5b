//! A double-ended queue (deque) on a doubly linked list whose node
//! memory comes from a pluggable allocation strategy.
//!
//! Internally, the deque keeps a `Vec` slot table and tracks next,
//! previous, front, and back elements by index. Each used slot points
//! at a node allocated through a [`SingleAllocator`] bound to the
//! deque's [`SharedStrategy`]. Freed slots go on an internal free list
//! and are reused before the table grows.
//!
//! Strategies are shared, reference-counted handles. A deque can move
//! all of its nodes to a different strategy with
//! [`Deque::change_allocator`], or copy another deque into memory from
//! any strategy.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use strategy_deque::{Deque, StupidStrategy};
//!
//! let s1 = Rc::new(StupidStrategy::new());
//! let mut deque = Deque::new(s1.clone());
//!
//! deque.push_back(3).unwrap();
//! deque.push_back(4).unwrap();
//! deque.push_front(2).unwrap();
//! deque.push_front(1).unwrap();
//! assert_eq!("1, 2, 3, 4", deque.to_string());
//!
//! let s2 = Rc::new(StupidStrategy::new());
//! deque.change_allocator(s2.clone()).unwrap();
//! assert_eq!(0, s1.outstanding());
//!
//! assert_eq!(Ok(1), deque.pop_front());
//! assert_eq!(Ok(4), deque.pop_back());
//! assert_eq!("2, 3", deque.to_string());
//! ```
//!
//! The deque is single-threaded: neither it nor the strategies here
//! are `Send` or `Sync`.

mod allocator;
mod cursor;
mod deque;
mod error;
mod iterators;
mod slot;
mod strategy;

pub use crate::allocator::SingleAllocator;
pub use crate::cursor::{Cursor, CursorMut};
pub use crate::deque::{Deque, DisplayWith};
pub use crate::error::{Error, Result};
pub use crate::iterators::{DrainBack, DrainFront, IterBack, IterFront, IterFrontMut};
pub use crate::strategy::{AllocStrategy, BoundedStrategy, SharedStrategy, StupidStrategy};
