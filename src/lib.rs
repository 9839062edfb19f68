//! # Small Rings
//!
//! Ring-buffer containers that live inline for small sizes and automatically
//! grow onto the heap when they fill up.
//!
//! This crate provides `SmallStack`, `SmallQueue`, and `SmallDeque`. All three share one
//! ring storage engine: a power-of-two inline buffer that is promoted to a heap block the
//! first time it fills, then multiplied by a configurable growth factor on every later fill.
//!
//! ## Key Features
//!
//! * **Inline First:** Items are stored inline (no heap allocation) until the capacity `N` is exceeded.
//! * **Cheap Growth:** A heap ring whose window is contiguous grows with a single `reallocate`; a wrapped
//!   window is linearized into the new block with at most two copies.
//! * **Configurable:** A [`RingConfig`] picks the length type (`u8` up to `usize`), the growth factor, and
//!   an insert-time validity check.
//! * **Compile-Time Safety:** Enforces strict limits on `N`, the growth factor, and the inline size (max 16KB)
//!   during the build process.
//! * **Recoverable Failure:** A push that cannot grow returns the value inside an [`InsertError`].
//! * **Interoperability:** `SmallDeque` implements the `AnyDeque` trait, shared with `VecDeque`.
//!
//! ## Capacity Constraints
//!
//! * `N` must be a **power of two** in `2..256` (e.g., 2, 4, 8, ... 128), and fit the config's length type.
//! * `GROWTH_FACTOR` must be a **power of two** in `2..32`.
//! * Growing past the length type's maximum fails with [`ResizeError::CapacityOverflow`].
//!
//! ## Examples
//!
//! ### SmallStack
//!
//! ```rust
//! use small_rings::SmallStack;
//!
//! let mut stack: SmallStack<i32, 2> = SmallStack::new();
//! stack.push(1).unwrap();
//! stack.push(2).unwrap();
//! assert!(stack.is_inline());
//!
//! // 3rd item grows the ring onto the heap
//! stack.push(3).unwrap();
//! assert!(!stack.is_inline());
//! assert_eq!(stack.capacity(), 4);
//! assert_eq!(stack.pop(), Some(3));
//! ```
//!
//! ### SmallQueue
//!
//! ```rust
//! use small_rings::SmallQueue;
//!
//! let mut queue: SmallQueue<&str, 4> = SmallQueue::new();
//! queue.enqueue("a").unwrap();
//! queue.enqueue("b").unwrap();
//! assert_eq!(queue.dequeue(), Some("a"));
//! assert_eq!(queue.peek(), Some(&"b"));
//! ```
//!
//! ### SmallDeque
//!
//! ```rust
//! use small_rings::SmallDeque;
//!
//! let mut deque: SmallDeque<i32, 4> = SmallDeque::new();
//! deque.push_back(2).unwrap();
//! deque.push_front(1).unwrap();
//! assert_eq!(deque.front(), Some(&1));
//! assert_eq!(deque.back(), Some(&2));
//!
//! // Back to inline storage, heap block released
//! deque.reset();
//! assert!(deque.is_empty());
//! assert!(deque.is_inline());
//! ```

// --- Module Declarations ---

pub mod alloc;
pub mod config;
pub mod deque;
pub mod error;
pub mod len_type;
pub mod queue;
mod ring;
pub mod stack;

#[cfg(test)]
mod testing;

// --- Re-exports ---

pub use alloc::{AllocError, Global, RawAlloc};
pub use config::{RingConfig, Standard};
pub use deque::{AnyDeque, SmallDeque};
pub use error::{InsertError, ResizeError};
pub use len_type::LenType;
pub use queue::SmallQueue;
pub use stack::SmallStack;
