use std::fmt;
use std::iter::{Chain, FusedIterator, Rev};
use std::ops::Index;
use std::slice;

/// A FIFO queue with amortized O(1) push and pop.
///
/// The queue is made of two stacks:
/// - `enter` receives pushes, newest element at the tail,
/// - `leave` serves pops, oldest element at the tail.
///
/// Reading `leave` backwards and then `enter` forwards always yields the
/// queue content in FIFO order. `leave` is refilled from `enter` only when
/// it is empty and a pop is requested, so every element moves between the
/// two buffers at most once during its lifetime.
///
/// # Examples
///
/// ```rust
/// use pacer::collections::Queue;
///
/// let mut queue: Queue<i32> = [1, 2, 3].into_iter().collect();
/// assert_eq!(queue.pop(), Some(1));
///
/// queue.push(4);
/// assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(queue[0], 2);
/// ```
#[derive(Clone)]
pub struct Queue<T> {
    /// Receives pushes. Newest element at the tail.
    enter: Vec<T>,

    /// Serves pops. Oldest element at the tail.
    leave: Vec<T>,
}

impl<T> Queue<T> {
    /// Creates an empty queue. Does not allocate.
    pub const fn new() -> Self {
        Self {
            enter: Vec::new(),
            leave: Vec::new(),
        }
    }

    /// Creates an empty queue able to hold `capacity` pushed elements
    /// before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            enter: Vec::with_capacity(capacity),
            leave: Vec::new(),
        }
    }

    /// Appends an element at the back of the queue.
    pub fn push(&mut self, item: T) {
        self.enter.push(item);
    }

    /// Removes and returns the element at the front of the queue.
    ///
    /// When the `leave` stack is exhausted, the whole `enter` stack is
    /// transferred into it in reverse order. A single call may therefore
    /// cost O(n), but the cost over a sequence of calls is O(1) per element.
    ///
    /// Returns `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.leave.is_empty() {
            self.refill();
        }

        self.leave.pop()
    }

    /// Returns a reference to the front element without removing it.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the element at `index`, counted from the logical front.
    ///
    /// Returns `None` if `index >= self.len()`.
    pub fn get(&self, index: usize) -> Option<&T> {
        let leaving = self.leave.len();

        if index < leaving {
            self.leave.get(leaving - 1 - index)
        } else {
            self.enter.get(index - leaving)
        }
    }

    /// Number of elements in the queue.
    pub fn len(&self) -> usize {
        self.enter.len() + self.leave.len()
    }

    /// Returns `true` if the queue holds no element.
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.leave.is_empty()
    }

    /// Removes every element. Allocated buffers are kept.
    pub fn clear(&mut self) {
        self.enter.clear();
        self.leave.clear();
    }

    /// Returns a front-to-back iterator.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.leave.iter().rev().chain(self.enter.iter()),
        }
    }

    /// Moves the pending pushes into `leave`, reversing them so that the
    /// oldest one ends up at the tail.
    fn refill(&mut self) {
        self.leave.reserve(self.enter.len());

        while let Some(item) = self.enter.pop() {
            self.leave.push(item);
        }
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Queue<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!(
                "queue index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}

impl<T> Extend<T> for Queue<T> {
    /// Pushes every item in iteration order.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.enter.extend(iter);
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            enter: iter.into_iter().collect(),
            leave: Vec::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    /// Two queues are equal when they hold the same elements in the same
    /// FIFO order, whatever their internal split.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Queue<T> {}

/// Borrowing iterator over a [`Queue`], front to back.
pub struct Iter<'a, T> {
    inner: Chain<Rev<slice::Iter<'a, T>>, slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Owning iterator over a [`Queue`]. Yields elements in FIFO order.
pub struct IntoIter<T> {
    queue: Queue<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for Queue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { queue: self }
    }
}
