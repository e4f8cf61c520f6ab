/// Allocates and recycles non-zero `u32` handle names.
///
/// Device handles use `0` as the null name, so the first id handed out is
/// `1`. Released ids are recycled LIFO on subsequent allocations, the way
/// drivers hand back recently deleted buffer names.
///
/// # Example
///
/// ```ignore
/// let mut ids = IdAllocator::new();
/// let a = ids.alloc();  // 1
/// let b = ids.alloc();  // 2
/// ids.release(a);       // 1 is now available
/// let c = ids.alloc();  // 1 (recycled)
/// ```
pub struct IdAllocator {
    free_list: Vec<u32>,
    next_id: u32,
    live: u32,
}

impl IdAllocator {
    /// Create a new allocator with no live ids
    pub fn new() -> Self {
        Self {
            free_list: Vec::new(),
            next_id: 1,
            live: 0,
        }
    }

    /// Allocate the next available id (never 0)
    pub fn alloc(&mut self) -> u32 {
        self.live += 1;
        self.free_list.pop().unwrap_or_else(|| {
            let id = self.next_id;
            self.next_id += 1;
            id
        })
    }

    /// Return an id to the pool for reuse
    pub fn release(&mut self, id: u32) {
        debug_assert!(id != 0 && id < self.next_id, "releasing an unallocated id: {}", id);
        self.live -= 1;
        self.free_list.push(id);
    }

    /// Number of ids currently handed out
    pub fn live(&self) -> u32 {
        self.live
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "id_allocator_tests.rs"]
mod tests;
