//! Union-find over densely indexed elements.
//!
//! Internally this is union-by-size with path compression, but every set also carries a
//! label - its externally visible id. When two sets merge the label of the *first* argument's
//! set always survives, whichever root the size heuristic keeps. Eller's algorithm carries set
//! ids from one row to the next and relies on that.

#[derive(Debug, Clone)]
pub struct DisjointSet {
    parents: Vec<usize>,
    sizes: Vec<usize>,
    labels: Vec<usize>,
    set_count: usize,
}

impl DisjointSet {
    /// `count` singleton sets, element `i` labelled `i`.
    pub fn new(count: usize) -> DisjointSet {
        DisjointSet {
            parents: (0..count).collect(),
            sizes: vec![1; count],
            labels: (0..count).collect(),
            set_count: count,
        }
    }

    /// Add a new singleton set, returning its element (which is also its label).
    pub fn make_set(&mut self) -> usize {
        let element = self.parents.len();
        self.parents.push(element);
        self.sizes.push(1);
        self.labels.push(element);
        self.set_count += 1;
        element
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    #[inline]
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// The label of the set containing `element`.
    ///
    /// Panics if `element` was never added.
    pub fn find(&mut self, element: usize) -> usize {
        let root = self.root(element);
        self.labels[root]
    }

    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.root(a) == self.root(b)
    }

    pub fn size_of(&mut self, element: usize) -> usize {
        let root = self.root(element);
        self.sizes[root]
    }

    /// Merge the sets containing `a` and `b`. The merged set keeps the label of `a`'s set.
    /// Returns false if they were already the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.root(a), self.root(b));
        if root_a == root_b {
            return false;
        }

        let surviving_label = self.labels[root_a];
        let (big, small) = if self.sizes[root_a] >= self.sizes[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parents[small] = big;
        self.sizes[big] += self.sizes[small];
        self.labels[big] = surviving_label;
        self.set_count -= 1;
        true
    }

    fn root(&mut self, element: usize) -> usize {
        let mut root = element;
        while self.parents[root] != root {
            root = self.parents[root];
        }

        // path compression
        let mut current = element;
        while self.parents[current] != root {
            let next = self.parents[current];
            self.parents[current] = root;
            current = next;
        }
        root
    }
}
