//! A compressing radix tree that maps exact request paths to values, one per
//! request method.
//!
//! Every node stores the fragment of the path consumed on the way to it, and
//! its children are kept sorted by the first byte of their own fragment. A
//! lookup therefore costs one binary search per branching point along the
//! path, independent of how many routes are registered:
//!
//! ```rust
//! use radixroute::tree::Tree;
//! use hyper::Method;
//!
//! let mut tree = Tree::default();
//! tree.insert(Method::GET, "/api", 1).unwrap();
//! tree.insert(Method::POST, "/api/auth", 2).unwrap();
//! tree.insert(Method::PUT, "/api/auth", 3).unwrap();
//!
//! assert_eq!(tree.at(&Method::GET, "/api"), Some(&1));
//! assert_eq!(tree.at(&Method::PUT, "/api/auth"), Some(&3));
//! assert_eq!(tree.at(&Method::GET, "/api/auth"), None);
//! assert_eq!(tree.enumerate().len(), 2);
//! ```
//!
//! Only static paths are supported. `/users` and `/users/` are different
//! routes and no part of a path is ever matched as a parameter.
use crate::error::TreeError;

use std::collections::HashMap;

use hyper::Method;

const ROOT: usize = 0;

/// The values registered for a single path, keyed by request method.
pub type Endpoints<T> = HashMap<Method, T>;

/// Returns the length of the shared leading byte sequence of `a` and `b`.
///
/// ```rust
/// # use radixroute::tree::longest_prefix;
/// assert_eq!(longest_prefix(b"/apple", b"/apricot"), 3);
/// assert_eq!(longest_prefix(b"/api", b"/api/auth"), 4);
/// assert_eq!(longest_prefix(b"x", b"y"), 0);
/// ```
pub fn longest_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

// Terminal record of a node that completes a registered path.
#[derive(Debug, Clone)]
struct Leaf<T> {
    key: String,
    endpoints: Endpoints<T>,
}

impl<T> Leaf<T> {
    fn new(key: &str, method: Method, value: T) -> Self {
        let mut endpoints = HashMap::with_capacity(1);
        endpoints.insert(method, value);
        Self {
            key: key.to_owned(),
            endpoints,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    label: u8,
    node: usize,
}

#[derive(Debug, Clone)]
struct Node<T> {
    // Bytes rather than `str`: a split may fall inside a UTF-8 sequence.
    prefix: Vec<u8>,
    edges: Vec<Edge>,
    leaf: Option<Leaf<T>>,
}

impl<T> Node<T> {
    fn new(prefix: Vec<u8>, leaf: Option<Leaf<T>>) -> Self {
        Self {
            prefix,
            edges: Vec::new(),
            leaf,
        }
    }

    fn get_edge(&self, label: u8) -> Option<usize> {
        self.edges
            .binary_search_by_key(&label, |edge| edge.label)
            .ok()
            .map(|idx| self.edges[idx].node)
    }

    fn add_edge(&mut self, edge: Edge) -> Result<(), TreeError> {
        match self.edges.binary_search_by_key(&edge.label, |e| e.label) {
            Ok(_) => Err(TreeError::DuplicateEdge { label: edge.label }),
            Err(idx) => {
                self.edges.insert(idx, edge);
                Ok(())
            }
        }
    }

    fn update_edge(&mut self, label: u8, node: usize) -> Result<(), TreeError> {
        match self.edges.binary_search_by_key(&label, |edge| edge.label) {
            Ok(idx) => {
                self.edges[idx].node = node;
                Ok(())
            }
            Err(_) => Err(TreeError::MissingEdge { label }),
        }
    }
}

/// A radix tree of static paths.
///
/// Nodes are stored in a single arena and never removed. The tree is meant
/// to be filled once and then shared read-only; `at`, `endpoints` and
/// `enumerate` take `&self` and may be called from many threads at once.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
    len: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self {
            nodes: vec![Node::new(Vec::new(), None)],
            len: 0,
        }
    }
}

impl<T> Tree<T> {
    /// Registers `value` for `method` at `path`.
    ///
    /// The empty path addresses the root. Registering the same method and
    /// path twice replaces the earlier value. An error is only returned if
    /// the tree's structure turned out to be inconsistent, which no sequence
    /// of insertions should be able to cause.
    pub fn insert(&mut self, method: Method, path: &str, value: T) -> Result<(), TreeError> {
        let mut current = ROOT;
        let mut search = path.as_bytes();

        loop {
            // Handle key exhaustion
            if search.is_empty() {
                let node = &mut self.nodes[current];
                match node.leaf {
                    Some(ref mut leaf) => {
                        leaf.endpoints.insert(method, value);
                    }
                    None => {
                        node.leaf = Some(Leaf::new(path, method, value));
                        self.len += 1;
                    }
                }
                return Ok(());
            }

            let label = search[0];
            let child = match self.nodes[current].get_edge(label) {
                Some(child) => child,
                None => {
                    let leaf = Leaf::new(path, method, value);
                    let node = self.push(Node::new(search.to_vec(), Some(leaf)));
                    self.len += 1;
                    return self.nodes[current].add_edge(Edge { label, node });
                }
            };

            let common = longest_prefix(search, &self.nodes[child].prefix);
            if common == self.nodes[child].prefix.len() {
                search = &search[common..];
                current = child;
                continue;
            }

            // Split the child: the shared part becomes a new node in its place.
            let rest = self.nodes[child].prefix.split_off(common);
            let shared = std::mem::replace(&mut self.nodes[child].prefix, rest);
            let split = self.push(Node::new(shared, None));
            self.nodes[current].update_edge(label, split)?;

            let child_label = self.nodes[child].prefix[0];
            self.nodes[split].add_edge(Edge {
                label: child_label,
                node: child,
            })?;

            let leaf = Leaf::new(path, method, value);
            self.len += 1;

            search = &search[common..];
            if search.is_empty() {
                self.nodes[split].leaf = Some(leaf);
                return Ok(());
            }

            let node = self.push(Node::new(search.to_vec(), Some(leaf)));
            return self.nodes[split].add_edge(Edge {
                label: search[0],
                node,
            });
        }
    }

    /// Returns the value registered for `method` at exactly `path`.
    pub fn at(&self, method: &Method, path: &str) -> Option<&T> {
        self.endpoints(path)?.get(method)
    }

    /// Returns every value registered at exactly `path`, keyed by method.
    pub fn endpoints(&self, path: &str) -> Option<&Endpoints<T>> {
        let mut current = &self.nodes[ROOT];
        let mut search = path.as_bytes();

        loop {
            if search.is_empty() {
                return current.leaf.as_ref().map(|leaf| &leaf.endpoints);
            }

            current = &self.nodes[current.get_edge(search[0])?];
            search = search.strip_prefix(current.prefix.as_slice())?;
        }
    }

    /// Collects every registered path with its endpoints.
    pub fn enumerate(&self) -> HashMap<&str, &Endpoints<T>> {
        let mut out = HashMap::with_capacity(self.len);
        self.collect(ROOT, &mut out);
        out
    }

    fn collect<'a>(&'a self, node: usize, out: &mut HashMap<&'a str, &'a Endpoints<T>>) {
        let node = &self.nodes[node];
        if let Some(ref leaf) = node.leaf {
            out.insert(leaf.key.as_str(), &leaf.endpoints);
        }

        for edge in &node.edges {
            self.collect(edge.node, out);
        }
    }

    /// Consumes the tree, yielding each registered path with its endpoints.
    pub fn into_routes(self) -> impl Iterator<Item = (String, Endpoints<T>)> {
        self.nodes
            .into_iter()
            .filter_map(|node| node.leaf)
            .map(|leaf| (leaf.key, leaf.endpoints))
    }

    /// The number of distinct registered paths.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, node: Node<T>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}
