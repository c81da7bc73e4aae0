//! Directed graph container.
//!
//! Nodes and edges are stored in insertion order. Every query that walks nodes or edges
//! (`nodes`, `edges`, `successors`, `out_edges`, ...) yields them in the order they were first
//! inserted, which keeps downstream layout deterministic for a given input ordering.

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

mod edge_key;

pub mod alg;

use edge_key::EdgeKeyView;
pub use edge_key::EdgeKey;

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Allow several edges between the same `(v, w)` pair, distinguished by name.
    pub multigraph: bool,
}

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,

    graph_label: G,
    default_node_label: Box<dyn Fn() -> N>,
    default_edge_label: Box<dyn Fn() -> E>,

    nodes: IndexMap<String, N, FxBuildHasher>,
    edges: IndexMap<EdgeKey, E, FxBuildHasher>,

    out_adj: FxHashMap<String, Vec<EdgeKey>>,
    in_adj: FxHashMap<String, Vec<EdgeKey>>,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: IndexMap::default(),
            edges: IndexMap::default(),
            out_adj: FxHashMap::default(),
            in_adj: FxHashMap::default(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + 'static,
    {
        self.default_edge_label = Box::new(f);
        self
    }

    // ---- nodes -------------------------------------------------------------------------------

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(slot) = self.nodes.get_mut(id.as_str()) {
            *slot = label;
            return self;
        }
        self.out_adj.insert(id.clone(), Vec::new());
        self.in_adj.insert(id.clone(), Vec::new());
        self.nodes.insert(id, label);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.nodes.contains_key(id.as_str()) {
            return self;
        }
        let label = (self.default_node_label)();
        self.set_node(id, label)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.nodes.get_mut(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// The stored id equal to `id`, borrowed from the graph.
    pub fn node_key(&self, id: &str) -> Option<&str> {
        self.nodes.get_key_value(id).map(|(k, _)| k.as_str())
    }

    /// Position of `id` in insertion order.
    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for (id, label) in &self.nodes {
            f(id, label);
        }
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for (id, label) in &mut self.nodes {
            f(id, label);
        }
    }

    /// Removes `id` together with every incident edge. Returns `false` if the node was absent.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        let mut incident: Vec<EdgeKey> = Vec::new();
        if let Some(out) = self.out_adj.get(id) {
            incident.extend(out.iter().cloned());
        }
        if let Some(ins) = self.in_adj.get(id) {
            incident.extend(ins.iter().filter(|k| k.v != k.w).cloned());
        }
        for key in incident {
            let _ = self.remove_edge_key(&key);
        }
        self.out_adj.remove(id);
        self.in_adj.remove(id);
        self.nodes.shift_remove(id);
        true
    }

    // ---- edges -------------------------------------------------------------------------------

    fn key_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn canonicalize_key(&self, mut key: EdgeKey) -> EdgeKey {
        if !self.options.multigraph {
            key.name = None;
        }
        key
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.keys()
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().cloned().collect()
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for (key, label) in &self.edges {
            f(key, label);
        }
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for (key, label) in &mut self.edges {
            f(key, label);
        }
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    /// Sets (or replaces) the label of edge `v -> w` named `name`. Missing endpoints are created
    /// with the default node label. When `label` is `None`, an existing label is kept and a new
    /// edge receives the default edge label.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let key = self.canonicalize_key(EdgeKey::new(v, w, name));
        if let Some(slot) = self.edges.get_mut(&key) {
            if let Some(label) = label {
                *slot = label;
            }
            return self;
        }

        self.ensure_node(key.v.clone());
        self.ensure_node(key.w.clone());

        let label = label.unwrap_or_else(|| (self.default_edge_label)());
        if let Some(out) = self.out_adj.get_mut(&key.v) {
            out.push(key.clone());
        }
        if let Some(ins) = self.in_adj.get_mut(&key.w) {
            ins.push(key.clone());
        }
        self.edges.insert(key, label);
        self
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> &mut Self {
        self.set_edge_named(key.v, key.w, key.name, Some(label))
    }

    /// Chains `nodes[0] -> nodes[1] -> ...` with default edge labels.
    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edges.contains_key(&self.key_view(v, w, name))
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edges.get(&self.key_view(v, w, name))
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let view = self.key_view(v, w, name);
        self.edges.get_mut(&view)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> bool {
        let view = self.key_view(v, w, name);
        let Some((key, _label)) = self.edges.shift_remove_entry(&view) else {
            return false;
        };
        if let Some(out) = self.out_adj.get_mut(&key.v) {
            out.retain(|k| *k != key);
        }
        if let Some(ins) = self.in_adj.get_mut(&key.w) {
            ins.retain(|k| *k != key);
        }
        true
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> bool {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    // ---- adjacency ---------------------------------------------------------------------------

    /// Edges leaving `v`, optionally restricted to those that end at `w`.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(out) = self.out_adj.get(v) else {
            return Vec::new();
        };
        out.iter()
            .filter(|k| w.is_none_or(|w| k.w == w))
            .cloned()
            .collect()
    }

    /// Edges entering `v`, optionally restricted to those that start at `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        let Some(ins) = self.in_adj.get(v) else {
            return Vec::new();
        };
        ins.iter()
            .filter(|k| u.is_none_or(|u| k.v == u))
            .cloned()
            .collect()
    }

    /// All edges incident to `v` (out edges first, then in edges; self loops once).
    pub fn node_edges(&self, v: &str) -> Vec<EdgeKey> {
        let mut out = self.out_edges(v, None);
        out.extend(self.in_edges(v, None).into_iter().filter(|k| k.v != k.w));
        out
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        if let Some(edges) = self.out_adj.get(v) {
            for k in edges {
                if !out.contains(&k.w.as_str()) {
                    out.push(k.w.as_str());
                }
            }
        }
        out
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        if let Some(edges) = self.in_adj.get(v) {
            for k in edges {
                if !out.contains(&k.v.as_str()) {
                    out.push(k.v.as_str());
                }
            }
        }
        out
    }

    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out = self.predecessors(v);
        for w in self.successors(v) {
            if !out.contains(&w) {
                out.push(w);
            }
        }
        out
    }

    /// Nodes without in-edges, in insertion order.
    pub fn sources(&self) -> Vec<&str> {
        self.nodes()
            .filter(|v| self.in_adj.get(*v).is_none_or(Vec::is_empty))
            .collect()
    }

    /// Nodes without out-edges, in insertion order.
    pub fn sinks(&self) -> Vec<&str> {
        self.nodes()
            .filter(|v| self.out_adj.get(*v).is_none_or(Vec::is_empty))
            .collect()
    }
}

impl<N, E, G> Clone for Graph<N, E, G>
where
    N: Default + Clone + 'static,
    E: Default + Clone + 'static,
    G: Default + Clone,
{
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            graph_label: self.graph_label.clone(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            out_adj: self.out_adj.clone(),
            in_adj: self.in_adj.clone(),
        }
    }
}

impl<N, E, G> std::fmt::Debug for Graph<N, E, G>
where
    N: Default + std::fmt::Debug + 'static,
    E: Default + std::fmt::Debug + 'static,
    G: Default + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("graph", &self.graph_label)
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .finish()
    }
}
