use std::{
    cell::RefCell,
    collections::HashSet,
    fmt,
    rc::{Rc, Weak},
    sync::atomic::{AtomicUsize, Ordering},
};

use indexmap::IndexMap;

use crate::{interpreter::value::Value, span::Span};

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// The name to value bindings of one scope.
///
/// Bindings keep the order in which their names were first bound. Tables are
/// shared through [`Table`] handles. Lookups that miss continue in the parent
/// table; the parent link may be rewritten after creation, which is how
/// `sencap` objects are cut off from their surroundings.
#[derive(Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Value>,
    parent:  Option<Table>,
}

/// A shared, mutable handle to a [`SymbolTable`].
///
/// Cloning the handle does not copy the bindings: every clone observes every
/// later change.
#[derive(Clone, Default)]
pub struct Table(Rc<RefCell<SymbolTable>>);

impl Table {
    /// Creates an empty table without a parent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table whose lookups fall back to `parent`.
    #[must_use]
    pub fn with_parent(parent: &Self) -> Self {
        Self(Rc::new(RefCell::new(SymbolTable { symbols: IndexMap::new(),
                                                parent:  Some(parent.clone()), })))
    }

    /// Looks `name` up in this table and then in its ancestors.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(table) = current {
            let table = table.0.borrow();
            if let Some(value) = table.symbols.get(name) {
                return Some(value.clone());
            }
            current = table.parent.clone();
        }
        None
    }

    /// Checks whether `name` is bound in this table itself.
    #[must_use]
    pub fn contains_direct(&self, name: &str) -> bool {
        self.0.borrow().symbols.contains_key(name)
    }

    /// Binds `name` in this table, replacing any previous binding.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().symbols.insert(name.into(), value);
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.clone()
    }

    /// Rewrites the parent link.
    pub fn set_parent(&self, parent: Option<Self>) {
        self.0.borrow_mut().parent = parent;
    }

    /// Returns a copy of the bindings held by this table itself, in binding
    /// order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .symbols
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Checks whether both handles refer to the same table.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Splices `link` into the chain of this table, making everything
    /// visible from `link` visible from here.
    ///
    /// The root ancestor of the chain is re-pointed to `link`. When both
    /// chains already meet, the last table before the meeting point is
    /// re-pointed instead, so no table loses a binding it could see before.
    /// The rewrite is shared by everything holding a table of the chain.
    ///
    /// # Returns
    /// - `Some(Table)`: The table whose parent is now `link`.
    /// - `None`: If this table is itself visible from `link`; splicing would
    ///   close a cycle, and nothing is changed.
    ///
    /// # Example
    /// ```
    /// use imperal::interpreter::scope::Table;
    ///
    /// let chain = Table::new();
    /// let link = Table::new();
    /// let spliced = chain.backlink(&link).unwrap();
    ///
    /// assert!(spliced.ptr_eq(&chain));
    /// assert!(chain.parent().is_some_and(|parent| parent.ptr_eq(&link)));
    /// assert!(link.backlink(&chain).is_none());
    /// ```
    #[must_use]
    pub fn backlink(&self, link: &Self) -> Option<Self> {
        let mut visible = HashSet::new();
        let mut current = Some(link.clone());
        while let Some(table) = current {
            visible.insert(table.addr());
            current = table.parent();
        }

        if visible.contains(&self.addr()) {
            return None;
        }

        let mut splice = self.clone();
        while let Some(parent) = splice.parent()
              && !visible.contains(&parent.addr())
        {
            splice = parent;
        }
        splice.set_parent(Some(link.clone()));
        Some(splice)
    }

    fn addr(&self) -> *const RefCell<SymbolTable> {
        Rc::as_ptr(&self.0)
    }

    /// Drops every binding and the parent link.
    fn clear(&self) {
        let (symbols, parent) = {
            let mut table = self.0.borrow_mut();
            (std::mem::take(&mut table.symbols), table.parent.take())
        };
        drop(symbols);
        drop(parent);
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0.borrow();
        let mut names: Vec<&String> = table.symbols.keys().collect();
        names.sort();
        f.debug_struct("Table")
         .field("names", &names)
         .field("has_parent", &table.parent.is_some())
         .finish()
    }
}

#[derive(Default)]
struct Registry {
    frames:   Vec<Weak<Frame>>,
    prune_at: usize,
}

/// Every frame created on top of one root context, held weakly.
///
/// Freed frames are pruned whenever the list has doubled since the last
/// pruning.
#[derive(Clone, Default)]
struct Heap(Rc<RefCell<Registry>>);

impl Heap {
    fn register(&self, frame: &Rc<Frame>) {
        let mut registry = self.0.borrow_mut();
        if registry.frames.len() >= registry.prune_at {
            registry.frames.retain(|frame| frame.strong_count() > 0);
            registry.prune_at = (registry.frames.len() * 2).max(64);
        }
        registry.frames.push(Rc::downgrade(frame));
    }

    fn live(&self) -> Vec<Context> {
        self.0.borrow().frames.iter().filter_map(Weak::upgrade).map(Context).collect()
    }
}

struct Frame {
    id:     usize,
    label:  String,
    table:  Table,
    parent: Option<Context>,
    entry:  Option<Span>,
    heap:   Heap,
}

/// An execution frame.
///
/// A context pairs a [`Table`] with a unique id, a label shown in tracebacks,
/// the frame it was entered from and the position at which control entered
/// it. Blocks, calls, loop iterations, rebinding assignments and encap bodies
/// each get their own context.
///
/// Contexts are immutable once created; only the bindings in their table
/// change. Cloning is cheap and shares the frame.
///
/// Tables may hold functions and objects that point back at the frame owning
/// the table, which reference counting alone never frees. Every frame is
/// therefore registered with the root it was created under, and
/// [`Context::collect_garbage`] clears the tables nothing reaches anymore.
#[derive(Clone)]
pub struct Context(Rc<Frame>);

/// A handle to a [`Context`] that does not keep it alive.
///
/// Values refer to the frame they were produced in through this handle, so
/// binding a value in a table never makes the frame own itself.
#[derive(Clone, Default)]
pub struct WeakContext(Weak<Frame>);

impl WeakContext {
    /// Returns the context, unless it has been freed.
    #[must_use]
    pub fn upgrade(&self) -> Option<Context> {
        self.0.upgrade().map(Context)
    }
}

impl fmt::Debug for WeakContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(context) => write!(f, "WeakContext({context:?})"),
            None => write!(f, "WeakContext(<freed>)"),
        }
    }
}

impl Context {
    /// Creates a root context, without parent or entry position.
    #[must_use]
    pub fn root(label: impl Into<String>, table: Table) -> Self {
        Self::from_parts(label.into(), table, None, None, Heap::default())
    }

    /// Creates a context around an existing table.
    ///
    /// # Parameters
    /// - `label`: Name shown in tracebacks.
    /// - `table`: The bindings of the new frame.
    /// - `parent`: The frame control came from, if any.
    /// - `entry`: Where control entered the new frame.
    #[must_use]
    pub fn with_table(label: impl Into<String>,
                      table: Table,
                      parent: Option<&Self>,
                      entry: &Span)
                      -> Self {
        let heap = parent.map(|parent| parent.0.heap.clone()).unwrap_or_default();
        Self::from_parts(label.into(), table, parent.cloned(), Some(entry.clone()), heap)
    }

    /// Creates a context without a parent frame that still belongs to the
    /// same root as this one.
    ///
    /// Tracebacks stop at such a frame. Sessions run every program in one,
    /// and `sencap` objects use one as their scope.
    #[must_use]
    pub fn detached(&self, label: impl Into<String>, table: Table, entry: Option<&Span>) -> Self {
        Self::from_parts(label.into(), table, None, entry.cloned(), self.0.heap.clone())
    }

    /// Creates a child frame with a fresh table chained to this frame's table.
    #[must_use]
    pub fn child(&self, label: impl Into<String>, entry: &Span) -> Self {
        Self::with_table(label, Table::with_parent(&self.0.table), Some(self), entry)
    }

    fn from_parts(label: String,
                  table: Table,
                  parent: Option<Self>,
                  entry: Option<Span>,
                  heap: Heap)
                  -> Self {
        let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(id, label = %label, "entering context");
        let frame = Rc::new(Frame { id,
                                    label,
                                    table,
                                    parent,
                                    entry,
                                    heap });
        frame.heap.register(&frame);
        Self(frame)
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.0.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0.label
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.0.table
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.0.parent.as_ref()
    }

    /// Where control entered this frame, if recorded.
    #[must_use]
    pub fn entry(&self) -> Option<&Span> {
        self.0.entry.as_ref()
    }

    /// Looks `name` up through this frame's table chain.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.0.table.get(name)
    }

    /// Binds `name` in this frame's own table.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.table.set(name, value);
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakContext {
        WeakContext(Rc::downgrade(&self.0))
    }

    /// Counts the frames of this context's root that are still alive.
    #[must_use]
    pub fn live_frames(&self) -> usize {
        self.0
            .heap
            .0
            .borrow()
            .frames
            .iter()
            .filter(|frame| frame.strong_count() > 0)
            .count()
    }

    /// Clears the tables that can no longer be reached from this context.
    ///
    /// Starting from this frame, the walk follows parent frames, parent
    /// tables, bindings, function homes, list elements and object scopes.
    /// Every other live frame of the same root gets its table emptied, which
    /// breaks the cycles keeping it alive. Frames only referenced by
    /// tracebacks survive with an empty table.
    ///
    /// Must not run while a program is being evaluated on this root.
    ///
    /// # Returns
    /// The number of tables cleared.
    pub fn collect_garbage(&self) -> usize {
        let mut reached = HashSet::new();
        let mut seen = HashSet::new();
        let mut frames = vec![self.clone()];
        let mut tables = Vec::new();
        let mut values = Vec::new();

        while !frames.is_empty() || !tables.is_empty() || !values.is_empty() {
            while let Some(frame) = frames.pop() {
                if seen.insert(Rc::as_ptr(&frame.0)) {
                    tables.push(frame.0.table.clone());
                    frames.extend(frame.0.parent.clone());
                }
            }
            while let Some(table) = tables.pop() {
                if reached.insert(table.addr()) {
                    let table = table.0.borrow();
                    tables.extend(table.parent.clone());
                    values.extend(table.symbols.values().cloned());
                }
            }
            while let Some(value) = values.pop() {
                value.trace(&mut frames, &mut values);
            }
        }

        let mut cleared = 0;
        for frame in self.0.heap.live() {
            if !reached.contains(&frame.0.table.addr()) {
                frame.0.table.clear();
                cleared += 1;
            }
        }
        tracing::debug!(reached = reached.len(), cleared, "collected unreachable frames");
        cleared
    }

    /// Clears the table of every live frame of this context's root.
    ///
    /// Used when a session ends, so that nothing it created outlives it.
    pub fn release_all(&self) {
        for frame in self.0.heap.live() {
            frame.0.table.clear();
        }
    }
}

/// Frames are printed without their bindings or parents, which may be
/// cyclic through the values they hold.
impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
         .field("id", &self.0.id)
         .field("label", &self.0.label)
         .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        ast::Node,
        interpreter::value::{Function, ValueKind},
        span::Position,
    };

    fn span() -> Span {
        Span::new(Rc::from("<test>"), Position::default(), Position::default())
    }

    fn number(value: f64, context: &Context) -> Value {
        Value::number(value, &span(), context)
    }

    /// Binds a function homed in `context` in its own table.
    fn define_recursive(name: &str, context: &Context) {
        let body = Rc::new(Node::VarAccess { name: name.to_string(),
                                             span: span(), });
        let function = Function::placeholder(name, &body, context);
        context.define(name, Value::new(ValueKind::Function(function), &span(), context));
    }

    #[test]
    fn lookups_walk_the_parent_chain() {
        let root = Context::root("<module>", Table::new());
        root.define("x", number(1.0, &root));
        let child = root.child("<block>", &span());

        assert!(child.lookup("x").is_some());
        assert!(!child.table().contains_direct("x"));
        assert!(child.lookup("y").is_none());
    }

    #[test]
    fn shared_tables_observe_later_bindings() {
        let root = Context::root("<module>", Table::new());
        let child = root.child("<block>", &span());
        root.define("late", number(2.0, &root));

        assert!(child.lookup("late").is_some());
    }

    #[test]
    fn cutting_a_parent_link_hides_outer_bindings() {
        let root = Context::root("<module>", Table::new());
        root.define("outer", number(3.0, &root));
        let child = root.child("<block>", &span());
        child.table().set_parent(None);

        assert!(child.lookup("outer").is_none());
        assert!(child.parent().is_some_and(|parent| parent.ptr_eq(&root)));
    }

    #[test]
    fn contexts_get_distinct_ids() {
        let root = Context::root("<module>", Table::new());
        let child = root.child("<block>", &span());
        assert_ne!(root.id(), child.id());
    }

    #[test]
    fn bound_values_do_not_keep_their_frame_alive() {
        let root = Context::root("<module>", Table::new());
        let child = root.child("<block>", &span());
        child.define("x", number(1.0, &child));
        let weak = child.downgrade();

        drop(child);
        assert!(weak.upgrade().is_none());
        assert_eq!(root.live_frames(), 1);
    }

    #[test]
    fn garbage_collection_clears_unreachable_cycles() {
        let root = Context::root("<module>", Table::new());
        let frame = root.child("f", &span());
        define_recursive("f", &frame);
        let weak = frame.downgrade();

        drop(frame);
        assert!(weak.upgrade().is_some());
        assert_eq!(root.collect_garbage(), 1);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn garbage_collection_keeps_reachable_frames() {
        let root = Context::root("<module>", Table::new());
        let frame = root.child("f", &span());
        define_recursive("f", &frame);
        let home = frame.clone();
        let function = frame.lookup("f").and_then(|value| value.as_function().cloned());
        root.define("g",
                    Value::new(ValueKind::Function(function.unwrap()), &span(), &root));
        drop(frame);

        assert_eq!(root.collect_garbage(), 0);
        assert!(home.lookup("f").is_some());
    }

    #[test]
    fn releasing_a_root_frees_every_frame() {
        let root = Context::root("<module>", Table::new());
        define_recursive("f", &root);
        let child = root.child("g", &span());
        define_recursive("g", &child);
        let weak = root.downgrade();

        root.release_all();
        drop(child);
        drop(root);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn backlinking_joins_where_chains_meet() {
        let shared = Table::new();
        let chain = Table::with_parent(&shared);
        let link = Table::with_parent(&shared);

        let spliced = chain.backlink(&link).unwrap();
        assert!(spliced.ptr_eq(&chain));
        assert!(chain.parent().is_some_and(|parent| parent.ptr_eq(&link)));
        assert!(link.parent().is_some_and(|parent| parent.ptr_eq(&shared)));
    }

    #[test]
    fn backlinking_refuses_to_close_a_cycle() {
        let root = Table::new();
        let chain = Table::with_parent(&root);
        let inner = Table::with_parent(&chain);

        assert!(chain.backlink(&inner).is_none());
        assert!(chain.parent().is_some_and(|parent| parent.ptr_eq(&root)));
    }
}
