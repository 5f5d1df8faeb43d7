//! # Property-Based Tests
//!
//! Resolution invariants checked over randomly generated acyclic graphs.
//!
//! Each graph has up to eight nodes. Node `i` may depend on any node `j < i`,
//! which keeps every generated graph acyclic. Node identity is the const
//! parameter of `Node<N>`, so every index is a distinct asset variant.

use proptest::collection::vec;
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use tessera_core::{
    Asset, AssetError, File, FileFetcher, MemoryFetcher, Outcome, Parents, Pass, WritableAsset,
};

const NODES: usize = 8;

// =============================================================================
// INSTRUMENTED ASSETS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Load(usize),
    Generate(usize),
}

#[derive(Default)]
struct Context {
    /// `topology[i]` lists the dependencies of node `i`.
    topology: Vec<Vec<usize>>,
    /// Nodes whose `load` reports found.
    persisted: BTreeSet<usize>,
    events: RefCell<Vec<Event>>,
}

struct Node<const N: usize> {
    ctx: Rc<Context>,
    files: Vec<File>,
}

fn node(index: usize, ctx: &Rc<Context>) -> Box<dyn Asset> {
    macro_rules! make {
        ($($n:literal),*) => {
            match index {
                $($n => Box::new(Node::<$n> { ctx: Rc::clone(ctx), files: Vec::new() }),)*
                _ => unreachable!("node index out of range"),
            }
        };
    }
    make!(0, 1, 2, 3, 4, 5, 6, 7)
}

impl<const N: usize> Asset for Node<N> {
    fn name(&self) -> &str {
        const NAMES: [&str; NODES] = ["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"];
        NAMES[N]
    }

    fn dependencies(&self) -> Vec<Box<dyn Asset>> {
        self.ctx.topology[N]
            .iter()
            .map(|&dep| node(dep, &self.ctx))
            .collect()
    }

    fn generate(&mut self, parents: &Parents<'_>) -> Result<(), AssetError> {
        self.ctx.events.borrow_mut().push(Event::Generate(N));
        let mut content = format!("node {N}\n");
        for id in parents.ids() {
            let parent = parents.get_by_id(*id).ok_or("missing parent")?;
            for file in parent.as_writable().map(|w| w.files()).unwrap_or_default() {
                content.push_str(&String::from_utf8_lossy(&file.data));
            }
        }
        self.files = vec![File::new(format!("nodes/{N}.txt"), content)];
        Ok(())
    }

    fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
        self.ctx.events.borrow_mut().push(Event::Load(N));
        if self.ctx.persisted.contains(&N) {
            self.files = vec![File::new(format!("nodes/{N}.txt"), format!("persisted {N}\n"))];
            return Ok(true);
        }
        Ok(false)
    }

    fn as_writable(&self) -> Option<&dyn WritableAsset> {
        Some(self)
    }
}

impl<const N: usize> WritableAsset for Node<N> {
    fn files(&self) -> &[File] {
        &self.files
    }
}

// =============================================================================
// STRATEGIES & HELPERS
// =============================================================================

/// Random DAG: node `i` depends on each `j < i` whose mask bit is set.
fn topology() -> impl Strategy<Value = Vec<Vec<usize>>> {
    vec(any::<u8>(), NODES).prop_map(|masks| {
        masks
            .iter()
            .enumerate()
            .map(|(i, mask)| (0..i).filter(|j| mask & (1 << j) != 0).collect())
            .collect()
    })
}

fn reachable(topology: &[Vec<usize>], root: usize) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if seen.insert(current) {
            stack.extend(topology[current].iter().copied());
        }
    }
    seen
}

fn context(topology: Vec<Vec<usize>>, persisted: BTreeSet<usize>) -> Rc<Context> {
    Rc::new(Context {
        topology,
        persisted,
        events: RefCell::new(Vec::new()),
    })
}

fn position(events: &[Event], wanted: impl Fn(&Event) -> bool) -> Option<usize> {
    events.iter().position(wanted)
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every reachable asset is loaded once and generated at most once.
    #[test]
    fn each_asset_materialized_exactly_once(topology in topology()) {
        let ctx = context(topology.clone(), BTreeSet::new());
        let fetcher = MemoryFetcher::new();

        let output = Pass::new(&fetcher)
            .target_boxed(node(NODES - 1, &ctx))
            .run()
            .expect("pass");

        let expected = reachable(&topology, NODES - 1);
        prop_assert_eq!(output.graph.len(), expected.len());

        let events = ctx.events.borrow();
        for n in &expected {
            let loads = events.iter().filter(|e| **e == Event::Load(*n)).count();
            let generates = events.iter().filter(|e| **e == Event::Generate(*n)).count();
            prop_assert_eq!(loads, 1);
            prop_assert_eq!(generates, 1);
        }
        prop_assert_eq!(events.len(), expected.len() * 2);
    }

    /// A dependency is fully materialized before its dependent is touched.
    #[test]
    fn dependencies_materialize_before_dependents(topology in topology()) {
        let ctx = context(topology.clone(), BTreeSet::new());
        let fetcher = MemoryFetcher::new();

        Pass::new(&fetcher)
            .target_boxed(node(NODES - 1, &ctx))
            .run()
            .expect("pass");

        let events = ctx.events.borrow();
        for i in reachable(&topology, NODES - 1) {
            let dependent_load = position(&events, |e| *e == Event::Load(i)).expect("loaded");
            for &j in &topology[i] {
                let dependency_done =
                    position(&events, |e| *e == Event::Generate(j)).expect("generated");
                prop_assert!(dependency_done < dependent_load);
            }
        }
    }

    /// Loaded assets are never generated in the same pass.
    #[test]
    fn loaded_assets_skip_generate(
        topology in topology(),
        persisted_mask in any::<u8>()
    ) {
        let persisted: BTreeSet<usize> =
            (0..NODES).filter(|i| persisted_mask & (1 << i) != 0).collect();
        let ctx = context(topology.clone(), persisted.clone());
        let fetcher = MemoryFetcher::new();

        let output = Pass::new(&fetcher)
            .target_boxed(node(NODES - 1, &ctx))
            .run()
            .expect("pass");

        let events = ctx.events.borrow();
        for record in output.graph.records() {
            let index: usize = record.name[1..].parse().expect("index");
            let generated = events.contains(&Event::Generate(index));
            if persisted.contains(&index) {
                prop_assert_eq!(record.outcome, Outcome::Loaded);
                prop_assert!(!generated);
            } else {
                prop_assert_eq!(record.outcome, Outcome::Generated);
                prop_assert!(generated);
            }
        }
    }

    /// Two independent passes over the same graph produce identical output.
    #[test]
    fn identical_input_produces_identical_output(topology in topology()) {
        let fetcher = MemoryFetcher::new();

        let first_ctx = context(topology.clone(), BTreeSet::new());
        let first = Pass::new(&fetcher)
            .target_boxed(node(NODES - 1, &first_ctx))
            .run()
            .expect("first pass");

        let second_ctx = context(topology, BTreeSet::new());
        let second = Pass::new(&fetcher)
            .target_boxed(node(NODES - 1, &second_ctx))
            .run()
            .expect("second pass");

        prop_assert_eq!(first.files.files(), second.files.files());
        prop_assert_eq!(first.files.checksum(), second.files.checksum());
    }

    /// Aggregated files follow resolution order.
    #[test]
    fn files_follow_resolution_order(topology in topology()) {
        let ctx = context(topology, BTreeSet::new());
        let fetcher = MemoryFetcher::new();

        let output = Pass::new(&fetcher)
            .target_boxed(node(NODES - 1, &ctx))
            .run()
            .expect("pass");

        let from_records: Vec<String> = output
            .graph
            .records()
            .map(|r| format!("nodes/{}.txt", &r.name[1..]))
            .collect();
        let from_files: Vec<String> =
            output.files.files().iter().map(|f| f.path.clone()).collect();
        prop_assert_eq!(from_records, from_files);
    }
}
