use crate::{
    sync::ThreadId,
    types::{HashMap, HashSet, IndexMap, IndexSet, PointName, PointPair},
};
use std::collections::VecDeque;

/// Happens-after graph over point names, plus the marker bindings of the
/// current epoch.
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    /// Predecessor -> points waiting for it.
    successors: IndexMap<PointName, IndexSet<PointName>>,
    /// Successor -> points it waits for.
    predecessors: IndexMap<PointName, IndexSet<PointName>>,
    /// Marker source -> points it binds to the processing thread.
    markers: IndexMap<PointName, IndexSet<PointName>>,
    /// Marked point -> the only thread on which it stays enabled.
    marked_threads: HashMap<PointName, ThreadId>,
}

impl DependencyGraph {
    /// Drop every edge and binding, then insert `dependencies` and `markers`.
    ///
    /// Every marker edge is a dependency edge as well.
    pub(crate) fn load(&mut self, dependencies: &[PointPair], markers: &[PointPair]) {
        let Self {
            successors,
            predecessors,
            markers: marker_table,
            marked_threads,
        } = self;
        successors.clear();
        predecessors.clear();
        marker_table.clear();
        marked_threads.clear();

        for PointPair {
            predecessor,
            successor,
        } in dependencies.iter().chain(markers)
        {
            successors
                .entry(predecessor.clone())
                .or_default()
                .insert(successor.clone());
            predecessors
                .entry(successor.clone())
                .or_default()
                .insert(predecessor.clone());
        }
        for PointPair {
            predecessor,
            successor,
        } in markers
        {
            marker_table
                .entry(predecessor.clone())
                .or_default()
                .insert(successor.clone());
        }
    }

    /// Bind every point marked by `point` to `thread`.
    ///
    /// A binding made earlier in the epoch is kept.
    pub(crate) fn bind_markers(&mut self, point: &str, thread: ThreadId) {
        let Some(targets) = self.markers.get(point) else {
            return;
        };
        for target in targets {
            self.marked_threads.entry(target.clone()).or_insert(thread);
        }
    }

    /// Whether `point` is bound to a thread other than `thread`.
    pub(crate) fn disabled_by_marker(&self, point: &str, thread: ThreadId) -> bool {
        self.marked_threads
            .get(point)
            .is_some_and(|&bound| bound != thread)
    }

    /// Whether every predecessor of `point` is in `passed`.
    pub(crate) fn predecessors_passed(&self, point: &str, passed: &HashSet<PointName>) -> bool {
        self.predecessors
            .get(point)
            .is_none_or(|preds| preds.iter().all(|pred| passed.contains(pred)))
    }

    /// Predecessors of `point` that have not passed yet.
    pub(crate) fn pending_predecessors<'a>(
        &'a self,
        point: &str,
        passed: &'a HashSet<PointName>,
    ) -> impl Iterator<Item = &'a PointName> + use<'a> {
        self.predecessors
            .get(point)
            .into_iter()
            .flatten()
            .filter(|pred| !passed.contains(*pred))
    }

    /// Points that directly wait for `point`.
    pub(crate) fn successors_of(&self, point: &str) -> Option<&IndexSet<PointName>> {
        self.successors.get(point)
    }

    /// Points that can never be released because they sit on a dependency
    /// cycle or downstream of one, in load order.
    ///
    /// The engine never rejects such a graph: threads reaching these points
    /// block forever. This only feeds diagnostics.
    pub(crate) fn blocked_points(&self) -> Vec<PointName> {
        // Kahn's algorithm: whatever never reaches in-degree zero sits on a
        // cycle or downstream of one.
        let mut in_degree: IndexMap<&PointName, usize> = IndexMap::default();
        for (successor, preds) in &self.predecessors {
            in_degree.insert(successor, preds.len());
            for pred in preds {
                in_degree.entry(pred).or_insert(0);
            }
        }
        let mut ready: VecDeque<&PointName> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(&point, _)| point)
            .collect();
        while let Some(point) = ready.pop_front() {
            let Some(children) = self.successors.get(point) else {
                continue;
            };
            for child in children {
                let degree = in_degree
                    .get_mut(child)
                    .expect("DependencyGraph::blocked_points: [1]");
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(child);
                }
            }
        }
        in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(point, _)| point.clone())
            .collect()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use crate::sync::current_thread_id;

    fn pairs(edges: &[(&str, &str)]) -> Vec<PointPair> {
        edges.iter().map(|&edge| edge.into()).collect()
    }

    fn passed(points: &[&str]) -> HashSet<PointName> {
        points.iter().map(|&p| PointName::from(p)).collect()
    }

    #[test]
    fn predecessors_gate_successor() {
        let mut graph = DependencyGraph::default();
        graph.load(&pairs(&[("A", "C"), ("B", "C")]), &[]);

        assert!(graph.predecessors_passed("A", &passed(&[])));
        assert!(graph.predecessors_passed("Unknown", &passed(&[])));
        assert!(!graph.predecessors_passed("C", &passed(&["A"])));
        assert!(graph.predecessors_passed("C", &passed(&["A", "B"])));

        let binding = passed(&["B"]);
        let pending: Vec<_> = graph.pending_predecessors("C", &binding).collect();
        assert_eq!(pending, [&PointName::from("A")]);
    }

    #[test]
    fn markers_are_dependencies_too() {
        let mut graph = DependencyGraph::default();
        graph.load(&[], &pairs(&[("Marker", "Marked")]));

        assert!(!graph.predecessors_passed("Marked", &passed(&[])));
        assert!(graph.predecessors_passed("Marked", &passed(&["Marker"])));
        let successors = graph.successors_of("Marker").unwrap();
        assert!(successors.contains("Marked"));
    }

    #[test]
    fn first_binding_wins_until_reload() {
        let this_thread = current_thread_id();
        let other_thread = std::thread::spawn(current_thread_id).join().unwrap();

        let mut graph = DependencyGraph::default();
        graph.load(&[], &pairs(&[("Marker", "Marked")]));
        assert!(!graph.disabled_by_marker("Marked", other_thread));

        graph.bind_markers("Marker", this_thread);
        graph.bind_markers("Marker", other_thread);
        assert!(!graph.disabled_by_marker("Marked", this_thread));
        assert!(graph.disabled_by_marker("Marked", other_thread));
        // Only targets are bound, never the marker source itself.
        assert!(!graph.disabled_by_marker("Marker", other_thread));

        graph.load(&[], &pairs(&[("Marker", "Marked")]));
        assert!(!graph.disabled_by_marker("Marked", other_thread));
    }

    #[test]
    fn reload_replaces_edges() {
        let mut graph = DependencyGraph::default();
        graph.load(&pairs(&[("A", "B")]), &[]);
        graph.load(&pairs(&[("B", "C")]), &[]);
        assert!(graph.predecessors_passed("B", &passed(&[])));
        assert!(!graph.predecessors_passed("C", &passed(&[])));
        assert!(graph.successors_of("A").is_none());
    }

    #[test]
    fn cycles_are_reported() {
        let mut graph = DependencyGraph::default();
        graph.load(&pairs(&[("A", "B"), ("B", "C"), ("C", "D")]), &[]);
        assert!(graph.blocked_points().is_empty());

        graph.load(&pairs(&[("Root", "A"), ("A", "B"), ("B", "A")]), &[]);
        let blocked = graph.blocked_points();
        assert_eq!(blocked, [PointName::from("A"), PointName::from("B")]);

        // Tail is not on the cycle but still never released.
        graph.load(
            &pairs(&[("Root", "A"), ("A", "B"), ("B", "A"), ("B", "Tail")]),
            &[],
        );
        let blocked = graph.blocked_points();
        assert_eq!(
            blocked,
            [
                PointName::from("A"),
                PointName::from("B"),
                PointName::from("Tail")
            ]
        );
    }
}
