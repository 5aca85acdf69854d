//! Search tests: a scripted toy structure for the phase contracts, and the
//! bundled engine for end-to-end runs.

use proptest::prelude::*;

use super::*;
use crate::error::{MoveError, SearchError, SignatureError};
use crate::structure::{CellCounts, MoveKind, Site, Structure};
use crate::tri4::special::{boundary_of_simplex, subdivided, two_pentachoron_sphere};
use crate::tri4::Triangulation4;

/// Counter-based stand-in for a triangulation.
///
/// `sites[k]` is the number of feasible sites of kind `k`. Collapses consume
/// their own sites; a triangle flip with `unlock` set makes one more edge
/// collapse available. Subdivisions never create collapses, so every epoch
/// only climbs.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Toy {
    vertices: usize,
    edges: usize,
    size: usize,
    sites: [usize; 5],
    unlock: bool,
    generation: u64,
}

impl Toy {
    fn new(edges: usize, size: usize) -> Self {
        Self {
            vertices: 6,
            edges,
            size,
            sites: [0; 5],
            unlock: false,
            generation: 0,
        }
    }

    fn with_sites(mut self, kind: MoveKind, n: usize) -> Self {
        self.sites[kind.slot()] = n;
        self
    }

    fn unlocking(mut self) -> Self {
        self.unlock = true;
        self
    }
}

impl Structure for Toy {
    fn from_signature(sig: &str) -> Result<Self, SignatureError> {
        let body = sig.strip_prefix("toy:").ok_or(SignatureError::Empty)?;
        let nums = body
            .split(':')
            .map(|p| p.parse::<usize>().map_err(|_| SignatureError::Truncated))
            .collect::<Result<Vec<_>, _>>()?;
        let &[v, e, n, s0, s1, s2, s3, s4, unlock] = nums.as_slice() else {
            return Err(SignatureError::Truncated);
        };
        Ok(Self {
            vertices: v,
            edges: e,
            size: n,
            sites: [s0, s1, s2, s3, s4],
            unlock: unlock == 1,
            generation: 0,
        })
    }

    fn signature(&self) -> String {
        let s = self.sites;
        format!(
            "toy:{}:{}:{}:{}:{}:{}:{}:{}:{}",
            self.vertices,
            self.edges,
            self.size,
            s[0],
            s[1],
            s[2],
            s[3],
            s[4],
            u8::from(self.unlock)
        )
    }

    fn counts(&self) -> CellCounts {
        CellCounts {
            vertices: self.vertices,
            edges: self.edges,
            triangles: 0,
            tetrahedra: 0,
            pentachora: self.size,
        }
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn feasible(&self, kind: MoveKind) -> Vec<Site> {
        (0..self.sites[kind.slot()])
            .map(|i| Site::new(kind, i, self.generation))
            .collect()
    }

    fn is_feasible(&self, site: &Site) -> bool {
        site.generation() == self.generation && site.face() < self.sites[site.kind().slot()]
    }

    fn commit(&mut self, site: Site) -> Result<(), MoveError> {
        if site.generation() != self.generation {
            return Err(MoveError::StaleSite {
                site: site.generation(),
                current: self.generation,
            });
        }
        let kind = site.kind();
        if site.face() >= self.sites[kind.slot()] {
            return Err(MoveError::Infeasible {
                kind,
                face: site.face(),
            });
        }
        match kind {
            MoveKind::EdgeCollapse => {
                self.sites[kind.slot()] -= 1;
                self.edges -= 1;
                self.size -= 2;
            }
            MoveKind::VertexCollapse => {
                self.sites[kind.slot()] -= 1;
                self.vertices -= 1;
                self.edges -= 4;
                self.size -= 4;
            }
            MoveKind::TriangleFlip | MoveKind::EdgeFlip => {
                if self.unlock && kind == MoveKind::TriangleFlip {
                    self.sites[MoveKind::EdgeCollapse.slot()] += 1;
                }
            }
            MoveKind::TetSubdivide => {
                self.edges += 1;
                self.size += 2;
            }
        }
        self.generation += 1;
        Ok(())
    }
}

fn cfg(height: usize, width: usize, epochs: usize) -> SearchCfg {
    SearchCfg {
        height,
        width,
        epochs,
        ..SearchCfg::default()
    }
}

fn descent_kinds() -> Vec<MoveKind> {
    MoveSchedule::default().descent
}

#[test]
fn default_cfg_matches_cli_defaults() {
    let c = SearchCfg::default();
    assert_eq!((c.height, c.width, c.epochs), (10, 30, 10));
    assert_eq!(c.selection, Selection::Deterministic);
    assert!(c.schedule.validate().is_ok());
}

#[test]
fn deterministic_selection_is_round_robin() {
    let mut sel = MoveSelector::deterministic();
    assert!(!sel.is_random());
    assert_eq!(sel.select(vec![10, 20, 30], 0).unwrap(), 10);
    assert_eq!(sel.select(vec![10, 20, 30], 4).unwrap(), 20);
    assert_eq!(sel.select(vec![10, 20, 30], 8).unwrap(), 30);
    assert_eq!(
        sel.select(Vec::<u8>::new(), 3),
        Err(SearchError::EmptyCandidateSet)
    );
}

#[test]
fn random_selection_is_reproducible_per_seed() {
    let picks = |seed| {
        let mut sel = MoveSelector::new(Selection::Random { seed });
        (0..40)
            .map(|i| sel.select((0..50).collect::<Vec<usize>>(), i).unwrap())
            .collect::<Vec<_>>()
    };
    let a = picks(7);
    assert_eq!(a, picks(7));
    assert!(a.iter().all(|&x| x < 50));
    assert_ne!(a, picks(8));
    let mut sel = MoveSelector::new(Selection::Random { seed: 1 });
    assert!(sel.is_random());
    assert_eq!(
        sel.select(Vec::<u8>::new(), 0),
        Err(SearchError::EmptyCandidateSet)
    );
}

#[test]
fn descent_runs_later_subpass_after_empty_first() {
    let toy = Toy::new(40, 30).with_sites(MoveKind::VertexCollapse, 2);
    let mut tally = MoveTally::default();
    let out = descend(toy, &descent_kinds(), &mut tally).unwrap();
    assert_eq!(tally.get(MoveKind::EdgeCollapse), 0);
    assert_eq!(tally.get(MoveKind::VertexCollapse), 2);
    assert_eq!(out.size, 22);
    assert_eq!(out.edges, 32);
    assert!(out.feasible(MoveKind::VertexCollapse).is_empty());
}

#[test]
fn descent_is_idempotent_on_toy() {
    let toy = Toy::new(40, 30)
        .with_sites(MoveKind::EdgeCollapse, 3)
        .with_sites(MoveKind::VertexCollapse, 1);
    let mut tally = MoveTally::default();
    let once = descend(toy, &descent_kinds(), &mut tally).unwrap();
    assert_eq!(tally.total(), 4);
    let mut again = MoveTally::default();
    let twice = descend(once.clone(), &descent_kinds(), &mut again).unwrap();
    assert_eq!(again.total(), 0);
    assert_eq!(twice, once);
}

#[test]
fn vertex_descent_on_boundary_of_simplex_reaches_two_pentachora() {
    let mut tally = MoveTally::default();
    let out = descend(boundary_of_simplex(), &[MoveKind::VertexCollapse], &mut tally).unwrap();
    assert_eq!(out.size(), 2);
    assert_eq!(out.signature(), two_pentachoron_sphere().signature());
    assert_eq!(tally.get(MoveKind::VertexCollapse), 1);
}

#[test]
fn full_descent_on_boundary_of_simplex_shrinks_it() {
    let mut tally = MoveTally::default();
    let out = descend(boundary_of_simplex(), &descent_kinds(), &mut tally).unwrap();
    assert!(out.size() < 6);
    assert!(tally.get(MoveKind::EdgeCollapse) >= 1);
    assert!(out.feasible(MoveKind::VertexCollapse).is_empty());
    assert_eq!(out.counts().euler_characteristic(), 2);
}

#[test]
fn lateral_search_respects_width() {
    let toy = Toy::new(20, 10).with_sites(MoveKind::TriangleFlip, 3);
    let mut tally = MoveTally::default();
    let mut sel = MoveSelector::deterministic();
    let out = lateral_search(
        toy,
        MoveKind::TriangleFlip,
        5,
        &descent_kinds(),
        &mut sel,
        &mut tally,
    )
    .unwrap();
    assert_eq!(tally.get(MoveKind::TriangleFlip), 5);
    assert_eq!(out.size, 10);
    assert_eq!(out.generation(), 5);
}

#[test]
fn lateral_search_stops_without_sites() {
    let toy = Toy::new(20, 10);
    let mut tally = MoveTally::default();
    let mut sel = MoveSelector::deterministic();
    let out = lateral_search(
        toy.clone(),
        MoveKind::EdgeFlip,
        30,
        &descent_kinds(),
        &mut sel,
        &mut tally,
    )
    .unwrap();
    assert_eq!(tally.total(), 0);
    assert_eq!(out, toy);
}

#[test]
fn lateral_search_descends_after_each_flip() {
    let toy = Toy::new(20, 10)
        .with_sites(MoveKind::TriangleFlip, 2)
        .unlocking();
    let mut tally = MoveTally::default();
    let mut sel = MoveSelector::deterministic();
    let out = lateral_search(
        toy,
        MoveKind::TriangleFlip,
        3,
        &descent_kinds(),
        &mut sel,
        &mut tally,
    )
    .unwrap();
    assert_eq!(tally.get(MoveKind::TriangleFlip), 3);
    assert_eq!(tally.get(MoveKind::EdgeCollapse), 3);
    assert_eq!(out.size, 4);
    assert!(out.feasible(MoveKind::EdgeCollapse).is_empty());
}

#[test]
fn perturb_respects_height() {
    let toy = Toy::new(20, 10).with_sites(MoveKind::TetSubdivide, 5);
    let mut tally = MoveTally::default();
    let mut sel = MoveSelector::deterministic();
    let out = perturb(toy, &cfg(4, 30, 10), &mut sel, &mut tally).unwrap();
    assert_eq!(tally.get(MoveKind::TetSubdivide), 4);
    assert_eq!(out.size, 18);
    assert_eq!(out.edges, 24);
}

#[test]
fn perturb_without_subdivision_sites_is_fatal() {
    let toy = Toy::new(20, 10);
    let mut sel = MoveSelector::deterministic();
    let mut tally = MoveTally::default();
    assert!(perturb(toy.clone(), &cfg(0, 30, 10), &mut sel, &mut tally).is_ok());
    let err = perturb(toy, &cfg(1, 30, 10), &mut sel, &mut tally).unwrap_err();
    assert!(matches!(err, SearchError::InvariantViolation { .. }));
}

#[test]
fn epochs_without_improvement_report_only_the_final_pass() {
    let input = Toy::new(20, 10)
        .with_sites(MoveKind::TetSubdivide, 3)
        .signature();
    let mut seen = 0;
    let summary = simplify::<Toy, _>(&input, &cfg(2, 4, 3), |_| seen += 1).unwrap();
    assert_eq!(seen, 0);
    assert!(summary.improvements.is_empty());
    let fin = &summary.final_report;
    // Two epochs of two subdivisions each, each epoch starting where the
    // previous one ended.
    assert_eq!(fin.edges, 24);
    assert_eq!(fin.size, 18);
    assert_eq!(fin.original_edges, 20);
    assert!(!fin.improved);
    assert_eq!(fin.tally.get(MoveKind::TetSubdivide), 4);
}

#[test]
fn improving_epochs_are_reported_as_they_finish() {
    let input = Toy::new(20, 10)
        .with_sites(MoveKind::EdgeCollapse, 3)
        .with_sites(MoveKind::TetSubdivide, 1)
        .signature();
    let mut streamed = Vec::new();
    let summary =
        simplify::<Toy, _>(&input, &cfg(1, 0, 3), |r| streamed.push(r.epoch)).unwrap();
    assert_eq!(streamed, vec![1, 2]);
    let first = &summary.improvements[0];
    assert_eq!(first.edges_before, 17);
    assert_eq!(first.edges_after, 18);
    assert_eq!(first.tally.get(MoveKind::EdgeCollapse), 3);
    let second = &summary.improvements[1];
    assert_eq!(second.edges_before, 18);
    assert_eq!(second.edges_after, 19);
    assert_eq!(summary.final_report.edges, 19);
    assert!(summary.final_report.improved);
}

#[test]
fn single_epoch_is_one_descent() {
    let input = boundary_of_simplex().signature();
    let summary = simplify::<Triangulation4, _>(&input, &cfg(0, 0, 1), |_| {}).unwrap();
    assert!(summary.improvements.is_empty());
    let fin = &summary.final_report;
    let mut tally = MoveTally::default();
    let expected = descend(
        Triangulation4::from_signature(&input).unwrap(),
        &descent_kinds(),
        &mut tally,
    )
    .unwrap();
    assert_eq!(fin.signature, expected.signature());
    assert_eq!(fin.original_edges, 15);
    assert_eq!(fin.edges, expected.counts().edges);
    // Every collapse removes at least one edge.
    assert!(fin.edges < 15);
    assert!(fin.improved);
    assert_eq!(fin.tally, tally);
}

#[test]
fn report_lines_follow_the_text_format() {
    let input = Toy::new(20, 10)
        .with_sites(MoveKind::EdgeCollapse, 2)
        .with_sites(MoveKind::TetSubdivide, 1)
        .signature();
    let summary = simplify::<Toy, _>(&input, &cfg(0, 0, 2), |_| {}).unwrap();
    let line = summary.improvements[0].to_string();
    let mut parts = line.lines();
    assert_eq!(parts.next(), Some(summary.improvements[0].signature.as_str()));
    assert!(parts.next().unwrap().starts_with("1 | 6, 18 -> 18, 6 | "));
    let fin = summary.final_report.to_string();
    assert!(fin.ends_with("\nEnd | 6, 20 -> 18, 6"));
}

#[test]
fn deterministic_runs_are_identical() {
    let input = subdivided(two_pentachoron_sphere(), &[0, 3, 1, 4]).signature();
    let c = cfg(2, 3, 3);
    let run = || simplify::<Triangulation4, _>(&input, &c, |_| {}).unwrap();
    let (a, b) = (run(), run());
    assert_eq!(a.final_report, b.final_report);
    let key = |r: &EpochReport| (r.signature.clone(), r.epoch, r.edges_before, r.edges_after);
    assert_eq!(
        a.improvements.iter().map(key).collect::<Vec<_>>(),
        b.improvements.iter().map(key).collect::<Vec<_>>()
    );
    let back = Triangulation4::from_signature(&a.final_report.signature).unwrap();
    assert_eq!(back.counts().euler_characteristic(), 2);
    assert_eq!(back.size(), a.final_report.size);
}

#[test]
fn random_runs_repeat_for_the_same_seed() {
    let input = subdivided(boundary_of_simplex(), &[2, 7]).signature();
    let c = SearchCfg {
        selection: Selection::Random { seed: 42 },
        ..cfg(2, 2, 2)
    };
    let a = simplify::<Triangulation4, _>(&input, &c, |_| {}).unwrap();
    let b = simplify::<Triangulation4, _>(&input, &c, |_| {}).unwrap();
    assert_eq!(a.final_report, b.final_report);
}

#[test]
fn bad_input_and_bad_schedule_are_rejected() {
    let err = simplify::<Triangulation4, _>("", &SearchCfg::default(), |_| {}).unwrap_err();
    assert_eq!(err, SearchError::Signature(SignatureError::Empty));
    let mut c = SearchCfg::default();
    c.schedule.lateral.push(MoveKind::EdgeCollapse);
    let sig = boundary_of_simplex().signature();
    let err = simplify::<Triangulation4, _>(&sig, &c, |_| {}).unwrap_err();
    assert!(matches!(err, SearchError::InvalidConfig { .. }));
}

#[test]
fn reports_serialize_with_kind_labels() {
    let mut tally = MoveTally::default();
    tally.record(MoveKind::TriangleFlip);
    tally.record(MoveKind::TriangleFlip);
    let json = serde_json::to_value(tally).unwrap();
    assert_eq!(json["3-3"], 2);
    assert_eq!(json["2-4"], 0);
    let cfg_json = serde_json::to_value(SearchCfg::default()).unwrap();
    assert_eq!(cfg_json["selection"]["mode"], "deterministic");
    assert_eq!(cfg_json["schedule"]["perturb"], "tet_subdivide");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn lateral_search_never_grows(
        picks in prop::collection::vec(0usize..64, 0..5),
        width in 0usize..5,
        flip in prop::bool::ANY,
    ) {
        let t = subdivided(boundary_of_simplex(), &picks);
        let before = t.size();
        let kind = if flip { MoveKind::TriangleFlip } else { MoveKind::EdgeFlip };
        let mut tally = MoveTally::default();
        let mut sel = MoveSelector::deterministic();
        let out = lateral_search(t, kind, width, &descent_kinds(), &mut sel, &mut tally).unwrap();
        prop_assert!(out.size() <= before);
        prop_assert!(tally.get(kind) as usize <= width);
        prop_assert_eq!(out.counts().euler_characteristic(), 2);
    }

    #[test]
    fn single_kind_descent_is_idempotent(picks in prop::collection::vec(0usize..64, 0..6)) {
        let t = subdivided(two_pentachoron_sphere(), &picks);
        let kinds = [MoveKind::EdgeCollapse];
        let mut tally = MoveTally::default();
        let once = descend(t, &kinds, &mut tally).unwrap();
        let sig = once.signature();
        let mut again = MoveTally::default();
        let twice = descend(once, &kinds, &mut again).unwrap();
        prop_assert_eq!(again.total(), 0);
        prop_assert_eq!(twice.signature(), sig);
    }

    #[test]
    fn full_descent_is_idempotent(picks in prop::collection::vec(0usize..64, 0..6)) {
        let t = subdivided(boundary_of_simplex(), &picks);
        let mut tally = MoveTally::default();
        let once = descend(t, &descent_kinds(), &mut tally).unwrap();
        let sig = once.signature();
        let mut again = MoveTally::default();
        let twice = descend(once, &descent_kinds(), &mut again).unwrap();
        prop_assert_eq!(again.total(), 0);
        prop_assert_eq!(twice.signature(), sig);
    }
}
