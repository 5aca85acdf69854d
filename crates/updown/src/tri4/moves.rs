//! Move families and the `Structure` implementation for `Triangulation4`.
//!
//! - 4-2, 5-1, 3-3 and 2-4 are plain Pachner moves about an edge, vertex,
//!   triangle and tetrahedron (see `pachner`).
//! - 4-4 about a degree-4 edge is a 2-4 move on one of the edge's tetrahedra
//!   followed by a 4-2 move about the same edge. The tetrahedra of the
//!   representative pentachoron are tried in vertex order; the first pair of
//!   feasible moves wins.

use crate::error::{MoveError, SignatureError};
use crate::structure::{CellCounts, MoveKind, Site, Structure};

use super::isosig;
use super::pachner::{labelled_star, replace_star, Star};
use super::skeleton::{Face, Skeleton};
use super::types::Triangulation4;

/// Worked-out move, ready to apply.
enum Plan {
    Pachner(Star),
    Rebuilt(Triangulation4),
}

/// Face degree a feasible move of `kind` requires.
fn required_degree(kind: MoveKind) -> usize {
    match kind {
        MoveKind::TetSubdivide => 2,
        MoveKind::TriangleFlip => 3,
        MoveKind::EdgeCollapse | MoveKind::EdgeFlip => 4,
        MoveKind::VertexCollapse => 5,
    }
}

impl Triangulation4 {
    pub fn skeleton(&self) -> Skeleton {
        Skeleton::build(self)
    }

    fn plan(&self, kind: MoveKind, face: &Face) -> Option<Plan> {
        if face.degree != required_degree(kind) {
            return None;
        }
        match kind {
            MoveKind::EdgeFlip => self.four_four(face).map(Plan::Rebuilt),
            _ => labelled_star(self, face.simplex, face.mask).map(Plan::Pachner),
        }
    }

    fn four_four(&self, edge: &Face) -> Option<Triangulation4> {
        for v in 0..5u8 {
            if edge.mask & (1 << v) != 0 {
                continue;
            }
            let tet_mask = 0b11111 & !(1u8 << v);
            let Some(tet_star) = labelled_star(self, edge.simplex, tet_mask) else {
                continue;
            };
            // The tetrahedron's vertices carry labels 0..4 in local order.
            let label_of = |bit: u8| (tet_mask & ((1u8 << bit) - 1)).count_ones() as usize;
            let mut ends = (0..5u8).filter(|&b| edge.mask & (1 << b) != 0).map(label_of);
            let (Some(la), Some(lb)) = (ends.next(), ends.next()) else {
                continue;
            };
            let mut trial = self.clone();
            let created = replace_star(&mut trial, &tet_star);
            let Some(host) = created
                .iter()
                .find(|c| c.omitted != la && c.omitted != lb)
            else {
                continue;
            };
            let mask = (1u8 << host.map[la]) | (1u8 << host.map[lb]);
            if let Some(edge_star) = labelled_star(&trial, host.simplex, mask) {
                replace_star(&mut trial, &edge_star);
                return Some(trial);
            }
        }
        None
    }

    fn face_for(&self, skeleton: &Skeleton, site: &Site) -> Option<Face> {
        skeleton
            .faces(site.kind().face_dim())
            .get(site.face())
            .copied()
    }
}

impl Structure for Triangulation4 {
    fn from_signature(sig: &str) -> Result<Self, SignatureError> {
        isosig::decode(sig)
    }

    fn signature(&self) -> String {
        isosig::encode(self)
    }

    fn counts(&self) -> CellCounts {
        let sk = self.skeleton();
        CellCounts {
            vertices: sk.count(0),
            edges: sk.count(1),
            triangles: sk.count(2),
            tetrahedra: sk.count(3),
            pentachora: self.len(),
        }
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn feasible(&self, kind: MoveKind) -> Vec<Site> {
        let sk = self.skeleton();
        sk.faces(kind.face_dim())
            .iter()
            .enumerate()
            .filter(|(_, face)| self.plan(kind, face).is_some())
            .map(|(i, _)| Site::new(kind, i, self.generation))
            .collect()
    }

    fn is_feasible(&self, site: &Site) -> bool {
        if site.generation() != self.generation {
            return false;
        }
        let sk = self.skeleton();
        self.face_for(&sk, site)
            .is_some_and(|face| self.plan(site.kind(), &face).is_some())
    }

    fn commit(&mut self, site: Site) -> Result<(), MoveError> {
        if site.generation() != self.generation {
            return Err(MoveError::StaleSite {
                site: site.generation(),
                current: self.generation,
            });
        }
        let kind = site.kind();
        let sk = self.skeleton();
        let face = self
            .face_for(&sk, &site)
            .ok_or(MoveError::UnknownFace {
                kind,
                face: site.face(),
            })?;
        let plan = self.plan(kind, &face).ok_or(MoveError::Infeasible {
            kind,
            face: site.face(),
        })?;
        match plan {
            Plan::Pachner(star) => {
                replace_star(self, &star);
            }
            Plan::Rebuilt(next) => self.pents = next.pents,
        }
        self.generation += 1;
        debug_assert!(self.gluings_consistent());
        Ok(())
    }
}
