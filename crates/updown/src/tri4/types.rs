//! Core types: pentachora and their facet gluings.

use super::perm::Perm5;

/// Gluing of a facet onto a facet of `simplex`; vertex `i` maps to `perm.apply(i)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gluing {
    pub simplex: usize,
    pub perm: Perm5,
}

/// One pentachoron; `adj[f]` describes the facet opposite vertex `f`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pentachoron {
    pub adj: [Option<Gluing>; 5],
}

/// Generalized 4-dimensional triangulation (faces of one pentachoron may be
/// identified with each other).
///
/// Invariants:
/// - Gluings are symmetric: facet `f` of `s` glued to `(d, p)` implies facet
///   `p(f)` of `d` glued to `(s, p⁻¹)`.
/// - No facet is glued to itself.
/// - `generation` increases on every committed move; it is not part of the
///   combinatorial identity.
#[derive(Clone, Debug, Default)]
pub struct Triangulation4 {
    pub(crate) pents: Vec<Pentachoron>,
    pub(crate) generation: u64,
}

impl PartialEq for Triangulation4 {
    fn eq(&self, other: &Self) -> bool {
        self.pents == other.pents
    }
}

impl Eq for Triangulation4 {}

impl Triangulation4 {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// `n` pentachora with every facet unglued.
    pub fn with_size(n: usize) -> Self {
        Self {
            pents: vec![Pentachoron::default(); n],
            generation: 0,
        }
    }

    /// Number of pentachora.
    #[inline]
    pub fn len(&self) -> usize {
        self.pents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pents.is_empty()
    }

    #[inline]
    pub fn gluing(&self, simplex: usize, facet: usize) -> Option<Gluing> {
        self.pents.get(simplex).and_then(|p| p.adj[facet])
    }

    /// Glue facet `facet` of `simplex` to facet `perm(facet)` of `dest`.
    ///
    /// Returns `false` (and changes nothing) if an index is out of range, a
    /// facet is already glued, or the two facets coincide.
    pub fn join(&mut self, simplex: usize, facet: usize, dest: usize, perm: Perm5) -> bool {
        if simplex >= self.pents.len() || dest >= self.pents.len() || facet >= 5 {
            return false;
        }
        let dest_facet = perm.apply(facet);
        if simplex == dest && facet == dest_facet {
            return false;
        }
        if self.pents[simplex].adj[facet].is_some() || self.pents[dest].adj[dest_facet].is_some() {
            return false;
        }
        self.pents[simplex].adj[facet] = Some(Gluing {
            simplex: dest,
            perm,
        });
        self.pents[dest].adj[dest_facet] = Some(Gluing {
            simplex,
            perm: perm.inverse(),
        });
        true
    }

    /// True when no facet is left unglued.
    pub fn is_closed(&self) -> bool {
        self.pents.iter().all(|p| p.adj.iter().all(Option::is_some))
    }

    /// Check the symmetry invariant of every gluing.
    pub fn gluings_consistent(&self) -> bool {
        for (s, p) in self.pents.iter().enumerate() {
            for (f, g) in p.adj.iter().enumerate() {
                let Some(g) = g else { continue };
                let df = g.perm.apply(f);
                if g.simplex == s && df == f {
                    return false;
                }
                match self.gluing(g.simplex, df) {
                    Some(back) if back.simplex == s && back.perm == g.perm.inverse() => {}
                    _ => return false,
                }
            }
        }
        true
    }

    /// Drop the listed pentachora and renumber the rest, keeping order.
    ///
    /// Callers must have detached every gluing between kept and removed
    /// pentachora first; gluings that still point at removed ones are cleared.
    pub(crate) fn remove_pentachora(&mut self, removed: &[usize]) {
        let mut new_index: Vec<Option<usize>> = Vec::with_capacity(self.pents.len());
        let mut next = 0;
        for i in 0..self.pents.len() {
            if removed.contains(&i) {
                new_index.push(None);
            } else {
                new_index.push(Some(next));
                next += 1;
            }
        }
        let old = std::mem::take(&mut self.pents);
        self.pents = old
            .into_iter()
            .enumerate()
            .filter(|(i, _)| new_index[*i].is_some())
            .map(|(_, mut p)| {
                for slot in p.adj.iter_mut() {
                    *slot = slot.and_then(|g| {
                        new_index[g.simplex].map(|simplex| Gluing {
                            simplex,
                            perm: g.perm,
                        })
                    });
                }
                p
            })
            .collect();
    }
}
