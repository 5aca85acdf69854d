//! Standard triangulations used as inputs in tests, benches and examples.
//!
//! - `boundary_of_simplex`: the boundary of the 5-simplex, six pentachora.
//! - `two_pentachoron_sphere`: two pentachora glued by the identity along all
//!   five facets; the smallest 4-sphere reachable by the moves here.
//! - `subdivided`: grow any triangulation by a scripted run of 2-4 moves.

use crate::structure::{MoveKind, Structure};

use super::perm::Perm5;
use super::types::Triangulation4;

/// Boundary of the 5-simplex (standard 4-sphere; 6 vertices, 15 edges).
pub fn boundary_of_simplex() -> Triangulation4 {
    // Pentachoron i holds the labels 0..6 except i, numbered in increasing order.
    let local = |omitted: usize, label: usize| -> usize {
        if label < omitted {
            label
        } else {
            label - 1
        }
    };
    let label = |omitted: usize, v: usize| -> usize {
        if v < omitted {
            v
        } else {
            v + 1
        }
    };
    let mut tri = Triangulation4::with_size(6);
    for i in 0..6 {
        for j in (i + 1)..6 {
            let mut images = [0u8; 5];
            for (v, slot) in images.iter_mut().enumerate() {
                let l = label(i, v);
                let target = if l == j { i } else { l };
                *slot = local(j, target) as u8;
            }
            let joined = tri.join(i, local(i, j), j, Perm5::from_images_trusted(images));
            debug_assert!(joined);
        }
    }
    tri
}

/// Two pentachora glued facet to facet by the identity.
pub fn two_pentachoron_sphere() -> Triangulation4 {
    let mut tri = Triangulation4::with_size(2);
    for f in 0..5 {
        let joined = tri.join(0, f, 1, Perm5::IDENTITY);
        debug_assert!(joined);
    }
    tri
}

/// Apply one 2-4 move per entry of `picks`, each at `sites[pick % len]`.
///
/// Stops early if no tetrahedron admits a 2-4 move.
pub fn subdivided(mut tri: Triangulation4, picks: &[usize]) -> Triangulation4 {
    for &pick in picks {
        let sites = tri.feasible(MoveKind::TetSubdivide);
        if sites.is_empty() {
            break;
        }
        let site = sites[pick % sites.len()];
        if tri.commit(site).is_err() {
            break;
        }
    }
    tri
}
