//! Pachner moves through labelled stars.
//!
//! Model
//! - Label the six vertices of a 5-simplex `0..6` and split them into
//!   `A = 0..a` (the face the move is about) and `B = a..6`.
//! - Before the move the face's star is `σ_A * ∂σ_B`: one pentachoron per
//!   label `y ∈ B`, holding every label except `y`.
//! - After the move it is `∂σ_A * σ_B`: one pentachoron per label `x ∈ A`.
//! - Both have boundary `∂σ_A * ∂σ_B`; the facet missing labels `{x, y}` sits
//!   opposite `x` in the old pentachoron `y` and opposite `y` in the new
//!   pentachoron `x`, so every external gluing transfers one to one.
//!
//! Feasibility is exactly "the star really has this shape": the `6 − a`
//! pentachora are distinct and every facet between them is glued the way the
//! labels dictate. That also forces the face to be interior and of degree
//! `6 − a`.

use super::perm::Perm5;
use super::types::{Gluing, Pentachoron, Triangulation4};

pub(crate) const NO_VERTEX: u8 = u8::MAX;

/// Label → local vertex of one pentachoron; the omitted label holds `NO_VERTEX`.
pub(crate) type LabelMap = [u8; 6];

/// One pentachoron of a labelled star (before or after a move).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Labelled {
    pub omitted: usize,
    pub simplex: usize,
    pub map: LabelMap,
}

/// Star of an `a`-vertex face; `members[i]` omits label `a + i`.
#[derive(Clone, Debug)]
pub(crate) struct Star {
    pub a: usize,
    pub members: Vec<Labelled>,
}

/// Local vertex → label.
pub(crate) fn labels_of(map: &LabelMap) -> [u8; 5] {
    let mut inv = [NO_VERTEX; 5];
    for (l, &v) in map.iter().enumerate() {
        if v != NO_VERTEX {
            inv[v as usize] = l as u8;
        }
    }
    inv
}

/// Labels of every vertex except `omitted`, numbered in increasing order.
fn sorted_map(omitted: usize) -> LabelMap {
    let mut map = [NO_VERTEX; 6];
    let mut next = 0u8;
    for (l, slot) in map.iter_mut().enumerate() {
        if l != omitted {
            *slot = next;
            next += 1;
        }
    }
    map
}

/// Labelled star about the face `mask` of pentachoron `simplex`.
///
/// The face's vertices take labels `0..a` in increasing local order, the
/// remaining local vertices take `a..5`, and `simplex` omits label 5.
/// Returns `None` unless the move about this face is feasible.
pub(crate) fn labelled_star(tri: &Triangulation4, simplex: usize, mask: u8) -> Option<Star> {
    let a = mask.count_ones() as usize;
    if a == 0 || a > 5 || mask >= 32 || simplex >= tri.len() {
        return None;
    }
    let b = 6 - a;
    let mut map0 = [NO_VERTEX; 6];
    let mut next = 0;
    for inside in [true, false] {
        for v in 0..5u8 {
            if (mask & (1 << v) != 0) == inside {
                map0[next] = v;
                next += 1;
            }
        }
    }

    let mut slots: Vec<Option<(usize, LabelMap)>> = vec![None; b];
    slots[b - 1] = Some((simplex, map0));
    let mut queue = vec![5usize];
    while let Some(y) = queue.pop() {
        let (s, map) = slots[y - a]?;
        for y2 in a..6 {
            if y2 == y {
                continue;
            }
            let g = tri.gluing(s, map[y2] as usize)?;
            let mut expected = [NO_VERTEX; 6];
            for (l, slot) in expected.iter_mut().enumerate() {
                if l == y2 {
                    continue;
                }
                let local = if l == y { map[y2] } else { map[l] };
                *slot = g.perm.apply(local as usize) as u8;
            }
            match slots[y2 - a] {
                Some((d, m)) => {
                    if d != g.simplex || m != expected {
                        return None;
                    }
                }
                None => {
                    if slots.iter().flatten().any(|(d, _)| *d == g.simplex) {
                        return None;
                    }
                    slots[y2 - a] = Some((g.simplex, expected));
                    queue.push(y2);
                }
            }
        }
    }

    let members = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.map(|(simplex, map)| Labelled {
                omitted: a + i,
                simplex,
                map,
            })
        })
        .collect::<Option<Vec<_>>>()?;
    Some(Star { a, members })
}

/// Replace a feasible star by `a` new pentachora and drop the old ones.
///
/// Returns the new pentachora with their label maps; indices are valid in the
/// triangulation after the call.
pub(crate) fn replace_star(tri: &mut Triangulation4, star: &Star) -> Vec<Labelled> {
    let a = star.a;
    let base = tri.len();
    let maps: Vec<LabelMap> = (0..a).map(sorted_map).collect();
    let labels: Vec<[u8; 5]> = maps.iter().map(labels_of).collect();
    tri.pents
        .extend(std::iter::repeat(Pentachoron::default()).take(a));

    // New pentachora x and x2 meet along the facet missing {x, x2}.
    for x in 0..a {
        for x2 in (x + 1)..a {
            let mut images = [0u8; 5];
            for (v, slot) in images.iter_mut().enumerate() {
                let l = labels[x][v] as usize;
                let target = if l == x2 { x } else { l };
                *slot = maps[x2][target];
            }
            let perm = Perm5::from_images_trusted(images);
            tri.pents[base + x].adj[maps[x][x2] as usize] = Some(Gluing {
                simplex: base + x2,
                perm,
            });
            tri.pents[base + x2].adj[maps[x2][x] as usize] = Some(Gluing {
                simplex: base + x,
                perm: perm.inverse(),
            });
        }
    }

    // External facets: old pentachoron y, facet opposite x becomes new
    // pentachoron x, facet opposite y.
    for member in &star.members {
        let y = member.omitted;
        for x in 0..a {
            let old_facet = member.map[x] as usize;
            let new_facet = maps[x][y] as usize;
            let Some(g) = tri.pents[member.simplex].adj[old_facet] else {
                tri.pents[base + x].adj[new_facet] = None;
                continue;
            };
            let old_local = |v: usize| -> usize {
                let l = labels[x][v] as usize;
                if l == y {
                    old_facet
                } else {
                    member.map[l] as usize
                }
            };
            let partner = star.members.iter().find(|m| m.simplex == g.simplex);
            if let Some(other) = partner {
                let other_labels = labels_of(&other.map);
                let x2 = other_labels[g.perm.apply(old_facet)] as usize;
                debug_assert!(x2 < a, "external facet glued to an internal one");
                let mut images = [0u8; 5];
                for (v, slot) in images.iter_mut().enumerate() {
                    let l = other_labels[g.perm.apply(old_local(v))] as usize;
                    let target = if l == x2 { other.omitted } else { l };
                    *slot = maps[x2][target];
                }
                tri.pents[base + x].adj[new_facet] = Some(Gluing {
                    simplex: base + x2,
                    perm: Perm5::from_images_trusted(images),
                });
            } else {
                let mut images = [0u8; 5];
                for (v, slot) in images.iter_mut().enumerate() {
                    *slot = g.perm.apply(old_local(v)) as u8;
                }
                let perm = Perm5::from_images_trusted(images);
                tri.pents[base + x].adj[new_facet] = Some(Gluing {
                    simplex: g.simplex,
                    perm,
                });
                tri.pents[g.simplex].adj[g.perm.apply(old_facet)] = Some(Gluing {
                    simplex: base + x,
                    perm: perm.inverse(),
                });
            }
        }
    }

    let removed: Vec<usize> = star.members.iter().map(|m| m.simplex).collect();
    tri.remove_pentachora(&removed);
    let shift = removed.len();
    maps.into_iter()
        .enumerate()
        .map(|(x, map)| Labelled {
            omitted: x,
            simplex: base + x - shift,
            map,
        })
        .collect()
}
