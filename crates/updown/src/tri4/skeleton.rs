//! Face classes (vertices, edges, triangles, tetrahedra) from facet gluings.
//!
//! Algorithm
//! - A k-face of a pentachoron is a vertex mask with k+1 bits set.
//! - Every facet gluing identifies the faces it contains on both sides; a
//!   union-find over `(pentachoron, mask)` pairs yields the classes.
//! - Classes are numbered by their first embedding in `(pentachoron, mask)`
//!   order, which makes face indices deterministic for a given labelling.

use std::collections::HashMap;

use super::types::Triangulation4;

/// Vertex masks of `dim`-faces of one pentachoron, in increasing order.
pub(crate) fn face_masks(dim: usize) -> Vec<u8> {
    (0u8..32)
        .filter(|m| m.count_ones() as usize == dim + 1)
        .collect()
}

/// One face class with its first embedding and number of embeddings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub simplex: usize,
    pub mask: u8,
    pub degree: usize,
}

/// Face classes of dimensions 0 to 3.
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    faces: [Vec<Face>; 4],
}

impl Skeleton {
    pub fn build(tri: &Triangulation4) -> Self {
        let mut faces: [Vec<Face>; 4] = Default::default();
        for (dim, slot) in faces.iter_mut().enumerate() {
            *slot = face_classes(tri, dim);
        }
        Self { faces }
    }

    /// Faces of dimension `dim` (0..=3); empty for other dimensions.
    pub fn faces(&self, dim: usize) -> &[Face] {
        self.faces.get(dim).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn count(&self, dim: usize) -> usize {
        self.faces(dim).len()
    }
}

fn face_classes(tri: &Triangulation4, dim: usize) -> Vec<Face> {
    let masks = face_masks(dim);
    let mut uf = UnionFind::new(tri.len() * 32);
    for (s, p) in tri.pents.iter().enumerate() {
        for (f, g) in p.adj.iter().enumerate() {
            let Some(g) = g else { continue };
            for &m in &masks {
                if m & (1 << f) != 0 {
                    continue;
                }
                uf.union(s * 32 + m as usize, g.simplex * 32 + g.perm.map_mask(m) as usize);
            }
        }
    }
    let mut class_of_root: HashMap<usize, usize> = HashMap::new();
    let mut out: Vec<Face> = Vec::new();
    for s in 0..tri.len() {
        for &m in &masks {
            let root = uf.find(s * 32 + m as usize);
            match class_of_root.get(&root) {
                Some(&c) => out[c].degree += 1,
                None => {
                    class_of_root.insert(root, out.len());
                    out.push(Face {
                        simplex: s,
                        mask: m,
                        degree: 1,
                    });
                }
            }
        }
    }
    out
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
