//! Canonical isomorphism signatures.
//!
//! Layout (per connected component)
//! - Size header: one character when `n < 63`; otherwise the value 63, a
//!   width `w`, and `n` in `w` characters.
//! - Facet actions in labelling order, three per character (2 bits each):
//!   0 = unglued, 1 = glued by the identity to the next unused pentachoron,
//!   2 = glued to a pentachoron that already has a label.
//! - For each action 2, its destination (`w` characters; `w = 1` when `n < 63`).
//! - For each action 2, its gluing permutation index (two characters).
//!
//! Numbers are little-endian base 64 over `a-z A-Z 0-9 + -`. A component's
//! signature is the least encoding over every starting pentachoron and every
//! relabelling of its vertices; component signatures are sorted and
//! concatenated. Decoding accepts any well-formed encoding, canonical or not.

use crate::error::SignatureError;

use super::perm::Perm5;
use super::types::{Pentachoron, Triangulation4};

const ALPHABET: &[u8; 64] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+-";
const PERM_CHARS: usize = 2;
/// Widest number field whose 6-bit digits fit in a `usize`.
const MAX_WIDTH: usize = (usize::BITS / 6) as usize;
const UNSEEN: usize = usize::MAX;

#[inline]
fn sig_char(v: usize) -> u8 {
    ALPHABET[v & 0x3f]
}

fn sig_value(c: u8) -> Option<usize> {
    match c {
        b'a'..=b'z' => Some((c - b'a') as usize),
        b'A'..=b'Z' => Some((c - b'A') as usize + 26),
        b'0'..=b'9' => Some((c - b'0') as usize + 52),
        b'+' => Some(62),
        b'-' => Some(63),
        _ => None,
    }
}

fn push_number(out: &mut Vec<u8>, mut v: usize, width: usize) {
    for _ in 0..width {
        out.push(sig_char(v));
        v >>= 6;
    }
}

/// Writes the size header and returns the width used for destinations.
fn push_header(out: &mut Vec<u8>, n: usize) -> usize {
    if n < 63 {
        out.push(sig_char(n));
        return 1;
    }
    let mut width = 0;
    let mut rest = n;
    while rest > 0 {
        rest >>= 6;
        width += 1;
    }
    out.push(sig_char(63));
    out.push(sig_char(width));
    push_number(out, n, width);
    width
}

/// Canonical signature of `tri`.
pub fn encode(tri: &Triangulation4) -> String {
    if tri.is_empty() {
        return char::from(sig_char(0)).to_string();
    }
    let mut sigs: Vec<Vec<u8>> = components(tri)
        .iter()
        .map(|comp| encode_component(tri, comp))
        .collect();
    sigs.sort();
    sigs.concat().into_iter().map(char::from).collect()
}

fn components(tri: &Triangulation4) -> Vec<Vec<usize>> {
    let mut seen = vec![false; tri.len()];
    let mut out = Vec::new();
    for root in 0..tri.len() {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut comp = vec![root];
        let mut i = 0;
        while i < comp.len() {
            let s = comp[i];
            for g in tri.pents[s].adj.iter().flatten() {
                if !seen[g.simplex] {
                    seen[g.simplex] = true;
                    comp.push(g.simplex);
                }
            }
            i += 1;
        }
        out.push(comp);
    }
    out
}

fn encode_component(tri: &Triangulation4, comp: &[usize]) -> Vec<u8> {
    let mut best: Option<Vec<u8>> = None;
    for &start in comp {
        for labelling in Perm5::all() {
            let candidate = encode_from(tri, start, labelling, comp.len());
            if best.as_ref().map_or(true, |b| candidate < *b) {
                best = Some(candidate);
            }
        }
    }
    best.unwrap_or_default()
}

/// Encoding with `start` as pentachoron 0 and its vertices relabelled by `p0`.
fn encode_from(tri: &Triangulation4, start: usize, p0: Perm5, n: usize) -> Vec<u8> {
    let mut image = vec![UNSEEN; tri.len()];
    let mut vmap = vec![Perm5::IDENTITY; tri.len()];
    let mut order = Vec::with_capacity(n);
    image[start] = 0;
    vmap[start] = p0;
    order.push(start);

    let mut actions: Vec<u8> = Vec::with_capacity(5 * n);
    let mut dests: Vec<usize> = Vec::new();
    let mut perms: Vec<Perm5> = Vec::new();
    let mut cur = 0;
    while cur < order.len() {
        let s = order[cur];
        let inv = vmap[s].inverse();
        for f_new in 0..5 {
            let f = inv.apply(f_new);
            let Some(g) = tri.pents[s].adj[f] else {
                actions.push(0);
                continue;
            };
            let d = g.simplex;
            if image[d] == UNSEEN {
                image[d] = order.len();
                order.push(d);
                vmap[d] = vmap[s].compose(g.perm.inverse());
                actions.push(1);
                continue;
            }
            let dest_facet = vmap[d].apply(g.perm.apply(f));
            if image[d] < cur || (image[d] == cur && dest_facet < f_new) {
                continue;
            }
            actions.push(2);
            dests.push(image[d]);
            perms.push(vmap[d].compose(g.perm).compose(inv));
        }
        cur += 1;
    }

    let mut out = Vec::with_capacity(2 + actions.len() / 3 + dests.len() * 3);
    let width = push_header(&mut out, n);
    for chunk in actions.chunks(3) {
        let packed = chunk
            .iter()
            .enumerate()
            .fold(0usize, |acc, (i, &a)| acc | ((a as usize) << (2 * i)));
        out.push(sig_char(packed));
    }
    for &d in &dests {
        push_number(&mut out, d, width);
    }
    for p in &perms {
        push_number(&mut out, p.index(), PERM_CHARS);
    }
    out
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
}

impl Reader<'_> {
    fn done(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn remaining(&self) -> usize {
        self.text.len().saturating_sub(self.pos)
    }

    fn value(&mut self) -> Result<usize, SignatureError> {
        let &c = self
            .text
            .as_bytes()
            .get(self.pos)
            .ok_or(SignatureError::Truncated)?;
        let v = sig_value(c).ok_or_else(|| SignatureError::InvalidChar {
            pos: self.pos,
            ch: self.text[self.pos..].chars().next().unwrap_or('?'),
        })?;
        self.pos += 1;
        Ok(v)
    }

    fn number(&mut self, width: usize) -> Result<usize, SignatureError> {
        let mut v = 0;
        for i in 0..width {
            v |= self.value()? << (6 * i);
        }
        Ok(v)
    }
}

/// Rebuild a triangulation from any well-formed signature.
pub fn decode(sig: &str) -> Result<Triangulation4, SignatureError> {
    if sig.is_empty() {
        return Err(SignatureError::Empty);
    }
    let mut reader = Reader { text: sig, pos: 0 };
    let mut tri = Triangulation4::new();
    while !reader.done() {
        decode_component(&mut reader, &mut tri)?;
    }
    Ok(tri)
}

fn decode_component(r: &mut Reader<'_>, tri: &mut Triangulation4) -> Result<(), SignatureError> {
    let first = r.value()?;
    let (n, width) = if first < 63 {
        (first, 1)
    } else {
        let width = r.value()?;
        if width == 0 {
            return Err(SignatureError::malformed("zero-width size field"));
        }
        if width > MAX_WIDTH {
            return Err(SignatureError::malformed("size field wider than a machine word"));
        }
        (r.number(width)?, width)
    };
    if n == 0 {
        return Ok(());
    }

    // One character packs at most three actions covering six facets.
    let total = n.checked_mul(5).ok_or(SignatureError::Truncated)?;
    if r.remaining().saturating_mul(6) < total {
        return Err(SignatureError::Truncated);
    }
    let mut actions: Vec<usize> = Vec::with_capacity(total);
    let mut used = 0;
    while used < total {
        let packed = r.value()?;
        for i in 0..3 {
            if used >= total {
                break;
            }
            let action = (packed >> (2 * i)) & 3;
            used += match action {
                0 => 1,
                1 | 2 => 2,
                _ => return Err(SignatureError::malformed("unknown facet action")),
            };
            actions.push(action);
        }
    }
    if used != total {
        return Err(SignatureError::malformed("facet actions overrun the facets"));
    }
    let joins = actions.iter().filter(|&&a| a == 2).count();
    let dests = (0..joins)
        .map(|_| r.number(width))
        .collect::<Result<Vec<_>, _>>()?;
    let perms = (0..joins)
        .map(|_| {
            let idx = r.number(PERM_CHARS)?;
            Perm5::from_index(idx)
                .ok_or_else(|| SignatureError::malformed("gluing permutation out of range"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let base = tri.len();
    tri.pents
        .extend(std::iter::repeat(Pentachoron::default()).take(n));
    let mut next_new = 1;
    let mut next_action = actions.iter();
    let mut next_join = dests.iter().zip(perms.iter());
    for s in 0..n {
        if s >= next_new {
            return Err(SignatureError::malformed("component is disconnected"));
        }
        for f in 0..5 {
            if tri.pents[base + s].adj[f].is_some() {
                continue;
            }
            let action = *next_action
                .next()
                .ok_or_else(|| SignatureError::malformed("too few facet actions"))?;
            let (dest, perm) = match action {
                0 => continue,
                1 => {
                    if next_new >= n {
                        return Err(SignatureError::malformed("more pentachora than declared"));
                    }
                    next_new += 1;
                    (next_new - 1, Perm5::IDENTITY)
                }
                _ => {
                    let (&d, &p) = next_join
                        .next()
                        .ok_or_else(|| SignatureError::malformed("too few gluings"))?;
                    if d >= n {
                        return Err(SignatureError::malformed("destination out of range"));
                    }
                    (d, p)
                }
            };
            if !tri.join(base + s, f, base + dest, perm) {
                return Err(SignatureError::malformed("conflicting gluing"));
            }
        }
    }
    if next_action.next().is_some() {
        return Err(SignatureError::malformed("unused facet actions"));
    }
    Ok(())
}
