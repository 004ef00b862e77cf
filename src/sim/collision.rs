//! Group-vs-group collision resolution
//!
//! Every entity exposes a bounding [`Rect`] through [`Body`]. A pass first
//! collects all intersecting live pairs, then applies removals, so a pass
//! never observes its own removals and each pair is reported once.

use super::rect::Rect;
use super::registry::{Handle, Registry};

/// Anything with a bounding rectangle
pub trait Body {
    fn rect(&self) -> Rect;
}

/// Which side(s) of a pass lose their entity on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalPolicy {
    pub remove_a: bool,
    pub remove_b: bool,
}

impl RemovalPolicy {
    pub const BOTH: Self = Self {
        remove_a: true,
        remove_b: true,
    };
    /// Keep the first group, remove the second
    pub const ONLY_B: Self = Self {
        remove_a: false,
        remove_b: true,
    };
}

/// One intersecting pair found by a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: Handle,
    pub b: Handle,
}

/// All live `(a, b)` pairs whose rectangles intersect, in iteration order
pub fn find_contacts<A: Body, B: Body>(a: &Registry<A>, b: &Registry<B>) -> Vec<Contact> {
    let b_rects: Vec<(Handle, Rect)> = b.iter().map(|(h, body)| (h, body.rect())).collect();
    let mut contacts = Vec::new();
    for (ha, body) in a.iter() {
        let rect = body.rect();
        for (hb, other) in &b_rects {
            if rect.intersects(other) {
                contacts.push(Contact { a: ha, b: *hb });
            }
        }
    }
    contacts
}

/// Find contacts between two groups, then apply `policy` to each side.
///
/// An entity may appear in several contacts; removing it again is a no-op.
pub fn resolve<A: Body, B: Body>(
    a: &mut Registry<A>,
    b: &mut Registry<B>,
    policy: RemovalPolicy,
) -> Vec<Contact> {
    let contacts = find_contacts(a, b);
    for contact in &contacts {
        if policy.remove_a {
            a.remove(contact.a);
        }
        if policy.remove_b {
            b.remove(contact.b);
        }
    }
    contacts
}

/// Live members of `group` overlapping `rect`
pub fn hits<B: Body>(rect: &Rect, group: &Registry<B>) -> Vec<Handle> {
    group
        .iter()
        .filter(|(_, body)| rect.intersects(&body.rect()))
        .map(|(h, _)| h)
        .collect()
}

/// Resolve one `a` at a time against `b`, removing every `b` it touches.
///
/// `on_hit` runs once per contact while the `a` entity is still alive and
/// returns `true` when that hit destroyed it. Hits found for an `a` are all
/// consumed even after it dies; a `b` consumed by an earlier `a` is gone for
/// later ones.
pub fn resolve_sequential<A: Body, B: Body, F>(
    a: &mut Registry<A>,
    b: &mut Registry<B>,
    mut on_hit: F,
) -> Vec<Contact>
where
    F: FnMut(Handle, &mut A) -> bool,
{
    let mut contacts = Vec::new();
    for ha in a.handles() {
        let Some(rect) = a.get(ha).map(Body::rect) else {
            continue;
        };
        for hb in hits(&rect, b) {
            b.remove(hb);
            contacts.push(Contact { a: ha, b: hb });
            let destroyed = a.get_mut(ha).is_some_and(|entity| on_hit(ha, entity));
            if destroyed {
                a.remove(ha);
            }
        }
    }
    contacts
}
