//! Team composition: grouping by role and the card grid built on top of it.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

use super::geometry::{Rect, SlideDimensions, SlideFrame};
use crate::models::{RoleType, TeamMember};

const MAX_COLUMNS: usize = 5;
const MAX_CARD_WIDTH: f64 = 2.2;
const CARD_GAP: f64 = 0.3;
const CARD_HEIGHT: f64 = 1.4;
const HEADER_HEIGHT: f64 = 0.45;
const HEADER_ADVANCE: f64 = 0.55;
const ROW_ADVANCE: f64 = 1.7;
const GRID_TOP: f64 = 1.6;

/// Key to ordered-list mapping where the first insertion of a key fixes its
/// position. Values under one key keep insertion order.
#[derive(Debug, Clone)]
pub struct OrderedGroups<K, V> {
    groups: IndexMap<K, Vec<V>>,
}

impl<K: Hash + Eq, V> OrderedGroups<K, V> {
    pub fn new() -> Self {
        Self {
            groups: IndexMap::new(),
        }
    }

    pub fn push(&mut self, key: K, value: V) {
        self.groups.entry(key).or_default().push(value);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl<K: Hash + Eq, V> Default for OrderedGroups<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for OrderedGroups<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut groups = Self::new();
        for (key, value) in iter {
            groups.push(key, value);
        }
        groups
    }
}

impl<K, V> IntoIterator for OrderedGroups<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = indexmap::map::IntoIter<K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Members sharing a role type, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamGroup<'a> {
    pub role_type: RoleType,
    pub members: Vec<&'a TeamMember>,
}

/// Group members by role type. Groups appear in the order their role first
/// shows up in `members`.
pub fn group_by_role(members: &[TeamMember]) -> Vec<TeamGroup<'_>> {
    members
        .iter()
        .map(|m| (m.role_type, m))
        .collect::<OrderedGroups<_, _>>()
        .into_iter()
        .map(|(role_type, members)| TeamGroup { role_type, members })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberCard {
    pub member_id: String,
    /// Row within the group (groups wrap after the column limit).
    pub row: usize,
    pub column: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupLayout<'a> {
    pub group: TeamGroup<'a>,
    pub header: Rect,
    pub cards: Vec<MemberCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamLayout<'a> {
    pub columns: usize,
    pub groups: Vec<GroupLayout<'a>>,
}

/// Place role headers and member cards.
///
/// The column count is shared across groups (`min(total cards, 5)`) so every
/// card has the same width; each row of cards is centered on its own.
pub fn layout_team<'a>(members: &'a [TeamMember], dims: &SlideDimensions) -> TeamLayout<'a> {
    let frame = SlideFrame::new(*dims);
    let content_width = dims.content_width();
    let columns = members.len().min(MAX_COLUMNS);
    let card_width = if columns == 0 {
        MAX_CARD_WIDTH
    } else {
        let cols = columns as f64;
        MAX_CARD_WIDTH.min((content_width - (cols - 1.0) * CARD_GAP) / cols)
    };

    let mut y = GRID_TOP;
    let mut groups = Vec::new();
    for group in group_by_role(members) {
        let header = frame.rect(dims.margin, y, content_width, HEADER_HEIGHT);
        y += HEADER_ADVANCE;

        let mut cards = Vec::with_capacity(group.members.len());
        for (row, chunk) in group.members.chunks(columns.max(1)).enumerate() {
            let n = chunk.len() as f64;
            let row_width = n * card_width + (n - 1.0) * CARD_GAP;
            let start_x = dims.margin + (content_width - row_width) / 2.0;
            for (column, member) in chunk.iter().enumerate() {
                let x = start_x + column as f64 * (card_width + CARD_GAP);
                cards.push(MemberCard {
                    member_id: member.id.clone(),
                    row,
                    column,
                    rect: frame.rect(x, y, card_width, CARD_HEIGHT),
                });
            }
            y += ROW_ADVANCE;
        }

        groups.push(GroupLayout {
            group,
            header,
            cards,
        });
    }

    TeamLayout { columns, groups }
}
