//! Podium layout for the top clubs

use crate::error::{Result, StandingsError};
use crate::model::ClubTotal;
use std::fmt;

/// Most clubs a podium can show
pub const MAX_PODIUM: usize = 5;

/// Visual order of the podium, left to right, as indices into the ranking:
/// 4th, 2nd, champion, 3rd, 5th
const VISUAL_ORDER: [usize; MAX_PODIUM] = [3, 1, 0, 2, 4];

/// True finishing tier of a club in the overall ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Champion,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl Tier {
    pub const ALL: [Tier; MAX_PODIUM] = [
        Tier::Champion,
        Tier::Second,
        Tier::Third,
        Tier::Fourth,
        Tier::Fifth,
    ];

    /// Tier for a 0-based rank index
    pub fn from_index(index: usize) -> Option<Tier> {
        Self::ALL.get(index).copied()
    }

    /// 1-based rank
    pub fn rank(&self) -> usize {
        *self as usize + 1
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Champion => "Johan",
            Tier::Second => "Naib Johan",
            Tier::Third => "Ketiga",
            Tier::Fourth => "Tempat Ke-4",
            Tier::Fifth => "Tempat Ke-5",
        }
    }

    /// Bar height on a 0-100 scale
    pub fn height(&self) -> u32 {
        match self {
            Tier::Champion => 100,
            Tier::Second => 70,
            Tier::Third => 55,
            Tier::Fourth => 40,
            Tier::Fifth => 30,
        }
    }

    /// Bar colour as an RGB hex string
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Champion => "#FFAE00",
            Tier::Second => "#C0C0C0",
            Tier::Third => "#CD7F32",
            Tier::Fourth | Tier::Fifth => "#708090",
        }
    }

    pub fn medal(&self) -> Option<&'static str> {
        match self {
            Tier::Champion => Some("🥇"),
            Tier::Second => Some("🥈"),
            Tier::Third => Some("🥉"),
            Tier::Fourth | Tier::Fifth => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One bar of the podium
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodiumEntry {
    /// Visual slot, 1 = leftmost
    pub position: usize,
    pub club: String,
    pub points: u32,
    pub tier: Tier,
}

/// Podium bars in visual order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Podium {
    pub entries: Vec<PodiumEntry>,
}

impl Podium {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by true rank, champion first
    pub fn by_tier(&self) -> Vec<&PodiumEntry> {
        let mut entries: Vec<&PodiumEntry> = self.entries.iter().collect();
        entries.sort_by_key(|e| e.tier);
        entries
    }

    pub fn champion(&self) -> Option<&PodiumEntry> {
        self.entries.iter().find(|e| e.tier == Tier::Champion)
    }
}

/// Build the podium for the top `size` clubs.
///
/// `totals` must already be ranked (as returned by `aggregate`). Fails
/// with `InsufficientData` when fewer than `size` clubs are available.
pub fn rank_podium(totals: &[ClubTotal], size: usize) -> Result<Podium> {
    let size = size.clamp(1, MAX_PODIUM);
    if totals.len() < size {
        return Err(StandingsError::InsufficientData {
            available: totals.len(),
            required: size,
        });
    }
    Ok(layout(&totals[..size]))
}

/// Build a podium from whatever clubs exist, up to `size`.
///
/// Tiers with no club are left out; the remaining bars keep the
/// 4th-2nd-1st-3rd-5th arrangement and are numbered contiguously.
pub fn rank_available(totals: &[ClubTotal], size: usize) -> Podium {
    let size = size.clamp(1, MAX_PODIUM).min(totals.len());
    layout(&totals[..size])
}

fn layout(top: &[ClubTotal]) -> Podium {
    let entries = VISUAL_ORDER
        .iter()
        .filter_map(|&rank_index| {
            let total = top.get(rank_index)?;
            let tier = Tier::from_index(rank_index)?;
            Some((total, tier))
        })
        .enumerate()
        .map(|(slot, (total, tier))| PodiumEntry {
            position: slot + 1,
            club: total.club.clone(),
            points: total.points,
            tier,
        })
        .collect();

    Podium { entries }
}

/// Wrap a club name onto lines of at most `width` characters, breaking at
/// spaces. A word longer than a whole line is split, filling the current
/// line first.
pub fn wrap_label(label: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in label.split_whitespace() {
        let mut rest: Vec<char> = word.chars().collect();
        loop {
            let used = current.chars().count();
            let sep = usize::from(!current.is_empty());

            if used + sep + rest.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(rest.iter());
                break;
            }

            if rest.len() > width {
                let space = width.saturating_sub(used + sep);
                if space > 0 {
                    if sep == 1 {
                        current.push(' ');
                    }
                    current.extend(rest.drain(..space));
                }
            }
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
