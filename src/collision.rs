//! Drop-target collision resolution.
//!
//! Section areas sit visually inside the sortable slots of the top-level
//! list, so a pointer is often over both at once. Areas are the more
//! specific target: any area under the pointer wins, and only when none is
//! under it do we fall back to the closest candidate by center distance.

use crate::DropTarget;
use serde::{Deserialize, Serialize};

/// Pointer position in canvas coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Rectangle representing a droppable region's bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// A droppable region measured by the host for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct DropCandidate {
    pub target: DropTarget,
    pub rect: Rect,
}

impl DropCandidate {
    pub fn new(target: DropTarget, rect: Rect) -> Self {
        Self { target, rect }
    }
}

/// Pick the authoritative drop target for this pointer position
pub fn resolve_collision(pointer: Point, candidates: &[DropCandidate]) -> Option<DropTarget> {
    let area_hit = candidates
        .iter()
        .filter(|c| c.target.is_section_area() && c.rect.contains(pointer))
        .fold(None::<&DropCandidate>, |best, candidate| match best {
            Some(b) if b.rect.area() <= candidate.rect.area() => Some(b),
            _ => Some(candidate),
        });

    if let Some(hit) = area_hit {
        return Some(hit.target.clone());
    }

    closest_center(pointer, candidates.iter().filter(|c| !c.target.is_section_area()))
}

fn closest_center<'a>(
    pointer: Point,
    candidates: impl Iterator<Item = &'a DropCandidate>,
) -> Option<DropTarget> {
    candidates
        .fold(None::<(f32, &DropCandidate)>, |best, candidate| {
            let distance = candidate.rect.center().distance_squared(&pointer);
            match best {
                Some((d, _)) if d <= distance => best,
                _ => Some((distance, candidate)),
            }
        })
        .map(|(_, candidate)| candidate.target.clone())
}
