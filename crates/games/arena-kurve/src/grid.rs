//! Spatial hash over trail segments.
//!
//! Segments live in one flat arena. Each grid cell keeps the indices of the
//! segments whose bounding box, padded by one cell on every side, overlaps
//! it. The padding over-approximates coverage: a point query only has to scan
//! its own cell and the eight neighbours, and the precise distance test
//! rejects the extra candidates.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::Point;
use crate::collision::point_to_segment_distance_sq;

/// Index into the grid's segment arena.
pub type SegmentId = u32;

/// Integer cell coordinate.
pub type CellKey = (i32, i32);

/// A stored trail segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    /// Index of the player that laid the segment.
    pub owner: usize,
    /// Position of this segment in its owner's sequence of segments.
    pub seq: u32,
}

impl Segment {
    /// A segment with no meaningful owner, for ad-hoc indexes.
    pub const fn unowned(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            owner: 0,
            seq: 0,
        }
    }
}

type Bucket = SmallVec<[SegmentId; 8]>;

#[derive(Debug, Clone)]
pub struct SpatialHashGrid {
    cell_size: f64,
    segments: Vec<Segment>,
    cells: HashMap<CellKey, Bucket>,
}

impl SpatialHashGrid {
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "grid cell size must be finite and positive, got {cell_size}"
        );
        Self {
            cell_size,
            segments: Vec::new(),
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell containing `p`, by floor division.
    pub fn cell_of(&self, p: Point) -> CellKey {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// Add a segment to every cell its padded bounding box overlaps.
    pub fn insert(&mut self, segment: Segment) -> SegmentId {
        let id = SegmentId::try_from(self.segments.len()).expect("segment arena exceeds u32 ids");
        self.segments.push(segment);

        let lo = self.cell_of(Point::new(
            segment.start.x.min(segment.end.x),
            segment.start.y.min(segment.end.y),
        ));
        let hi = self.cell_of(Point::new(
            segment.start.x.max(segment.end.x),
            segment.start.y.max(segment.end.y),
        ));

        let before = self.cells.len();
        for cx in lo.0.saturating_sub(1)..=hi.0.saturating_add(1) {
            for cy in lo.1.saturating_sub(1)..=hi.1.saturating_add(1) {
                self.cells.entry((cx, cy)).or_default().push(id);
            }
        }
        if self.cells.len() > before {
            tracing::trace!(
                segment = id,
                new_cells = self.cells.len() - before,
                "Grid grew"
            );
        }
        id
    }

    /// Whether any stored segment lies strictly within `radius` of `p`.
    pub fn query_point(&self, p: Point, radius: f64) -> bool {
        self.first_hit(p, radius, |_| true).is_some()
    }

    /// First segment within `radius` of `p` for which `include` holds.
    ///
    /// Scans the cell containing `p` and its eight neighbours in a fixed
    /// order, so the result is deterministic.
    pub fn first_hit(
        &self,
        p: Point,
        radius: f64,
        mut include: impl FnMut(&Segment) -> bool,
    ) -> Option<&Segment> {
        let (cx, cy) = self.cell_of(p);
        let r_sq = radius * radius;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                let Some(bucket) = self.cells.get(&key) else {
                    continue;
                };
                for &id in bucket {
                    let segment = &self.segments[id as usize];
                    if !include(segment) {
                        continue;
                    }
                    if point_to_segment_distance_sq(p, segment.start, segment.end) < r_sq {
                        return Some(segment);
                    }
                }
            }
        }
        None
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id as usize)
    }

    /// Number of stored segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of cells with at least one segment.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Segment ids bucketed in a cell.
    pub fn bucket(&self, key: CellKey) -> &[SegmentId] {
        self.cells.get(&key).map(|b| b.as_slice()).unwrap_or(&[])
    }
}
