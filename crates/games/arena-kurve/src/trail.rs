use crate::Point;

/// Points per chunk. Chunks are allocated at full capacity and never grow,
/// so appends never move existing points.
const CHUNK_LEN: usize = 256;

/// Trails longer than this are downsampled in snapshots.
pub const SNAPSHOT_DOWNSAMPLE_THRESHOLD: usize = 300;
/// Keep every n-th point of a downsampled trail.
pub const SNAPSHOT_STRIDE: usize = 3;
/// Dense points kept at the end of a downsampled trail.
pub const SNAPSHOT_DENSE_TAIL: usize = 10;

/// Append-only history of a player's recorded positions.
///
/// Starts with the spawn point. Each later point carries the tick it was
/// recorded on, and ticks must strictly increase. A frozen trail (its owner
/// was eliminated) rejects further appends.
#[derive(Debug, Clone)]
pub struct Trail {
    chunks: Vec<Vec<Point>>,
    len: usize,
    last_tick: Option<u32>,
    frozen: bool,
}

impl Trail {
    pub fn new(origin: Point) -> Self {
        let mut first = Vec::with_capacity(CHUNK_LEN);
        first.push(origin);
        Self {
            chunks: vec![first],
            len: 1,
            last_tick: None,
            frozen: false,
        }
    }

    /// Append the position recorded on `tick`.
    ///
    /// # Panics
    /// If the trail is frozen or `tick` does not follow the previous append.
    pub fn push(&mut self, tick: u32, point: Point) {
        assert!(!self.frozen, "append to a frozen trail at tick {tick}");
        if let Some(last) = self.last_tick {
            assert!(tick > last, "trail tick {tick} does not follow {last}");
        }

        let needs_chunk = self.chunks.last().is_none_or(|c| c.len() == CHUNK_LEN);
        if needs_chunk {
            self.chunks.push(Vec::with_capacity(CHUNK_LEN));
        }
        if let Some(chunk) = self.chunks.last_mut() {
            chunk.push(point);
        }
        self.len += 1;
        self.last_tick = Some(tick);
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a trail holds at least its spawn point.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Tick of the most recent append, `None` while only the spawn point exists.
    pub fn last_tick(&self) -> Option<u32> {
        self.last_tick
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.chunks
            .get(index / CHUNK_LEN)
            .and_then(|c| c.get(index % CHUNK_LEN))
            .copied()
    }

    pub fn last(&self) -> Point {
        self.chunks
            .last()
            .and_then(|c| c.last())
            .copied()
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.chunks.iter().flat_map(|c| c.iter().copied())
    }

    /// Copy for strategy snapshots: short trails in full, long trails as every
    /// third point followed by the last ten points.
    pub fn snapshot_points(&self) -> Vec<Point> {
        if self.len <= SNAPSHOT_DOWNSAMPLE_THRESHOLD {
            return self.iter().collect();
        }
        let mut points: Vec<Point> = self.iter().step_by(SNAPSHOT_STRIDE).collect();
        points.extend(self.iter().skip(self.len - SNAPSHOT_DENSE_TAIL));
        points
    }
}
