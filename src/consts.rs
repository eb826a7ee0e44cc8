/// Highest fret an index may be built for. Anything above this is treated as a
/// caller bug rather than an exotic instrument.
pub const MAX_SUPPORTED_FRET: u8 = 48;

/// Used-string tracking during the assignment search is a 64-bit mask, so
/// strings past this index never receive candidates.
pub const MAX_INDEXED_STRINGS: usize = 64;

/// Default cap on ranked alternatives kept per event.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 24;

/// Default path cost added for every note left without a position.
pub const DEFAULT_UNRESOLVED_PENALTY: f32 = 28.0;

/// Candidate positions shared out across the notes of one event.
pub const DEFAULT_CANDIDATE_BUDGET: usize = 12;

/// Every note gets at least this many candidates tried, however large the chord.
pub const DEFAULT_MIN_CANDIDATES_PER_NOTE: usize = 4;

/// Resolved-melody cache entries kept before FIFO eviction.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Octaves searched in each direction when a transposed pitch falls off the neck.
pub const MAX_OCTAVE_SEARCH: i32 = 8;

pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// Largest transposition accepted in either direction (the MIDI pitch span).
pub const MAX_TRANSPOSE_SEMITONES: i32 = 127;
