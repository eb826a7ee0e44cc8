pub mod candidates;
pub mod costs;
pub mod enumerator;
pub mod path;
pub mod types;

pub use self::candidates::{CandidateIndex, PositionCandidate};
pub use self::costs::{assignment_cost, transition_cost, AssignmentCost, HandProfile};
pub use self::enumerator::enumerate_assignments;
pub use self::path::{path_cost, select_path};
pub use self::types::{
    Event, EventAssignment, EventOccurrence, OccurrenceAssignment, PitchTarget, ResolvedNote,
    SelectedPath,
};
