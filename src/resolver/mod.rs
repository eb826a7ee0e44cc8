pub mod cache;
pub mod events;
pub mod fill;
pub mod shift;
pub mod transpose;

pub use self::cache::{content_signature, CacheKey, MelodyCache};
pub use self::events::{JsonMeta, TabEvent, TabNote};
pub use self::fill::{resolve_positions, Resolution};
pub use self::shift::{coerce_shift_to_feasible, is_shift_feasible, shift_strings, ShiftOutcome};
pub use self::transpose::transpose;
