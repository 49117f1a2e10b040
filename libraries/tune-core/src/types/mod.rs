mod ids;
mod track;

pub use ids::TrackId;
pub use track::{ResolvedTrack, SourceHandle};
