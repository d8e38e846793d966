pub mod prelude;

pub mod collections;
pub mod devices;
pub mod episode_sources;
pub mod episode_subtitles;
pub mod episodes;
pub mod favourites;
pub mod history;
pub mod search;
pub mod timecodes;
