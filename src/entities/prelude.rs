pub use super::collections::Entity as Collections;
pub use super::devices::Entity as Devices;
pub use super::episode_sources::Entity as EpisodeSources;
pub use super::episode_subtitles::Entity as EpisodeSubtitles;
pub use super::episodes::Entity as Episodes;
pub use super::favourites::Entity as Favourites;
pub use super::history::Entity as History;
pub use super::search::Entity as Search;
pub use super::timecodes::Entity as Timecodes;
