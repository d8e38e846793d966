pub mod collection;
pub mod device;
pub mod episode;
pub mod favourite;
pub mod history;
pub mod search;
pub mod timecode;
