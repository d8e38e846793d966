pub mod anime;
pub mod episode;
pub mod personal;
