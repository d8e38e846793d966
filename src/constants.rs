pub mod cache {
    use std::time::Duration;

    /// Single anime detail and search-by-id lookups.
    pub const ITEM_TTL: Duration = Duration::from_secs(60 * 60);

    /// Search, recommended, latest, random and genre-filtered lists.
    pub const LIST_TTL: Duration = Duration::from_secs(8 * 60 * 60);

    pub const GENRE_CATALOG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    pub const KEY_PREFIX: &str = "anime";
}

pub mod providers {

    pub const ANILIBRIA_BASE_URL: &str = "https://aniliberty.top/api/v1/";

    pub const ANILIBRIA_ORIGIN: &str = "https://aniliberty.top";

    pub const CONSUMET_BASE_URL: &str = "https://consumet-caou.onrender.com/anime/zoro/";

    pub const ANILIBRIA_LIST_FIELDS: &str =
        "id,type.value,year,poster.optimized.thumbnail,poster.src,name.main";

    pub const ANILIBRIA_RELEASE_FIELDS: &str = "id,type.value,year,name.main,poster.src,is_ongoing,description,episodes_total,genres.name,episodes";

    pub const ANILIBRIA_EPISODE_FIELDS: &str =
        "id,name,ordinal,opening,ending,hls_480,hls_720,hls_1080";

    pub const ANILIBRIA_GENRE_FIELDS: &str = "id,name,total_releases";
}

pub mod limits {

    pub const DEFAULT_PAGE: i64 = 1;

    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    pub const MAX_PAGE_SIZE: i64 = 100;

    /// Keeps `(page - 1) * limit` within a signed SQL OFFSET.
    pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

    pub const DEFAULT_RELEASE_LIMIT: i64 = 14;

    pub const MAX_RELEASE_LIMIT: i64 = 50;

    pub const MAX_DEVICE_ID_LEN: usize = 128;

    pub const MAX_COLLECTION_TYPE_LEN: usize = 64;
}
