pub mod artwork;
pub mod query;
pub mod timestamp;

pub use artwork::{display_or, ArtworkCard, ArtworkDetail, ArtworkId, ImageRef};
pub use query::{SearchPage, SearchQuery, MAX_PAGE_SIZE, MAX_QUERY_LEN};
pub use timestamp::UtcDateTime;
