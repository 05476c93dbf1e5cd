pub mod probe;

mod meta;
pub use self::meta::{ServerPageMeta, LIMIT_KEYS, META_CONTAINERS, PAGE_KEYS, TOTAL_KEYS, TOTAL_PAGES_KEYS};

mod envelope;
pub use self::envelope::{default_collection_paths, ListBody};
