// identity fields
pub const ID_FIELD: &str = "id";
pub const TYPE_FIELD: &str = "type";
pub const COMPOSITE_KEY_SEPARATOR: &str = ".";

// visibility tiers
pub const INTERNAL_PREFIX: &str = "_";
pub const HIDDEN_PREFIX: &str = "__";
pub const HIDDEN_SUFFIX: &str = "__";

// query control keys
pub const LIMIT_KEY: &str = "_limit";
pub const OFFSET_KEY: &str = "_offset";
pub const ORDER_BY_KEY: &str = "_orderby";
pub const CONTROL_KEYS: [&str; 3] = [LIMIT_KEY, OFFSET_KEY, ORDER_BY_KEY];
pub const DEFAULT_ORDER_FIELD: &str = "order";
pub const ASCENDING_TOKEN: &str = "ASC";
pub const DESCENDING_TOKEN: &str = "DESC";

// content fields
pub const ROUTE_FIELD: &str = "route";
pub const COLLECTION_FIELD: &str = "collection";
pub const COLLECTIONS_TYPE: &str = "collections";
pub const LINK_FIELD: &str = "link";
pub const HREF_FIELD: &str = "href";
pub const TITLE_FIELD: &str = "title";
pub const NAVIGATION_TITLE_FIELD: &str = "navigationTitle";
pub const TEXT_FIELD: &str = "text";
pub const CURRENT_FIELD: &str = "current";
pub const HOME_FIELD: &str = "home";
pub const MISSING_ROUTE_HREF: &str = "#missingroute";
pub const MISSING_TITLE: &str = "N/A";

// route markers
pub const RELATIVE_MARKER: &str = "./";
pub const PARENT_MARKER: &str = "../";
pub const PATH_SEPARATOR: &str = "/";

// source and cache
pub const DOCUMENT_TERMINATOR: &str = "\n...";
pub const DOCUMENT_START_MARKER: &str = "---";
pub const DEFAULT_CACHE_SUFFIX: &str = ".json";
pub const SNAPSHOT_INDEXES_KEY: &str = "indexes";
pub const SNAPSHOT_DATA_KEY: &str = "data";

// navigation
pub const MAX_BREADCRUMB_DEPTH: usize = 64;
