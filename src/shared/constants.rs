/// Upload sub-folder holding news images
pub const NEWS_UPLOAD_FOLDER: &str = "news";

/// Upload sub-folder holding document files
pub const DOCUMENTS_UPLOAD_FOLDER: &str = "documents";

/// Token type reported by the login endpoint
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Number of lock shards used to serialize writes per entity
pub const ENTITY_LOCK_SHARDS: usize = 64;
