//! Record identifiers.
//!
//! Product ids are UUIDv7: ids generated later compare greater, so listings
//! ordered by `(created_at, id)` stay newest-first when timestamps collide.
//! User ids come from the store (`gen_random_uuid()` on Postgres).

use uuid::Uuid;

/// Length of the canonical hyphenated form.
const HYPHENATED_LEN: usize = 36;

/// Fresh id for a new product.
pub fn new_product_id() -> Uuid {
    Uuid::now_v7()
}

/// Parse an id taken from a URL path.
///
/// Only the canonical hyphenated form is accepted; braced, URN and
/// unhyphenated spellings name no record.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    if raw.len() != HYPHENATED_LEN {
        return None;
    }
    Uuid::try_parse(raw).ok()
}
