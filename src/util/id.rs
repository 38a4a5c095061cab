//! Connection ids.

use ulid::Ulid;

/// A fresh id for a websocket connection. Sortable by creation time.
pub fn new_connection_id() -> String {
    Ulid::new().to_string()
}
