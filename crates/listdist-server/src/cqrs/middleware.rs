/// Marker for requests that write to the assignment store
pub trait Command {}

/// Marker for read-only requests
pub trait Query {}
