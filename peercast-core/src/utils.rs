pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

pub const DEFAULT_RELAY_URL: &str = "ws://localhost:8000";

/// Access code shared out-of-band between broadcaster and viewer.
pub const DEFAULT_ACCESS_CODE: &str = "12345678";
