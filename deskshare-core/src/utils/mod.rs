pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun3.l.google.com:19302";

/// Label of the ordered, reliable data channel carrying input events.
pub const INPUT_CHANNEL_LABEL: &str = "input";

/// Inclusive bounds for normalized pointer coordinates (percent of the shared surface).
pub const POINTER_MIN: f64 = 0.0;
pub const POINTER_MAX: f64 = 100.0;
