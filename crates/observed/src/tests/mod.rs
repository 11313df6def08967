
use lodesync_types::DeviceId;

/// A deterministic, non-empty device identity for tests.
pub fn device(fill: u8) -> DeviceId {
    assert_ne!(fill, 0, "fill 0 would collide with DeviceId::EMPTY");
    DeviceId([fill; 32])
}
