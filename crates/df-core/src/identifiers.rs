//! Identifier fragments.
//!
//! Scenario, trajectory, and namespace ids all share the shape
//! `<prefix>-<hex fragment>`, e.g. `traj-3f9c0a1b2d4e` or `dtu-7a1b2c3d`.
//! The fragment comes from a v4 UUID, so ids are unique without coordination.

use uuid::Uuid;

/// Random lowercase hex fragment of `len` characters (at most 32).
#[must_use]
pub fn short_hex(len: usize) -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(len);
    hex
}
