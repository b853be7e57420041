//! Access levels and account groups
//!
//! Every account belongs to a group, and every group carries an
//! [`AccessLevel`]. Access rules in the access config are written against the
//! same scale.
//!
//! ```text
//! ANYONE(-2)  UNAUTH(-1)  NORMAL(0)  LOWGM(1)  HIGHGM(2)  ADMIN(99)  NOONE(9999)
//!   always     exact        ─────────── ordered tiers ───────────     never
//! ```

mod groups;
mod level;

pub use groups::{
    groups, install_groups, is_installed, Group, GroupError, GroupTable, LevelComparison,
    UNKNOWN_GROUP_NAME,
};
pub use level::{AccessLevel, ParseLevelError};
