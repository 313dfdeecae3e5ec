//! Test utilities and shared test helpers for the chatbridge crates.
//!
//! Enable the `testing` feature to use these from another crate's tests.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Fixed Discord identifiers for tests.
pub mod discord_fixtures {
    use crate::{ChannelId, GuildId, UserId};

    /// A test user that is not a developer.
    pub const fn test_user_id() -> UserId {
        UserId(123_456_789_012_345_678)
    }

    /// A test user listed as a developer.
    pub const fn test_developer_id() -> UserId {
        UserId(366_536_353_418_182_657)
    }

    /// The relay channel used in tests.
    pub const fn test_channel_id() -> ChannelId {
        ChannelId(987_654_321_098_765_432)
    }

    /// The development guild used in tests.
    pub const fn test_guild_id() -> GuildId {
        GuildId(111_222_333_444_555_666)
    }
}

/// Property-based testing strategies.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::UserId;
    use proptest::prelude::*;

    /// Any valid (non-zero) user ID.
    pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
        (1u64..=u64::MAX).prop_map(UserId)
    }
}
