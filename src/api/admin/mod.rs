pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_get_broadcasts, __path_get_owners, __path_get_system_logs, __path_get_system_stats,
    __path_patch_owner_subscription, __path_post_broadcast, get_broadcasts, get_owners,
    get_system_logs, get_system_stats, init_routes, patch_owner_subscription, post_broadcast,
};

pub use structures::{
    CreateBroadcastRequest, LogActor, LogsQuery, OwnerOverview, SystemLogView, SystemStats,
    UpdateSubscriptionRequest,
};
