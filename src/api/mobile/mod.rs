pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_get_active_broadcasts, __path_get_me, __path_mobile_auth, __path_post_collection,
    __path_post_duty, __path_post_location, get_active_broadcasts, get_me, init_routes,
    mobile_auth, post_collection, post_duty, post_location,
};

pub use structures::{
    AuthRequest, AuthResponse, CollectionReceipt, CollectionRequest, DutyRequest, DutyResponse,
    LocationAck, LocationPing,
};
