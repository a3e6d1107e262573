pub mod functions;
pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_get_employees, __path_get_live_dashboard, __path_get_shops, __path_post_employee,
    __path_post_shop, get_employees, get_live_dashboard, get_shops, init_routes, post_employee,
    post_shop,
};

pub use structures::{CreateEmployeeRequest, CreateShopRequest};
