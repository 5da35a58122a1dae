// bazaar/src/config.rs

//! Fixed presentation and policy constants shared by the action layer and the pages.

/// Rows per page on the user management page.
pub const USERS_PER_PAGE: usize = 6;

/// Rows per page on the product management page.
pub const PRODUCTS_PER_PAGE: usize = 5;

/// Shown in place of an owner that no longer exists.
pub const OWNER_NAME_PLACEHOLDER: &str = "User Name";
pub const OWNER_NNI_PLACEHOLDER: &str = "User NNI";

pub const USER_PHOTO_FALLBACK: &str = "/lok.jpg";
pub const PRODUCT_IMAGE_PLACEHOLDER: &str = "/placeholder.jpg";
/// Swapped in when a product image fails to load.
pub const PRODUCT_IMAGE_BROKEN: &str = "/default.jpeg";

pub const CONTACT_LINK_BASE: &str = "https://wa.me/";

/// Where non-admin visitors of the user management page are sent.
pub const HOME_PATH: &str = "/";

pub const MIN_PASSWORD_LEN: usize = 6;
