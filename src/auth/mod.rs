pub mod current_user;
pub mod jwt;
pub mod login;
pub mod login_throttle;

pub use current_user::{AdminUser, AuthRejection, CurrentUser};
pub use jwt::{generate_token, verify_token, Claims};
pub use login::{login, LoginError};
pub use login_throttle::LoginThrottle;
