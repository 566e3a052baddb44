//! User accounts, credentials and the bearer token authentication that guards the API.

mod account;
mod log_in;
mod middleware;
mod password;
mod register_user;
mod token;
mod user;

pub use account::{
    AccountState, ValidatedToken, delete_account, get_profile, update_profile, validate_token,
};
pub use log_in::{LogInResponse, LoginState, post_log_in};
pub use middleware::{AuthState, auth_guard};
pub use password::{BcryptHasher, CredentialHasher, PasswordHash};
pub use register_user::{RegistrationState, register_user};
pub use token::{Claims, DEFAULT_TOKEN_VALIDITY, TokenService};
pub use user::{
    Identity, PublicUser, User, UserID, UserUpdate, create_user, create_user_table, delete_user,
    get_user_by_email, get_user_by_id, get_user_by_username, update_user,
};
