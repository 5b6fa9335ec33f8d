use crate::server::{
    error::AppError,
    middleware::session::{AuthSession, SESSION_AUTH_USER_ID},
};
use test_utils::builder::TestBuilder;

mod get_user_id;
