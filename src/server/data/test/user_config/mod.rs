use crate::server::{
    data::user_config::UserConfigRepository,
    error::AppError,
    model::user_config::{StoredGuildRoutes, UserConfig},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory::user_config::UserConfigFactory};

mod get_by_user_id;
mod upsert;
