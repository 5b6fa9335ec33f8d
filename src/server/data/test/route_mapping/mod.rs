use crate::server::{
    data::route_mapping::RouteMappingRepository, error::AppError,
    model::route_mapping::UpsertRouteMappingParam,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use std::collections::BTreeMap;
use test_utils::{builder::TestBuilder, factory::route_mapping::RouteMappingFactory};

mod find_by_user_and_guild;
mod upsert;
