//! SeaORM queries backing `SeaOrmActivityRepository`.

pub mod activity_queries;
