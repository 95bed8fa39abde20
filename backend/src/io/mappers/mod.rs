pub mod user_mapper;
