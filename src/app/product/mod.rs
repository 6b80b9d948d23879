//! 产品资源：实体、DTO、映射、持久化、服务与 HTTP 处理器

pub mod dto;
pub mod handler;
pub mod mapper;
pub mod model;
#[cfg(feature = "database")]
pub mod pg_repository;
pub mod repository;
pub mod service;
