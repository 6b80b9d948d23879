//! 核心层：错误处理、请求提取、中间件、分页

pub mod error;
pub mod extract;
pub mod middleware;
pub mod pagination;
