//! 分页与排序

use std::{fmt, str::FromStr};

use serde::Serialize;

use super::error::CoreError;

/// 可排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Description,
    Price,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// 对应的数据库列名，白名单内的值才允许拼接进 SQL
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::Price => "price",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "description" => Ok(SortField::Description),
            "price" => Ok(SortField::Price),
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortField::UpdatedAt),
            other => Err(CoreError::BadRequest(format!("Unknown sort field: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(CoreError::BadRequest(format!("Unknown sort direction: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}

impl Sort {
    pub fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// 默认列表顺序：最新创建的在前
    pub fn newest_first() -> Self {
        Self::new(SortField::CreatedAt, Direction::Desc)
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::new(SortField::Id, Direction::Asc)
    }
}

/// 解析 `field,direction`，方向缺省为 asc
impl FromStr for Sort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or_default().parse()?;
        let direction = match parts.next() {
            Some(d) if !d.trim().is_empty() => d.parse()?,
            _ => Direction::Asc,
        };
        Ok(Sort::new(field, direction))
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field.column(), self.direction.keyword().to_lowercase())
    }
}

/// 分页请求，`page` 从 0 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Sort) -> Self {
        Self {
            page,
            size: size.max(1),
            sort,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

/// 分页响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = ((total_elements as f64) / (request.size as f64)).ceil() as u32;
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort() {
        assert_eq!("id,asc".parse::<Sort>().unwrap(), Sort::default());
        assert_eq!(
            "createdAt,DESC".parse::<Sort>().unwrap(),
            Sort::new(SortField::CreatedAt, Direction::Desc)
        );
        assert_eq!(
            "price".parse::<Sort>().unwrap(),
            Sort::new(SortField::Price, Direction::Asc)
        );
        assert_eq!(
            "updated_at,desc".parse::<Sort>().unwrap(),
            Sort::new(SortField::UpdatedAt, Direction::Desc)
        );
    }

    #[test]
    fn test_parse_sort_rejects_unknown() {
        assert!(matches!("stock,asc".parse::<Sort>(), Err(CoreError::BadRequest(_))));
        assert!(matches!("id,sideways".parse::<Sort>(), Err(CoreError::BadRequest(_))));
        assert!("".parse::<Sort>().is_err());
    }

    #[test]
    fn test_page_totals() {
        let request = PageRequest::new(1, 10, Sort::default());
        assert_eq!(request.offset(), 10);

        let page = Page::new(vec![1, 2, 3], &request, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.map(|n| n * 2).content, vec![2, 4, 6]);

        let empty: Page<u8> = Page::new(vec![], &request, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_zero_size_is_raised_to_one() {
        assert_eq!(PageRequest::new(0, 0, Sort::default()).size, 1);
    }
}
