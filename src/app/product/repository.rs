//! 产品持久化网关

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    sync::atomic::{AtomicI64, Ordering as AtomicOrdering},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::Product;
use crate::core::pagination::{Direction, Page, PageRequest, Sort, SortField};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 唯一约束、外键、检查约束等违反
    #[error("integrity violation: {0}")]
    Integrity(String),
    /// 更新时记录已不存在
    #[error("product {0} no longer exists")]
    Missing(i64),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 无 id 时插入并分配 id，有 id 时整行更新
    async fn save(&self, product: Product) -> RepositoryResult<Product>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    async fn find_all(&self, sort: Sort) -> RepositoryResult<Vec<Product>>;

    async fn find_page(&self, request: PageRequest) -> RepositoryResult<Page<Product>>;

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool>;

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;

    /// 健康检查
    async fn ping(&self) -> RepositoryResult<()>;

    fn backend(&self) -> &'static str;
}

/// 进程内存储，未配置数据库时和测试中使用
#[derive(Debug)]
pub struct InMemoryProductRepository {
    rows: RwLock<BTreeMap<i64, Product>>,
    sequence: AtomicI64,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(1),
        }
    }

    fn sorted(rows: &BTreeMap<i64, Product>, sort: Sort) -> Vec<Product> {
        let mut products: Vec<Product> = rows.values().cloned().collect();
        products.sort_by(|a, b| compare(a, b, sort));
        products
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// 按排序字段比较，id 作为次序键保证结果稳定
fn compare(a: &Product, b: &Product, sort: Sort) -> Ordering {
    let primary = match sort.field {
        SortField::Id => Ordering::Equal,
        SortField::Name => a.name.cmp(&b.name),
        SortField::Description => a.description.cmp(&b.description),
        SortField::Price => a.price.cmp(&b.price),
        SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        SortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
    };
    let ordering = primary.then_with(|| a.id.cmp(&b.id));
    match sort.direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, mut product: Product) -> RepositoryResult<Product> {
        let mut rows = self.rows.write().await;
        match product.id {
            Some(id) => {
                if !rows.contains_key(&id) {
                    return Err(RepositoryError::Missing(id));
                }
                rows.insert(id, product.clone());
            }
            None => {
                let id = self.sequence.fetch_add(1, AtomicOrdering::SeqCst);
                product.id = Some(id);
                rows.insert(id, product.clone());
            }
        }
        Ok(product)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_all(&self, sort: Sort) -> RepositoryResult<Vec<Product>> {
        let rows = self.rows.read().await;
        Ok(Self::sorted(&rows, sort))
    }

    async fn find_page(&self, request: PageRequest) -> RepositoryResult<Page<Product>> {
        let rows = self.rows.read().await;
        let total = rows.len() as u64;
        let content = Self::sorted(&rows, request.sort)
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Ok(Page::new(content, &request, total))
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.rows.read().await.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        self.rows.write().await.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "in-memory"
    }
}
