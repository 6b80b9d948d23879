//! 产品业务服务

use std::sync::Arc;

use tracing::{debug, info};

use super::{
    dto::{ProductInput, ProductListing, ProductResponse},
    mapper,
    model::Product,
    repository::ProductRepository,
};
use crate::core::{
    error::CoreError,
    pagination::{PageRequest, Sort},
};

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    expose_updated_at: bool,
}

fn not_found(id: i64) -> CoreError {
    CoreError::NotFound(format!("Product {} not found", id))
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self {
            repository,
            expose_updated_at: true,
        }
    }

    /// 关闭后响应中不再包含 `updatedAt`
    pub fn with_updated_at(mut self, expose: bool) -> Self {
        self.expose_updated_at = expose;
        self
    }

    pub fn repository(&self) -> &Arc<dyn ProductRepository> {
        &self.repository
    }

    fn respond(&self, product: &Product) -> ProductResponse {
        let response = mapper::to_response(product);
        if self.expose_updated_at {
            response
        } else {
            response.without_updated_at()
        }
    }

    pub async fn create(&self, input: ProductInput) -> Result<ProductResponse, CoreError> {
        let saved = self.repository.save(mapper::to_entity(input)).await?;
        let response = self.respond(&saved);
        info!("Created product {} ({})", response.id, response.name);
        Ok(response)
    }

    /// 不分页时按创建时间倒序返回全部
    pub async fn find_all(
        &self,
        page_request: Option<PageRequest>,
    ) -> Result<ProductListing, CoreError> {
        let listing = match page_request {
            None => {
                let products = self.repository.find_all(Sort::newest_first()).await?;
                ProductListing::Flat(products.iter().map(|p| self.respond(p)).collect())
            }
            Some(request) => {
                let page = self.repository.find_page(request).await?;
                ProductListing::Paged(page.map(|p| self.respond(&p)))
            }
        };
        debug!("Listed {} products", listing.len());
        Ok(listing)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<ProductResponse, CoreError> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(self.respond(&product))
    }

    pub async fn update(
        &self,
        id: i64,
        input: ProductInput,
    ) -> Result<ProductResponse, CoreError> {
        let mut product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        mapper::apply_update(&mut product, input);
        product.touch();

        let saved = self.repository.save(product).await?;
        info!("Updated product {}", id);
        Ok(self.respond(&saved))
    }

    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        if !self.repository.exists_by_id(id).await? {
            return Err(not_found(id));
        }
        self.repository.delete_by_id(id).await?;
        info!("Deleted product {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::repository::InMemoryProductRepository;
    use crate::core::pagination::{Direction, SortField};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn service() -> ProductService {
        ProductService::new(Arc::new(InMemoryProductRepository::new()))
    }

    fn input(name: &str, description: &str, price: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_response() {
        let service = service();
        let res = service
            .create(input("Mouse", "Inalámbrico", "19999.90"))
            .await
            .unwrap();

        assert_eq!(res.id, 1);
        assert_eq!(res.name, "Mouse");
        assert_eq!(res.price.to_string(), "19999.90");

        let stored = service.repository().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "Mouse");
        assert_eq!(stored.description, "Inalámbrico");
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let service = service();
        service.create(input("Teclado", "Mecánico", "1500")).await.unwrap();

        let res = service.find_by_id(1).await.unwrap();
        assert_eq!(res.name, "Teclado");
        assert_eq!(res.price.to_string(), "1500.00");
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_not_found() {
        match service().find_by_id(99).await {
            Err(CoreError::NotFound(msg)) => assert!(msg.contains("99")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_all_newest_first() {
        let service = service();
        service.create(input("Alpha", "first", "10")).await.unwrap();
        service.create(input("Beta", "second", "20")).await.unwrap();

        match service.find_all(None).await.unwrap() {
            ProductListing::Flat(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].name, "Beta");
                assert_eq!(items[1].name, "Alpha");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_all_paged() {
        let service = service();
        for name in ["Alpha", "Beta", "Gamma"] {
            service.create(input(name, "item", "1")).await.unwrap();
        }

        let page_request = PageRequest::new(0, 2, Sort::new(SortField::Name, Direction::Desc));
        match service.find_all(Some(page_request)).await.unwrap() {
            ProductListing::Paged(page) => {
                assert_eq!(page.total_elements, 3);
                assert_eq!(page.total_pages, 2);
                assert_eq!(page.content[0].name, "Gamma");
                assert_eq!(page.content[1].name, "Beta");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let service = service();
        let created = service.create(input("Mouse", "Inalámbrico", "10")).await.unwrap();

        let updated = service
            .update(created.id, input("X-one", "Y-two", "5"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "X-one");
        assert_eq!(updated.description, "Y-two");
        assert_eq!(updated.price.to_string(), "5.00");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.unwrap() >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let result = service().update(7, input("Mouse", "Inalámbrico", "1")).await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        service.create(input("Mouse", "Inalámbrico", "1")).await.unwrap();

        service.delete(1).await.unwrap();
        assert!(matches!(service.find_by_id(1).await, Err(CoreError::NotFound(_))));
        assert!(matches!(service.delete(1).await, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_updated_at_can_be_hidden() {
        let service = service().with_updated_at(false);
        let res = service.create(input("Mouse", "Inalámbrico", "1")).await.unwrap();
        assert!(res.updated_at.is_none());
    }
}
