use std::sync::Arc;

use car_core::{CarEnvelope, HttpResponse};

use crate::repository::{CarRepository, RepositoryError};

/// Pass-through seam between the handlers and whichever `CarRepository` is
/// plugged in.
#[derive(Clone)]
pub struct CarService {
    repository: Arc<dyn CarRepository>,
}

impl CarService {
    pub fn new(repository: Arc<dyn CarRepository>) -> Self {
        Self { repository }
    }

    pub async fn fetch(&self, id: String) -> Result<HttpResponse, RepositoryError> {
        self.run(move |repo| repo.fetch(&id)).await
    }

    pub async fn create(&self, envelope: CarEnvelope) -> Result<HttpResponse, RepositoryError> {
        self.run(move |repo| repo.create(&envelope)).await
    }

    pub async fn delete(
        &self,
        id: String,
        version: String,
    ) -> Result<HttpResponse, RepositoryError> {
        self.run(move |repo| repo.delete(&id, &version)).await
    }

    /// Repositories do blocking I/O, so calls run on the blocking pool.
    async fn run<F>(&self, op: F) -> Result<HttpResponse, RepositoryError>
    where
        F: FnOnce(&dyn CarRepository) -> Result<HttpResponse, RepositoryError> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || op(repository.as_ref()))
            .await
            .map_err(|e| RepositoryError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl CarRepository for Echo {
        fn fetch(&self, id: &str) -> Result<HttpResponse, RepositoryError> {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: id.to_string(),
            })
        }

        fn create(&self, envelope: &CarEnvelope) -> Result<HttpResponse, RepositoryError> {
            Ok(HttpResponse {
                status: 201,
                headers: Vec::new(),
                body: envelope.data.id.clone(),
            })
        }

        fn delete(&self, id: &str, version: &str) -> Result<HttpResponse, RepositoryError> {
            Err(RepositoryError::Rejected {
                status: 418,
                message: format!("{id}@{version}"),
            })
        }
    }

    #[tokio::test]
    async fn forwards_each_operation_unchanged() {
        let service = CarService::new(Arc::new(Echo));

        assert_eq!(service.fetch("abc".to_string()).await.unwrap().body, "abc");

        let mut envelope = CarEnvelope::default();
        envelope.data.id = "xyz".to_string();
        let created = service.create(envelope).await.unwrap();
        assert_eq!((created.status, created.body.as_str()), (201, "xyz"));

        match service.delete("abc".to_string(), "3".to_string()).await {
            Err(RepositoryError::Rejected { status, message }) => {
                assert_eq!(status, 418);
                assert_eq!(message, "abc@3");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
