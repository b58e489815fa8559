use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
    types::{NewTodo, Todo, TodoId, TodoUpdate},
};

const TODOS_PATH: &str = "/api/todos";
const CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Calls against the todo resource.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Todo>>;
    async fn get(&self, id: TodoId) -> ClientResult<Todo>;
    /// Succeeds on any 2xx; the echoed record is `None` when the body is not a todo.
    async fn create(&self, todo: &NewTodo) -> ClientResult<Option<Todo>>;
    async fn update(&self, id: TodoId, update: &TodoUpdate) -> ClientResult<Option<Todo>>;
    async fn delete(&self, id: TodoId) -> ClientResult<()>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    http: Client,
    base_url: String,
    csrf_token: String,
}

impl HttpTodoApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf_token: config.csrf_token.clone(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{TODOS_PATH}", self.base_url)
    }

    fn item_url(&self, id: TodoId) -> String {
        format!("{}{TODOS_PATH}/{id}", self.base_url)
    }

    fn read(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(header::ACCEPT, "application/json")
    }

    fn write(&self, request: RequestBuilder) -> RequestBuilder {
        self.read(request).header(CSRF_HEADER, &self.csrf_token)
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> ClientResult<Vec<Todo>> {
        let response = self.read(self.http.get(self.collection_url())).send().await?;
        decode(response).await
    }

    async fn get(&self, id: TodoId) -> ClientResult<Todo> {
        let response = self.read(self.http.get(self.item_url(id))).send().await?;
        decode(response).await
    }

    async fn create(&self, todo: &NewTodo) -> ClientResult<Option<Todo>> {
        let response = self
            .write(self.http.post(self.collection_url()))
            .json(todo)
            .send()
            .await?;
        decode_echo(response).await
    }

    async fn update(&self, id: TodoId, update: &TodoUpdate) -> ClientResult<Option<Todo>> {
        let response = self
            .write(self.http.put(self.item_url(id)))
            .json(update)
            .send()
            .await?;
        decode_echo(response).await
    }

    async fn delete(&self, id: TodoId) -> ClientResult<()> {
        let response = self.write(self.http.delete(self.item_url(id))).send().await?;
        ensure_success(response).await.map(|_| ())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

async fn decode_echo<T: DeserializeOwned>(response: Response) -> ClientResult<Option<T>> {
    let response = ensure_success(response).await?;
    let echoed: Result<T, String> = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };
    Ok(echoed
        .inspect_err(|error| tracing::debug!(%error, "write accepted with an unreadable body"))
        .ok())
}

async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty());

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::HttpTodoApi;
    use crate::config::ClientConfig;

    #[test]
    fn urls_tolerate_a_trailing_slash() {
        let api = HttpTodoApi::new(&ClientConfig::new("http://localhost:8080/"));
        assert_eq!(api.collection_url(), "http://localhost:8080/api/todos");
        assert_eq!(api.item_url(5), "http://localhost:8080/api/todos/5");
    }
}
