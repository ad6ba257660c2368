use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
}

/// Status and JSON body of a gateway answer.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Browser stand-in: keeps the `session` cookie between calls.
pub struct GatewayClient {
    client: Client,
    gateway_url: String,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().cookie_store(true).no_proxy().build()?;
        Ok(Self {
            client,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.gateway_url, path)
    }

    pub async fn register(&self, user: &NewUser) -> Result<Reply, reqwest::Error> {
        let res = self.client.post(self.url("/api/register")).json(user).send().await?;
        reply(res).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Reply, reqwest::Error> {
        let res = self
            .client
            .post(self.url("/api/login"))
            .json(credentials)
            .send()
            .await?;
        reply(res).await
    }

    pub async fn logout(&self) -> Result<Reply, reqwest::Error> {
        let res = self.client.delete(self.url("/api/logout")).send().await?;
        reply(res).await
    }

    pub async fn me(&self) -> Result<Reply, reqwest::Error> {
        let res = self.client.get(self.url("/api/me")).send().await?;
        reply(res).await
    }

    pub async fn list_todos(&self, page: Option<&str>) -> Result<Reply, reqwest::Error> {
        let mut req = self.client.get(self.url("/api/todos"));
        if let Some(page) = page {
            req = req.query(&[("page", page)]);
        }
        reply(req.send().await?).await
    }

    pub async fn create_todo(&self, todo: &NewTodo) -> Result<Reply, reqwest::Error> {
        let res = self.client.post(self.url("/api/todos")).json(todo).send().await?;
        reply(res).await
    }

    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<Reply, reqwest::Error> {
        let res = self
            .client
            .patch(self.url("/api/todos"))
            .json(&json!({ "id": id, "completed": completed }))
            .send()
            .await?;
        reply(res).await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<Reply, reqwest::Error> {
        let res = self
            .client
            .delete(self.url(&format!("/api/todos/{}", id)))
            .send()
            .await?;
        reply(res).await
    }

    /// Page data for the todo list; never an error status.
    pub async fn todos_page(&self) -> Result<Reply, reqwest::Error> {
        let res = self.client.get(self.url("/pages/todos")).send().await?;
        reply(res).await
    }

    pub async fn layout(&self, success: Option<&str>) -> Result<Reply, reqwest::Error> {
        let mut req = self.client.get(self.url("/pages/layout"));
        if let Some(success) = success {
            req = req.query(&[("success", success)]);
        }
        reply(req.send().await?).await
    }
}

async fn reply(res: Response) -> Result<Reply, reqwest::Error> {
    let status = res.status();
    let body = res.json().await?;
    Ok(Reply { status, body })
}
