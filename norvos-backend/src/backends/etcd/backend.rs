//! etcd v2 KeyValueBackend trait 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::{BackendError, Result};
use crate::traits::{BackendErrorMapper, KeyValueBackend};
use crate::types::{DeleteOptions, GetOptions, PutOptions, StoreAction, StoreResponse};

use super::{EtcdBackend, EtcdNode, EtcdResponse};

impl EtcdBackend {
    /// 将 etcd action 字符串转换为 `StoreAction`
    fn parse_action(&self, action: &str) -> Result<StoreAction> {
        match action {
            "get" => Ok(StoreAction::Get),
            "create" => Ok(StoreAction::Create),
            "update" | "set" | "compareAndSwap" => Ok(StoreAction::Update),
            "delete" | "compareAndDelete" => Ok(StoreAction::Delete),
            other => Err(self.parse_error(format!("未知的 action: {other}"))),
        }
    }

    /// 将 etcd 响应转换为 `StoreResponse`
    fn to_store_response(&self, response: EtcdResponse) -> Result<StoreResponse> {
        let action = self.parse_action(&response.action)?;
        let node: EtcdNode = response
            .node
            .ok_or_else(|| self.parse_error("响应中缺少 node 字段"))?;

        Ok(StoreResponse {
            action,
            key: node.key,
            value: node.value,
            revision: node.modified_index,
            prev_value: response.prev_node.and_then(|prev| prev.value),
        })
    }
}

#[async_trait]
impl KeyValueBackend for EtcdBackend {
    fn id(&self) -> &'static str {
        self.backend_name()
    }

    async fn get(&self, key: &str, opts: &GetOptions) -> Result<StoreResponse> {
        let query = format!("quorum={}", opts.quorum);
        let response = self
            .request(Method::GET, key, &query, None, opts.deadline)
            .await?;

        // 记录键必须是叶子节点；目录说明该名称下只有子记录，本身没有记录
        if response.node.as_ref().is_some_and(|node| node.dir) {
            return Err(BackendError::KeyNotFound {
                backend: self.backend_name().to_string(),
                key: key.to_string(),
                raw_message: Some("key is a directory".to_string()),
            });
        }

        self.to_store_response(response)
    }

    async fn create(&self, key: &str, value: &str, opts: &PutOptions) -> Result<StoreResponse> {
        let response = self
            .request(Method::PUT, key, "prevExist=false", Some(value), opts.deadline)
            .await?;
        self.to_store_response(response)
    }

    async fn update(&self, key: &str, value: &str, opts: &PutOptions) -> Result<StoreResponse> {
        let response = self
            .request(Method::PUT, key, "prevExist=true", Some(value), opts.deadline)
            .await?;
        self.to_store_response(response)
    }

    async fn delete(&self, key: &str, opts: &DeleteOptions) -> Result<StoreResponse> {
        let query = format!("recursive={}", opts.recursive);
        let response = self
            .request(Method::DELETE, key, &query, None, opts.deadline)
            .await?;
        self.to_store_response(response)
    }
}
