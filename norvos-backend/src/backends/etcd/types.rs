//! etcd v2 API 类型定义

use serde::Deserialize;

/// etcd v2 成功响应
#[derive(Debug, Deserialize)]
pub struct EtcdResponse {
    pub action: String,
    pub node: Option<EtcdNode>,
    #[serde(rename = "prevNode")]
    pub prev_node: Option<EtcdNode>,
}

/// etcd v2 节点
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtcdNode {
    pub key: String,
    pub value: Option<String>,
    #[serde(default)]
    pub dir: bool,
    #[serde(default)]
    pub modified_index: u64,
    #[serde(default)]
    #[allow(dead_code)]
    pub created_index: u64,
}

/// etcd v2 错误响应
/// 例: `{"errorCode":100,"message":"Key not found","cause":"/coredns/com","index":12}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtcdErrorBody {
    pub error_code: i64,
    pub message: String,
    pub cause: Option<String>,
    #[allow(dead_code)]
    pub index: Option<u64>,
}

impl EtcdErrorBody {
    /// 消息 + cause，例如 "Key not found (/coredns/com/example)"
    pub fn describe(&self) -> String {
        match &self.cause {
            Some(cause) if !cause.is_empty() => format!("{} ({cause})", self.message),
            _ => self.message.clone(),
        }
    }
}
