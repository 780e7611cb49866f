//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use norvos_backend::{BackendConfig, DeleteOptions, KeyValueBackend, create_backend};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_endpoint {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试键前缀，例如 `/norvos-test/3f2a9c1e`
pub fn generate_test_prefix() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("/norvos-test/{}", &uuid.to_string()[..8])
}

/// 测试上下文：持有 backend 和本次测试独占的键前缀，结束时递归清理前缀
pub struct TestContext {
    pub backend: Arc<dyn KeyValueBackend>,
    pub prefix: String,
}

impl TestContext {
    /// 从 `ETCD_ENDPOINT`（可选 `ETCD_USERNAME`/`ETCD_PASSWORD`）创建 etcd 上下文
    pub fn etcd() -> Option<Self> {
        let endpoint = env::var("ETCD_ENDPOINT").ok()?;
        let config = BackendConfig::Etcd {
            endpoint,
            username: env::var("ETCD_USERNAME").ok(),
            password: env::var("ETCD_PASSWORD").ok(),
            connect_timeout_secs: 5,
        };
        let backend = create_backend(&config).ok()?;
        Some(Self {
            backend,
            prefix: generate_test_prefix(),
        })
    }

    /// 内存 backend 上下文
    pub fn memory() -> Self {
        Self {
            backend: require_backend(&BackendConfig::Memory),
            prefix: generate_test_prefix(),
        }
    }

    /// 在本次测试前缀下生成键
    pub fn key(&self, relative: &str) -> String {
        format!("{}/{relative}", self.prefix)
    }

    /// 递归删除本次测试前缀（忽略错误）
    pub async fn cleanup(&self) {
        let opts = DeleteOptions {
            recursive: true,
            deadline: None,
        };
        let _ = self.backend.delete(&self.prefix, &opts).await;
    }
}

fn require_backend(config: &BackendConfig) -> Arc<dyn KeyValueBackend> {
    match create_backend(config) {
        Ok(backend) => backend,
        Err(e) => panic!("创建 backend 失败: {e}"),
    }
}
