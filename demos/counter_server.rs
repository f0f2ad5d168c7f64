//! JSON-RPC 计数器示例
//!
//! - `POST /jsonrpc/` 处理 `Counter.Incr` 与 `Counter.Get`
//! - 响应按 Accept-Encoding 协商 gzip / deflate
//!
//! 运行：
//! ```text
//! cargo run --example counter_server -- --address 127.0.0.1:65534
//! curl -s --compressed -H 'Content-Type: application/json' \
//!      -d '{"jsonrpc":"2.0","method":"Counter.Incr","params":{"Delta":2},"id":1}' \
//!      http://127.0.0.1:65534/jsonrpc/
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use clap::Parser;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use rat_rpc::{CompressionConfig, CompressionSelector, RatError, RatResult, RpcResponder};

#[derive(Parser, Debug)]
#[command(name = "counter_server", about = "RAT RPC 压缩协商示例服务")]
struct Args {
    /// 监听地址
    #[arg(long, default_value = "127.0.0.1:65534")]
    address: SocketAddr,

    /// 压缩配置文件（TOML）
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    method: String,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    id: Value,
}

#[derive(Debug, Default, Deserialize)]
struct IncrReq {
    #[serde(rename = "Delta", default)]
    delta: i64,
}

#[derive(Debug, Serialize)]
struct CounterReply {
    #[serde(rename = "Count")]
    count: i64,
}

#[derive(Default)]
struct Counter {
    count: AtomicI64,
}

impl Counter {
    fn call(&self, method: &str, params: Value) -> Result<Value, String> {
        match method {
            "Counter.Incr" => {
                let req: IncrReq = parse_params(params)?;
                println!("<- Incr {:?}", req);
                self.count.fetch_add(req.delta, Ordering::SeqCst);
                Ok(Value::Null)
            }
            "Counter.Get" => {
                let reply = CounterReply {
                    count: self.count.load(Ordering::SeqCst),
                };
                println!("-> {:?}", reply);
                serde_json::to_value(reply).map_err(|e| e.to_string())
            }
            other => Err(format!("rpc: can't find method \"{}\"", other)),
        }
    }
}

/// 参数既可以是对象，也可以是只含一个对象的数组
fn parse_params<T: for<'de> Deserialize<'de> + Default>(params: Value) -> Result<T, String> {
    let params = match params {
        Value::Null => return Ok(T::default()),
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| e.to_string())
}

struct App {
    counter: Counter,
    responder: RpcResponder<CompressionSelector>,
}

impl App {
    fn dispatch(&self, body: &[u8]) -> RatResult<Vec<u8>> {
        let request: RpcRequest = serde_json::from_slice(body)?;
        let reply = match self.counter.call(&request.method, request.params) {
            Ok(result) => json!({ "jsonrpc": "2.0", "result": result, "id": request.id }),
            Err(message) => json!({
                "jsonrpc": "2.0",
                "error": { "code": -32601, "message": message },
                "id": request.id,
            }),
        };
        Ok(serde_json::to_vec(&reply)?)
    }

    async fn handle(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        if req.method() != Method::POST || req.uri().path() != "/jsonrpc/" {
            return plain(StatusCode::NOT_FOUND, "404 Not Found");
        }

        let (parts, body) = req.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                eprintln!("❌ 读取请求体失败: {}", e);
                return plain(StatusCode::BAD_REQUEST, "bad request body");
            }
        };

        let payload = match self.dispatch(&body) {
            Ok(payload) => payload,
            Err(RatError::SerializationError(e)) => {
                let reply = json!({
                    "jsonrpc": "2.0",
                    "error": { "code": -32700, "message": e },
                    "id": Value::Null,
                });
                reply.to_string().into_bytes()
            }
            Err(e) => return plain(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        };

        match self.responder.respond(&parts.headers, "application/json; charset=utf-8", &payload) {
            Ok(response) => response,
            Err(e) => plain(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        }
    }
}

fn plain(status: StatusCode, text: &str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(text.to_string())));
    *response.status_mut() = status;
    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
            CompressionConfig::from_toml_str(&text)?
        }
        None => CompressionConfig::default(),
    };

    let app = Arc::new(App {
        counter: Counter::default(),
        responder: RpcResponder::new(CompressionSelector::new(config)),
    });

    let listener = TcpListener::bind(args.address)
        .await
        .with_context(|| format!("绑定地址失败: {}", args.address))?;
    println!("🚀 RAT RPC 计数器示例已启动: http://{}/jsonrpc/", args.address);

    loop {
        let (stream, remote_addr) = listener.accept().await?;
        let app = app.clone();
        tokio::spawn(async move {
            let service = hyper::service::service_fn(move |req| {
                let app = app.clone();
                async move { Ok::<_, Infallible>(app.handle(req).await) }
            });
            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                eprintln!("🔌 连接处理失败: {} ({})", remote_addr, e);
            }
        });
    }
}
