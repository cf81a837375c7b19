//! llama-server backed generation.
//!
//! Manages a single llama-server child process. Loading a model with a new
//! spec stops the previous process and starts a fresh one with the new
//! arguments, so exactly one model is resident at any time.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Mutex};

use super::backend::{GenerationBackend, GenerationEngine};
use super::types::ModelSpec;
use crate::core::config::LlamaConfig;
use crate::core::errors::RagError;

const MAX_SERVER_RETRIES: u32 = 30;

pub struct LlamaServerBackend {
    inner: Arc<Mutex<ServerProcess>>,
    client: Client,
    n_ctx: usize,
}

struct ServerProcess {
    child: Option<Child>,
    port: u16,
    server_path: PathBuf,
    active: Option<ActiveModel>,
}

struct ActiveModel {
    spec: ModelSpec,
    weights: PathBuf,
}

impl LlamaServerBackend {
    pub fn new(config: &LlamaConfig, project_root: &Path) -> Result<Self, RagError> {
        let server_path = find_server_binary(config, project_root)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(ServerProcess {
                child: None,
                port: config.port,
                server_path,
                active: None,
            })),
            client: Client::new(),
            n_ctx: config.n_ctx,
        })
    }

    async fn start(
        &self,
        process: &mut ServerProcess,
        spec: &ModelSpec,
        weights: &Path,
    ) -> Result<(), RagError> {
        let mut cmd = Command::new(&process.server_path);
        cmd.arg("-m").arg(weights);
        cmd.arg("--port").arg(process.port.to_string());
        cmd.arg("-c").arg(self.n_ctx.to_string());
        cmd.arg("-t").arg(spec.threads.to_string());
        cmd.arg("-b").arg(spec.batch_size.to_string());

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| RagError::ModelLoad(format!("failed to spawn llama-server: {}", e)))?;

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(async move {
                let mut reader = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    tracing::debug!("[llama-server] {}", line);
                }
            });
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut reader = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    tracing::debug!("[llama-server-err] {}", line);
                }
            });
        }

        process.child = Some(child);

        if let Err(e) = self.wait_for_health(process.port).await {
            stop(process).await;
            return Err(e);
        }

        process.active = Some(ActiveModel {
            spec: spec.clone(),
            weights: weights.to_path_buf(),
        });
        Ok(())
    }

    async fn wait_for_health(&self, port: u16) -> Result<(), RagError> {
        let url = format!("http://localhost:{}/health", port);
        for _ in 0..MAX_SERVER_RETRIES {
            if self.client.get(&url).send().await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        Err(RagError::ModelLoad(
            "timed out waiting for llama-server".to_string(),
        ))
    }
}

async fn stop(process: &mut ServerProcess) {
    if let Some(mut child) = process.child.take() {
        let _ = child.kill().await;
    }
    process.active = None;
}

fn find_server_binary(config: &LlamaConfig, project_root: &Path) -> Result<PathBuf, RagError> {
    if let Some(path) = &config.server_binary {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(RagError::Configuration(format!(
            "configured llama.server_binary {} does not exist",
            path.display()
        )));
    }

    let candidates = [
        project_root.join("bin/llama-server.exe"),
        project_root.join("bin/llama-server"),
    ];
    for path in candidates {
        if path.exists() {
            return Ok(path);
        }
    }

    // Fall back to PATH lookup; a missing binary surfaces as a spawn
    // failure on the first load.
    Ok(which::which("llama-server").unwrap_or_else(|_| PathBuf::from("llama-server")))
}

#[async_trait]
impl GenerationBackend for LlamaServerBackend {
    async fn load(
        &self,
        spec: &ModelSpec,
        weights: &Path,
    ) -> Result<Arc<dyn GenerationEngine>, RagError> {
        if !weights.is_file() {
            return Err(RagError::ModelLoad(format!(
                "weight file {} is absent or unreadable",
                weights.display()
            )));
        }

        let mut process = self.inner.lock().await;

        let reusable = process.child.is_some()
            && process.active.as_ref().is_some_and(|active| {
                active.spec.same_identity(spec) && active.weights.as_path() == weights
            });

        if !reusable {
            stop(&mut process).await;
            self.start(&mut process, spec, weights).await?;
        }

        Ok(Arc::new(LlamaServerEngine {
            spec: spec.clone(),
            port: process.port,
            client: self.client.clone(),
        }))
    }
}

/// Handle onto the currently resident llama-server model.
pub struct LlamaServerEngine {
    spec: ModelSpec,
    port: u16,
    client: Client,
}

impl LlamaServerEngine {
    fn completion_url(&self) -> String {
        format!("http://localhost:{}/completion", self.port)
    }

    fn request_body(&self, prompt: &str, stream: bool) -> Value {
        json!({
            "prompt": prompt,
            "stream": stream,
            "n_predict": self.spec.max_tokens,
            "temperature": self.spec.temperature,
            "top_k": self.spec.sampling_top_k,
            "repeat_penalty": self.spec.repeat_penalty,
            "stop": ["Question:"]
        })
    }
}

#[async_trait]
impl GenerationEngine for LlamaServerEngine {
    async fn complete(&self, prompt: &str) -> Result<String, RagError> {
        let res = self
            .client
            .post(self.completion_url())
            .json(&self.request_body(prompt, false))
            .send()
            .await
            .map_err(RagError::internal)?;

        if !res.status().is_success() {
            return Err(RagError::Internal(format!(
                "llama-server error: {}",
                res.status()
            )));
        }

        let data: Value = res.json().await.map_err(RagError::internal)?;
        let content = data["content"].as_str().unwrap_or("").to_string();
        Ok(content)
    }

    async fn complete_stream(
        &self,
        prompt: &str,
    ) -> Result<mpsc::Receiver<Result<String, RagError>>, RagError> {
        let body = self.request_body(prompt, true);
        let url = self.completion_url();

        let (tx, rx) = mpsc::channel(100);
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut res = match client.post(&url).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    let _ = tx.send(Err(RagError::internal(e))).await;
                    return;
                }
            };

            while let Some(chunk) = res.chunk().await.ok().flatten() {
                let text = String::from_utf8_lossy(&chunk);
                for line in text.lines() {
                    if let Some(json_str) = line.strip_prefix("data: ") {
                        if let Ok(val) = serde_json::from_str::<Value>(json_str) {
                            if let Some(content) = val["content"].as_str() {
                                if tx.send(Ok(content.to_string())).await.is_err() {
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}
