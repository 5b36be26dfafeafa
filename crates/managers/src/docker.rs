//! Docker-based provisioner.
//!
//! Only image building exists so far: `add_instance` sends a fixed build
//! script to the local Docker daemon. The manager is not registered in
//! [`ManagerRegistry`](crate::ManagerRegistry) and has to be constructed
//! explicitly.

use bollard::image::BuildImageOptions;
use bollard::{API_DEFAULT_VERSION, Docker};
use bytes::Bytes;
use futures_util::StreamExt;

use redisapi_common::error::AppError;

/// Socket of the local Docker daemon.
pub const DOCKER_SOCKET: &str = "unix:///var/run/docker.sock";

/// Client timeout in seconds.
const DOCKER_TIMEOUT_SECS: u64 = 120;

/// Build script sent with every `add_instance`.
pub const BUILD_SCRIPT: [&str; 3] = ["FROM base", "RUN mkdir -p /tmp/test", "EXPOSE 8080"];

pub struct DockerManager {
    client: Docker,
}

impl DockerManager {
    /// Connect to the daemon on [`DOCKER_SOCKET`].
    pub fn connect() -> Result<Self, AppError> {
        Self::connect_with_socket(DOCKER_SOCKET)
    }

    pub fn connect_with_socket(path: &str) -> Result<Self, AppError> {
        let client = Docker::connect_with_unix(path, DOCKER_TIMEOUT_SECS, API_DEFAULT_VERSION)?;
        tracing::debug!(socket = path, "Docker client ready");
        Ok(Self { client })
    }

    /// Build an image from [`BUILD_SCRIPT`].
    ///
    /// The image is not tagged. Client and build errors are returned unchanged.
    pub async fn add_instance(&self) -> Result<(), AppError> {
        let context = build_context()
            .map_err(|e| AppError::Internal(format!("Failed to pack build context: {}", e)))?;

        let options = BuildImageOptions {
            dockerfile: "Dockerfile".to_string(),
            ..Default::default()
        };

        let mut stream = self
            .client
            .build_image(options, None, Some(Bytes::from(context)));

        while let Some(info) = stream.next().await {
            let info = info?;
            if let Some(line) = info.stream {
                let line = line.trim_end();
                if !line.is_empty() {
                    tracing::debug!(output = line, "docker build");
                }
            }
        }

        tracing::info!("Docker image built");
        Ok(())
    }
}

/// Tar archive holding the build script as its `Dockerfile`.
pub fn build_context() -> std::io::Result<Vec<u8>> {
    let dockerfile = BUILD_SCRIPT.join("\n");

    let mut header = tar::Header::new_gnu();
    header.set_size(dockerfile.len() as u64);
    header.set_mode(0o644);

    let mut builder = tar::Builder::new(Vec::new());
    builder.append_data(&mut header, "Dockerfile", dockerfile.as_bytes())?;
    builder.into_inner()
}
