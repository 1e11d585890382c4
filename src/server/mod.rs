//! Local preview server
//!
//! [`launch`] runs the static file server in a child process (this same
//! binary, `serve-static` subcommand) and supervises it until Ctrl+C.
//! [`serve_static`] is what runs inside that child.

use anyhow::{Context, Result};
use axum::Router;
use std::ffi::OsString;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::helpers::{open_browser, server_index_url};

/// How long the child gets to fail before it is considered started
const STARTUP_GRACE: Duration = Duration::from_secs(1);

/// How long the child gets to stop after a termination request
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Launcher settings
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub ip: String,
    pub port: u16,
    pub open: bool,
    /// Pass `--debug` to the child so request tracing shows
    pub debug: bool,
}

/// Resolve the address to bind, accepting `localhost`
pub fn bind_addr(ip: &str, port: u16) -> Result<SocketAddr> {
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let ip: IpAddr = bind_ip
        .parse()
        .with_context(|| format!("Invalid IP address: {}", ip))?;
    Ok(SocketAddr::new(ip, port))
}

/// Serve `root` over HTTP until Ctrl+C
///
/// With `stop_on_eof`, also stops once stdin is closed; the launcher uses
/// this to request a graceful shutdown.
pub async fn serve_static(root: PathBuf, ip: &str, port: u16, stop_on_eof: bool) -> Result<()> {
    let addr = bind_addr(ip, port)?;

    let app = Router::new()
        .fallback_service(ServeDir::new(&root).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Serving {:?} at http://{}", root, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(stop_on_eof))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(stop_on_eof: bool) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let eof = async {
        if stop_on_eof {
            wait_for_stdin_eof().await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = eof => {},
    }
    tracing::debug!("Shutdown requested");
}

async fn wait_for_stdin_eof() {
    let mut stdin = tokio::io::stdin();
    let mut buf = [0u8; 64];
    loop {
        match stdin.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => continue,
        }
    }
}

enum Stop {
    Exited(std::io::Result<ExitStatus>),
    Interrupted,
}

/// Start the static server in a child process and wait for it
///
/// Fails when the child cannot be spawned, exits during the startup grace
/// period, or exits with an error status later on. Ctrl+C is a clean stop.
pub async fn launch(root: &Path, options: &LaunchOptions) -> Result<()> {
    let exe = std::env::current_exe().context("Failed to locate the current executable")?;

    tracing::debug!("Spawning {:?} serve-static", exe);
    let mut child = Command::new(&exe)
        .args(child_args(root, options))
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .context("Failed to start the HTTP server process")?;

    // Listen for Ctrl+C from here on, the grace period included
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let interrupted = tokio::select! {
        _ = tokio::time::sleep(STARTUP_GRACE) => false,
        _ = &mut ctrl_c => true,
    };
    if interrupted {
        stop_child(&mut child).await?;
        return Ok(());
    }

    if let Some(status) = child.try_wait()? {
        let stderr = read_stderr(&mut child).await;
        anyhow::bail!("Server failed to start ({}): {}", status, stderr.trim());
    }

    // Keep draining stderr so the child never blocks on a full pipe
    if let Some(mut stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let _ = tokio::io::copy(&mut stderr, &mut tokio::io::stderr()).await;
        });
    }

    let url = server_index_url(&options.ip, options.port);
    println!("Server running at http://{}:{}", options.ip, options.port);
    println!("Blog home: {}", url);
    println!("Press Ctrl+C to stop. Refresh the browser after editing files.");

    if options.open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let stop = tokio::select! {
        status = child.wait() => Stop::Exited(status),
        _ = &mut ctrl_c => Stop::Interrupted,
    };

    match stop {
        Stop::Exited(status) => {
            let status = status?;
            if status.success() {
                Ok(())
            } else {
                anyhow::bail!("Server exited with {}", status)
            }
        }
        Stop::Interrupted => {
            println!();
            println!("Stopping server...");
            stop_child(&mut child).await?;
            println!("Server stopped");
            Ok(())
        }
    }
}

/// Arguments for the `serve-static` child
fn child_args(root: &Path, options: &LaunchOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if options.debug {
        args.push("--debug".into());
    }
    args.push("serve-static".into());
    args.push("--ip".into());
    args.push(options.ip.as_str().into());
    args.push("--port".into());
    args.push(options.port.to_string().into());
    args.push("--stop-on-eof".into());
    args.push("--root".into());
    args.push(root.into());
    args
}

/// Ask the child to stop by closing its stdin, killing it after a timeout
async fn stop_child(child: &mut Child) -> Result<()> {
    drop(child.stdin.take());

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, child.wait()).await {
        Ok(status) => {
            tracing::debug!("Server process exited with {}", status?);
        }
        Err(_) => {
            tracing::warn!(
                "Server did not stop within {:?}, killing it",
                SHUTDOWN_TIMEOUT
            );
            child.kill().await?;
        }
    }
    Ok(())
}

async fn read_stderr(child: &mut Child) -> String {
    let mut out = String::new();
    if let Some(mut stderr) = child.stderr.take() {
        let _ = stderr.read_to_string(&mut out).await;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr() {
        assert_eq!(
            bind_addr("localhost", 8000).unwrap(),
            "127.0.0.1:8000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            bind_addr("0.0.0.0", 9000).unwrap(),
            "0.0.0.0:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(bind_addr("::1", 8000).unwrap(), "[::1]:8000".parse::<SocketAddr>().unwrap());
        assert!(bind_addr("not-an-ip", 8000).is_err());
    }

    #[tokio::test]
    async fn test_serve_static_reports_bind_failure() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let dir = tempfile::tempdir().unwrap();

        let err = serve_static(dir.path().to_path_buf(), "127.0.0.1", port, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to bind"));
    }

    #[test]
    fn test_child_args_forward_debug() {
        let mut options = LaunchOptions {
            ip: "127.0.0.1".to_string(),
            port: 4000,
            open: false,
            debug: false,
        };
        let args = child_args(Path::new("/site"), &options);
        assert_eq!(args[0], "serve-static");
        assert!(args.contains(&OsString::from("4000")));
        assert_eq!(args.last().unwrap(), "/site");

        options.debug = true;
        let args = child_args(Path::new("/site"), &options);
        assert_eq!(args[0], "--debug");
        assert_eq!(args[1], "serve-static");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_child_closes_stdin() {
        let mut child = Command::new("cat")
            .stdin(Stdio::piped())
            .spawn()
            .unwrap();

        let started = std::time::Instant::now();
        stop_child(&mut child).await.unwrap();
        assert!(started.elapsed() < SHUTDOWN_TIMEOUT);
        assert!(child.try_wait().unwrap().unwrap().success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_child_kills_after_timeout() {
        let mut child = Command::new("sleep")
            .arg("60")
            .stdin(Stdio::piped())
            .spawn()
            .unwrap();

        stop_child(&mut child).await.unwrap();
        let status = child.try_wait().unwrap().unwrap();
        assert!(!status.success());
    }
}
