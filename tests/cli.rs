use std::fs;
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};

fn blogpub(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blogpub"))
        .args(args)
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn post(id: &str, title: &str) -> String {
    format!(
        r##"                        <div class="blog-post-item" data-post-id="{id}">
                            <div class="post-info">
                                <h4 class="post-title"><a href="#{id}">{title}</a></h4>
                                <p class="post-meta">2024-01-15 • 技术</p>
                            </div>
                            <div class="post-actions">
                                <a href="#{id}" class="read-more">阅读更多</a>
                            </div>
                        </div>
"##
    )
}

#[test]
fn serve_reports_occupied_port() {
    let taken = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port().to_string();
    let dir = tempfile::tempdir().unwrap();
    let site = dir.path().to_str().unwrap();

    let output = blogpub(&["-C", site, "serve", "--port", &port, "-n"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Failed to bind"), "stderr: {}", stderr);
    drop(taken);
}

#[test]
fn serve_static_stops_when_stdin_closes() {
    let dir = tempfile::tempdir().unwrap();
    let port = free_port().to_string();

    let output = blogpub(&[
        "serve-static",
        "--root",
        dir.path().to_str().unwrap(),
        "--port",
        &port,
        "--stop-on-eof",
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn list_flags_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    let index = format!(
        r#"<div id="blog" class="blog-card">
            <div class="blog-posts">
{}{}{}            </div>
        </div>
"#,
        post("post-test", "Test"),
        post("post-test", "TEST"),
        post("post-other", "Other"),
    );
    fs::write(dir.path().join("index.html"), index).unwrap();

    let output = blogpub(&["-C", dir.path().to_str().unwrap(), "list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Posts (3):"));
    assert_eq!(stdout.matches("(duplicate id)").count(), 2);
    assert!(stdout.contains("[post-other]\n"));
}

#[test]
fn errors_are_printed_with_causes() {
    let dir = tempfile::tempdir().unwrap();
    let output = blogpub(&["-C", dir.path().to_str().unwrap(), "list"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.starts_with("error: Failed to read"), "stderr: {}", stderr);
    assert!(stderr.contains("caused by:"));
}
