#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use exptracker::config::{Paths, WEBHOOK_ENV};
use exptracker::core::fetcher::LeaderboardSource;
use exptracker::errors::{AppError, AppResult};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

pub fn ext() -> Command {
    let mut cmd = cargo_bin_cmd!("exptracker");
    cmd.env_remove(WEBHOOK_ENV).env("EXPTRACKER_LOG", "warn");
    cmd
}

/// Fresh project root with config/ and data/ directories.
pub fn temp_root() -> (TempDir, Paths) {
    let dir = TempDir::new().expect("temp dir");
    let paths = Paths::new(dir.path());
    fs::create_dir_all(paths.config_dir()).expect("config dir");
    fs::create_dir_all(paths.data_dir()).expect("data dir");
    (dir, paths)
}

pub fn write_characters(paths: &Paths, names: &[&str]) {
    fs::write(paths.characters_file(), names.join("\n")).expect("write characters");
}

/// Ranking page with a decoy section before the requested one.
///
/// Each row is `(name, level, exp_text)` and is rendered with six cells
/// like the real site: rank, name, level, class, exp, guild.
pub fn leaderboard_html(section: &str, rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (name, level, exp))| {
            format!(
                "<tr><td>{}</td><td>{name}</td><td>{level}</td><td>Mage</td><td>{exp}</td><td>Guild</td></tr>",
                i + 1
            )
        })
        .collect();

    format!(
        r#"<html><body>
<div class="card"><h4 class="card-title">Overworld</h4>
<table><tr><td>1</td><td>Decoy</td><td>99</td><td>Rogue</td><td>99.99%</td><td>-</td></tr></table></div>
<div class="card"><h4 class="card-title">{section} Top 100</h4>
<table>
<thead><tr><th>#</th><th>Name</th><th>Level</th><th>Class</th><th>EXP</th><th>Guild</th></tr></thead>
<tbody>{body}</tbody>
</table></div>
</body></html>"#
    )
}

/// Source that replays a fixed list of responses.
pub struct ScriptedSource {
    responses: RefCell<VecDeque<AppResult<String>>>,
    pub calls: Cell<usize>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<AppResult<String>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: Cell::new(0),
        }
    }
}

impl LeaderboardSource for ScriptedSource {
    fn fetch(&self) -> AppResult<String> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Other("no scripted response left".into())))
    }
}

/// Minimal HTTP server answering one connection per scripted response.
/// The handle yields each raw request (head and body).
pub fn stub_server(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let url = format!("http://{}/ranking/", listener.local_addr().expect("addr"));

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            requests.push(read_request(&mut stream));

            let reply = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(reply.as_bytes());
            let _ = stream.flush();
        }
        requests
    });

    (url, handle)
}

fn read_request(stream: &mut std::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            return String::from_utf8_lossy(&buf).to_string();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
