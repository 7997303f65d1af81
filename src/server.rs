// Copyright © 2024 Menagerie. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Static Server
//!
//! Serves a build output directory over HTTP:
//!
//! - `GET /pig/` and `GET /rabbit/` return the built page files verbatim
//!   (the trailing slash is optional and the query string is ignored)
//! - `GET <public_path><file>` returns a file from the output directory
//! - everything else is a 404
//!
//! Routing lives in [`StaticServer::respond`], which maps a URL to a
//! [`Reply`] without touching a socket. [`StaticServer::serve`] binds a
//! `tiny_http` server and answers requests one at a time.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use percent_encoding::percent_decode_str;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::core::config::Config;
use crate::core::error::{MenagerieError, Result};
use crate::pages::Page;

/// What the server answers for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A built page, returned verbatim.
    Page(String),
    /// A file from the output directory.
    File {
        /// File contents.
        bytes: Vec<u8>,
        /// Content type derived from the file extension.
        content_type: &'static str,
    },
    /// No route or no such file.
    NotFound,
}

/// Serves built pages and the output directory.
#[derive(Debug, Clone)]
pub struct StaticServer {
    dist_dir: PathBuf,
    static_prefix: String,
    routes: Vec<(String, PathBuf)>,
}

impl StaticServer {
    /// Creates a server for `dist_dir` with the page routes and the static
    /// files under `/static/`.
    pub fn new<P: AsRef<Path>>(dist_dir: P) -> Self {
        let dist_dir = dist_dir.as_ref().to_path_buf();
        let routes = Page::ALL
            .iter()
            .map(|page| {
                (
                    page.route().trim_end_matches('/').to_string(),
                    dist_dir.join(page.file_name()),
                )
            })
            .collect();

        Self {
            dist_dir,
            static_prefix: "/static/".to_string(),
            routes,
        }
    }

    /// Creates a server for the output directory and public path in
    /// `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.output_dir).with_static_prefix(&config.public_path)
    }

    /// Serves static files under `prefix` instead of `/static/`.
    pub fn with_static_prefix(mut self, prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        self.static_prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };
        self
    }

    /// The directory files are served from.
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// Maps a request URL to a reply.
    ///
    /// A page route whose file is missing is an error; a missing static
    /// file is [`Reply::NotFound`].
    pub fn respond(&self, url: &str) -> Result<Reply> {
        let path = url.split(&['?', '#'][..]).next().unwrap_or_default();

        let route = path.trim_end_matches('/');
        if let Some((_, file)) = self.routes.iter().find(|(r, _)| r == route)
        {
            let body = fs::read_to_string(file)
                .map_err(|e| MenagerieError::io_error(file.clone(), e))?;
            return Ok(Reply::Page(body));
        }

        let Some(relative) = path.strip_prefix(&self.static_prefix) else {
            return Ok(Reply::NotFound);
        };
        let Some(file) = self.static_file(relative) else {
            return Ok(Reply::NotFound);
        };
        match fs::read(&file) {
            Ok(bytes) => Ok(Reply::File {
                bytes,
                content_type: content_type(&file),
            }),
            Err(e) => {
                debug!("Static file {} unavailable: {}", file.display(), e);
                Ok(Reply::NotFound)
            }
        }
    }

    /// Resolves a path below the static prefix to a file inside the output
    /// directory. Segments are percent-decoded first; `.` and `..`
    /// segments and segments that decode to a separator are rejected.
    fn static_file(&self, relative: &str) -> Option<PathBuf> {
        let mut file = self.dist_dir.clone();
        for segment in relative.split('/') {
            let Ok(segment) = percent_decode_str(segment).decode_utf8() else {
                debug!("Undecodable path segment {:?}", segment);
                return None;
            };
            match segment.as_ref() {
                "" => continue,
                "." | ".." => return None,
                s if s.contains(&['/', '\\', '\0'][..]) => return None,
                s => file.push(s),
            }
        }
        file.is_file().then_some(file)
    }

    /// Binds `addr` and serves requests until the listener fails.
    pub fn serve(&self, addr: &str) -> Result<()> {
        let server = Server::http(addr).map_err(|e| {
            MenagerieError::server_error(
                format!("Failed to bind {}", addr),
                Some(e),
            )
        })?;
        info!(
            "Application is running on http://{}",
            server.server_addr()
        );
        self.run(&server)
    }

    /// Answers requests from an already bound server, one at a time.
    pub fn run(&self, server: &Server) -> Result<()> {
        loop {
            let request = server.recv().map_err(|e| {
                MenagerieError::server_error(
                    "Failed to receive request",
                    Some(Box::new(e)),
                )
            })?;
            if let Err(e) = self.handle(request) {
                error!("{}", e);
            }
        }
    }

    /// Answers one request.
    pub fn handle(&self, request: Request) -> Result<()> {
        info!("{} {}", request.method(), request.url());

        if !matches!(request.method(), Method::Get | Method::Head) {
            return send(
                request,
                Response::from_string("Not Found").with_status_code(404),
            );
        }

        let response = match self.respond(request.url()) {
            Ok(Reply::Page(body)) => Response::from_data(body.into_bytes())
                .with_header(header("text/html; charset=utf-8")?),
            Ok(Reply::File {
                bytes,
                content_type,
            }) => Response::from_data(bytes)
                .with_header(header(content_type)?),
            Ok(Reply::NotFound) => {
                warn!("Not found: {}", request.url());
                Response::from_data(b"Not Found".to_vec())
                    .with_status_code(404)
            }
            Err(e) => {
                error!("Failed to serve {}: {}", request.url(), e);
                Response::from_data(b"Internal Server Error".to_vec())
                    .with_status_code(500)
            }
        };
        send(request, response)
    }
}

fn send<R: std::io::Read>(
    request: Request,
    response: Response<R>,
) -> Result<()> {
    request.respond(response).map_err(|e| {
        MenagerieError::server_error(
            "Failed to write response",
            Some(Box::new(e)),
        )
    })
}

fn header(content_type: &str) -> Result<Header> {
    Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
        .map_err(|()| {
            MenagerieError::internal_error(format!(
                "Invalid content type '{}'",
                content_type
            ))
        })
}

/// Content type for a served file, by extension.
pub fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
