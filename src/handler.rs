//! Per-request handling, from request path to HTTP response

use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use tiny_http::{Header, Method, Request, Response};

use crate::listing;
use crate::path;

/// Answers a single request against the files beneath `root`.
///
/// Every outcome, error responses included, is reported to the requesting
/// connection only.
pub(crate) fn handle(root: &Path, request: Request) -> io::Result<()> {
    log::debug!("{} {}", request.method(), request.url());

    match request.method() {
        Method::Get | Method::Head => {}
        _ => return respond_error(request, 501, "Unsupported method"),
    }

    // strip off any querystrings so the filesystem probes below match and
    // don't stick index.html on the end of the path (querystrings often used
    // for cachebusting)
    let mut raw_path = request.url().to_string();
    if let Some(position) = raw_path.rfind('?') {
        raw_path.truncate(position);
    }

    let Some(resolved) = path::resolve(root, &raw_path) else {
        return respond_error(request, 400, "Bad request");
    };

    if resolved.full_path.is_file() {
        return respond_file(request, &resolved.full_path);
    }

    if resolved.full_path.is_dir() {
        let index = resolved.full_path.join("index.html");
        if index.is_file() {
            return respond_file(request, &index);
        }
        return match listing::render(&resolved.full_path, &resolved.url_path) {
            Ok(page) => respond_page(request, page),
            Err(e) => {
                log::error!("listing {}: {}", resolved.full_path.display(), e);
                respond_error(request, 404, "Page not found")
            }
        };
    }

    respond_error(request, 404, "Page not found")
}

fn respond_file(request: Request, path: &Path) -> io::Result<()> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::error!("open {}: {}", path.display(), e);
            return respond_error(request, 404, "Page not found");
        }
    };

    let mut response = Response::from_file(file);
    let mime = mime_guess::MimeGuess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    let content_type =
        Header::from_str(&format!("Content-Type: {}", mime)).expect("formatted correctly");
    response.add_header(content_type);
    request.respond(response)
}

fn respond_page(request: Request, page: String) -> io::Result<()> {
    let response = Response::from_string(page).with_header(
        Header::from_str("Content-Type: text/html; charset=utf-8").expect("formatted correctly"),
    );
    request.respond(response)
}

fn respond_error(request: Request, status: u16, reason: &str) -> io::Result<()> {
    let response = Response::from_string(format!(
        "<h1> <center> {}: {} </center> </h1>",
        status, reason
    ))
    .with_status_code(status)
    .with_header(Header::from_str("Content-Type: text/html").expect("formatted correctly"));
    request.respond(response)
}
